//! ABI JSON fixtures modelled on real WebAuthN validator modules.

/// ERC-7579 WebAuthN validator.
pub const WEBAUTHN_VALIDATOR: &str = r#"[
  {"type": "constructor", "inputs": [{"name": "_p256Verifier", "internalType": "address", "type": "address"}], "stateMutability": "nonpayable"},
  {"type": "function", "inputs": [{"name": "smartAccount", "internalType": "address", "type": "address"}], "name": "isInitialized", "outputs": [{"name": "", "internalType": "bool", "type": "bool"}], "stateMutability": "view"},
  {"type": "function", "inputs": [{"name": "typeID", "internalType": "uint256", "type": "uint256"}], "name": "isModuleType", "outputs": [{"name": "", "internalType": "bool", "type": "bool"}], "stateMutability": "pure"},
  {"type": "function", "inputs": [{"name": "_sender", "internalType": "address", "type": "address"}, {"name": "_hash", "internalType": "bytes32", "type": "bytes32"}, {"name": "_data", "internalType": "bytes", "type": "bytes"}], "name": "isValidSignatureWithSender", "outputs": [{"name": "", "internalType": "bytes4", "type": "bytes4"}], "stateMutability": "view"},
  {"type": "function", "inputs": [{"name": "_data", "internalType": "bytes", "type": "bytes"}], "name": "onInstall", "outputs": [], "stateMutability": "payable"},
  {"type": "function", "inputs": [{"name": "", "internalType": "bytes", "type": "bytes"}], "name": "onUninstall", "outputs": [], "stateMutability": "payable"},
  {"type": "function", "inputs": [{"name": "_userOp", "internalType": "struct PackedUserOperation", "type": "tuple", "components": [{"name": "sender", "internalType": "address", "type": "address"}, {"name": "nonce", "internalType": "uint256", "type": "uint256"}, {"name": "initCode", "internalType": "bytes", "type": "bytes"}, {"name": "callData", "internalType": "bytes", "type": "bytes"}, {"name": "accountGasLimits", "internalType": "bytes32", "type": "bytes32"}, {"name": "preVerificationGas", "internalType": "uint256", "type": "uint256"}, {"name": "gasFees", "internalType": "bytes32", "type": "bytes32"}, {"name": "paymasterAndData", "internalType": "bytes", "type": "bytes"}, {"name": "signature", "internalType": "bytes", "type": "bytes"}]}, {"name": "_userOpHash", "internalType": "bytes32", "type": "bytes32"}], "name": "validateUserOp", "outputs": [{"name": "", "internalType": "uint256", "type": "uint256"}], "stateMutability": "payable"},
  {"type": "event", "anonymous": false, "inputs": [{"name": "smartAccount", "internalType": "address", "type": "address", "indexed": true}, {"name": "b64AuthenticatorId", "internalType": "string", "type": "string", "indexed": true}, {"name": "x", "internalType": "uint256", "type": "uint256", "indexed": false}, {"name": "y", "internalType": "uint256", "type": "uint256", "indexed": false}], "name": "WebAuthnPublicKeyChanged"},
  {"type": "error", "inputs": [{"name": "smartAccount", "internalType": "address", "type": "address"}], "name": "AlreadyInitialized"},
  {"type": "error", "inputs": [{"name": "x", "internalType": "uint256", "type": "uint256"}, {"name": "y", "internalType": "uint256", "type": "uint256"}], "name": "InvalidInitData"},
  {"type": "error", "inputs": [{"name": "target", "internalType": "address", "type": "address"}], "name": "InvalidTargetAddress"},
  {"type": "error", "inputs": [], "name": "InvalidWebAuthNData"},
  {"type": "error", "inputs": [{"name": "smartAccount", "internalType": "address", "type": "address"}], "name": "NotInitialized"}
]"#;

/// Kernel v2 multi passkey validator: the 7579 validator plus a single argument `getPasskey`.
pub const MULTI_WEBAUTHN_VALIDATOR_V2: &str = r#"[
  {"type": "constructor", "inputs": [{"name": "_p256Verifier", "internalType": "address", "type": "address"}], "stateMutability": "nonpayable"},
  {"type": "function", "inputs": [{"name": "_smartWallet", "internalType": "address", "type": "address"}], "name": "getPasskey", "outputs": [{"name": "", "internalType": "bytes32", "type": "bytes32"}, {"name": "", "internalType": "struct WebAuthNPubKey", "type": "tuple", "components": [{"name": "x", "internalType": "uint256", "type": "uint256"}, {"name": "y", "internalType": "uint256", "type": "uint256"}]}], "stateMutability": "view"},
  {"type": "function", "inputs": [{"name": "smartAccount", "internalType": "address", "type": "address"}], "name": "isInitialized", "outputs": [{"name": "", "internalType": "bool", "type": "bool"}], "stateMutability": "view"},
  {"type": "function", "inputs": [{"name": "typeID", "internalType": "uint256", "type": "uint256"}], "name": "isModuleType", "outputs": [{"name": "", "internalType": "bool", "type": "bool"}], "stateMutability": "pure"},
  {"type": "function", "inputs": [{"name": "_sender", "internalType": "address", "type": "address"}, {"name": "_hash", "internalType": "bytes32", "type": "bytes32"}, {"name": "_data", "internalType": "bytes", "type": "bytes"}], "name": "isValidSignatureWithSender", "outputs": [{"name": "", "internalType": "bytes4", "type": "bytes4"}], "stateMutability": "view"},
  {"type": "function", "inputs": [{"name": "_data", "internalType": "bytes", "type": "bytes"}], "name": "onInstall", "outputs": [], "stateMutability": "payable"},
  {"type": "function", "inputs": [{"name": "", "internalType": "bytes", "type": "bytes"}], "name": "onUninstall", "outputs": [], "stateMutability": "payable"},
  {"type": "function", "inputs": [{"name": "_userOp", "internalType": "struct PackedUserOperation", "type": "tuple", "components": [{"name": "sender", "internalType": "address", "type": "address"}, {"name": "nonce", "internalType": "uint256", "type": "uint256"}, {"name": "initCode", "internalType": "bytes", "type": "bytes"}, {"name": "callData", "internalType": "bytes", "type": "bytes"}, {"name": "accountGasLimits", "internalType": "bytes32", "type": "bytes32"}, {"name": "preVerificationGas", "internalType": "uint256", "type": "uint256"}, {"name": "gasFees", "internalType": "bytes32", "type": "bytes32"}, {"name": "paymasterAndData", "internalType": "bytes", "type": "bytes"}, {"name": "signature", "internalType": "bytes", "type": "bytes"}]}, {"name": "_userOpHash", "internalType": "bytes32", "type": "bytes32"}], "name": "validateUserOp", "outputs": [{"name": "", "internalType": "uint256", "type": "uint256"}], "stateMutability": "payable"},
  {"type": "event", "anonymous": false, "inputs": [{"name": "smartAccount", "internalType": "address", "type": "address", "indexed": true}, {"name": "b64AuthenticatorId", "internalType": "string", "type": "string", "indexed": true}, {"name": "x", "internalType": "uint256", "type": "uint256", "indexed": false}, {"name": "y", "internalType": "uint256", "type": "uint256", "indexed": false}], "name": "WebAuthnPublicKeyChanged"},
  {"type": "error", "inputs": [{"name": "smartAccount", "internalType": "address", "type": "address"}], "name": "AlreadyInitialized"},
  {"type": "error", "inputs": [{"name": "x", "internalType": "uint256", "type": "uint256"}, {"name": "y", "internalType": "uint256", "type": "uint256"}], "name": "InvalidInitData"},
  {"type": "error", "inputs": [{"name": "target", "internalType": "address", "type": "address"}], "name": "InvalidTargetAddress"},
  {"type": "error", "inputs": [], "name": "InvalidWebAuthNData"},
  {"type": "error", "inputs": [{"name": "smartAccount", "internalType": "address", "type": "address"}], "name": "NotInitialized"}
]"#;

/// Kernel v3 multi passkey validator, overloads `getPasskey` with an authenticator id.
pub const MULTI_WEBAUTHN_VALIDATOR_V3: &str = r#"[
  {"type": "constructor", "inputs": [{"name": "_p256Verifier", "internalType": "address", "type": "address"}], "stateMutability": "nonpayable"},
  {"type": "function", "inputs": [{"name": "authenticatorId", "internalType": "bytes32", "type": "bytes32"}, {"name": "x", "internalType": "uint256", "type": "uint256"}, {"name": "y", "internalType": "uint256", "type": "uint256"}], "name": "addPassKey", "outputs": [], "stateMutability": "nonpayable"},
  {"type": "function", "inputs": [{"name": "_smartWallet", "internalType": "address", "type": "address"}], "name": "getPasskey", "outputs": [{"name": "", "internalType": "bytes32", "type": "bytes32"}, {"name": "", "internalType": "struct WebAuthNPubKey", "type": "tuple", "components": [{"name": "x", "internalType": "uint256", "type": "uint256"}, {"name": "y", "internalType": "uint256", "type": "uint256"}]}], "stateMutability": "view"},
  {"type": "function", "inputs": [{"name": "_smartWallet", "internalType": "address", "type": "address"}, {"name": "_authenticatorId", "internalType": "bytes32", "type": "bytes32"}], "name": "getPasskey", "outputs": [{"name": "", "internalType": "bytes32", "type": "bytes32"}, {"name": "", "internalType": "struct WebAuthNPubKey", "type": "tuple", "components": [{"name": "x", "internalType": "uint256", "type": "uint256"}, {"name": "y", "internalType": "uint256", "type": "uint256"}]}], "stateMutability": "view"},
  {"type": "function", "inputs": [{"name": "smartAccount", "internalType": "address", "type": "address"}], "name": "isInitialized", "outputs": [{"name": "", "internalType": "bool", "type": "bool"}], "stateMutability": "view"},
  {"type": "function", "inputs": [{"name": "typeID", "internalType": "uint256", "type": "uint256"}], "name": "isModuleType", "outputs": [{"name": "", "internalType": "bool", "type": "bool"}], "stateMutability": "pure"},
  {"type": "function", "inputs": [{"name": "_sender", "internalType": "address", "type": "address"}, {"name": "_hash", "internalType": "bytes32", "type": "bytes32"}, {"name": "_data", "internalType": "bytes", "type": "bytes"}], "name": "isValidSignatureWithSender", "outputs": [{"name": "", "internalType": "bytes4", "type": "bytes4"}], "stateMutability": "view"},
  {"type": "function", "inputs": [{"name": "_data", "internalType": "bytes", "type": "bytes"}], "name": "onInstall", "outputs": [], "stateMutability": "payable"},
  {"type": "function", "inputs": [{"name": "", "internalType": "bytes", "type": "bytes"}], "name": "onUninstall", "outputs": [], "stateMutability": "payable"},
  {"type": "function", "inputs": [{"name": "authenticatorId", "internalType": "bytes32", "type": "bytes32"}], "name": "removePassKey", "outputs": [], "stateMutability": "nonpayable"},
  {"type": "function", "inputs": [{"name": "authenticatorId", "internalType": "bytes32", "type": "bytes32"}], "name": "setPrimaryPassKey", "outputs": [], "stateMutability": "nonpayable"},
  {"type": "function", "inputs": [{"name": "_userOp", "internalType": "struct PackedUserOperation", "type": "tuple", "components": [{"name": "sender", "internalType": "address", "type": "address"}, {"name": "nonce", "internalType": "uint256", "type": "uint256"}, {"name": "initCode", "internalType": "bytes", "type": "bytes"}, {"name": "callData", "internalType": "bytes", "type": "bytes"}, {"name": "accountGasLimits", "internalType": "bytes32", "type": "bytes32"}, {"name": "preVerificationGas", "internalType": "uint256", "type": "uint256"}, {"name": "gasFees", "internalType": "bytes32", "type": "bytes32"}, {"name": "paymasterAndData", "internalType": "bytes", "type": "bytes"}, {"name": "signature", "internalType": "bytes", "type": "bytes"}]}, {"name": "_userOpHash", "internalType": "bytes32", "type": "bytes32"}], "name": "validateUserOp", "outputs": [{"name": "", "internalType": "uint256", "type": "uint256"}], "stateMutability": "payable"},
  {"type": "event", "anonymous": false, "inputs": [{"name": "smartAccount", "internalType": "address", "type": "address", "indexed": true}, {"name": "authenticatorIdHash", "internalType": "bytes32", "type": "bytes32", "indexed": true}], "name": "PrimaryPassKeyChanged"},
  {"type": "event", "anonymous": false, "inputs": [{"name": "smartAccount", "internalType": "address", "type": "address", "indexed": true}, {"name": "authenticatorIdHash", "internalType": "bytes32", "type": "bytes32", "indexed": true}, {"name": "x", "internalType": "uint256", "type": "uint256", "indexed": false}, {"name": "y", "internalType": "uint256", "type": "uint256", "indexed": false}], "name": "WebAuthnPublicKeyAdded"},
  {"type": "event", "anonymous": false, "inputs": [{"name": "smartAccount", "internalType": "address", "type": "address", "indexed": true}, {"name": "authenticatorIdHash", "internalType": "bytes32", "type": "bytes32", "indexed": true}], "name": "WebAuthnPublicKeyRemoved"},
  {"type": "error", "inputs": [{"name": "smartAccount", "internalType": "address", "type": "address"}], "name": "AlreadyInitialized"},
  {"type": "error", "inputs": [{"name": "smartAccount", "internalType": "address", "type": "address"}, {"name": "authenticatorIdHash", "internalType": "bytes32", "type": "bytes32"}], "name": "CantRemoveMainPasskey"},
  {"type": "error", "inputs": [{"name": "x", "internalType": "uint256", "type": "uint256"}, {"name": "y", "internalType": "uint256", "type": "uint256"}], "name": "InvalidInitData"},
  {"type": "error", "inputs": [{"name": "target", "internalType": "address", "type": "address"}], "name": "InvalidTargetAddress"},
  {"type": "error", "inputs": [], "name": "InvalidWebAuthNData"},
  {"type": "error", "inputs": [{"name": "smartAccount", "internalType": "address", "type": "address"}], "name": "NotInitialized"},
  {"type": "error", "inputs": [{"name": "smartAccount", "internalType": "address", "type": "address"}, {"name": "authenticatorIdHash", "internalType": "bytes32", "type": "bytes32"}], "name": "PassKeyAlreadyExist"},
  {"type": "error", "inputs": [{"name": "smartAccount", "internalType": "address", "type": "address"}, {"name": "authenticatorIdHash", "internalType": "bytes32", "type": "bytes32"}], "name": "PassKeyDontExist"}
]"#;

/// Declares the `{x, y}` point as an unlabelled inline tuple.
pub const POINT_REGISTRY: &str = r#"[
  {"type": "function", "name": "pointOf", "inputs": [{"name": "id", "type": "bytes32", "internalType": "bytes32"}], "outputs": [{"name": "", "type": "tuple", "components": [{"name": "x", "type": "uint256", "internalType": "uint256"}, {"name": "y", "type": "uint256", "internalType": "uint256"}]}], "stateMutability": "view"},
  {"type": "function", "name": "register", "inputs": [{"name": "id", "type": "bytes32", "internalType": "bytes32"}, {"name": "point", "type": "tuple", "components": [{"name": "x", "type": "uint256", "internalType": "uint256"}, {"name": "y", "type": "uint256", "internalType": "uint256"}]}], "outputs": [], "stateMutability": "nonpayable"},
  {"type": "error", "name": "AlreadyInitialized", "inputs": [{"name": "smartAccount", "type": "address", "internalType": "address"}]}
]"#;

/// Older validator whose `getPasskey`, `PrimaryPassKeyChanged` and `AlreadyInitialized` shapes
/// diverge from the current ones.
pub const LEGACY_VALIDATOR: &str = r#"[
  {"type": "function", "name": "getPasskey", "inputs": [{"name": "_smartWallet", "type": "address", "internalType": "address"}], "outputs": [{"name": "", "type": "bytes32", "internalType": "bytes32"}], "stateMutability": "view"},
  {"type": "event", "name": "PrimaryPassKeyChanged", "anonymous": false, "inputs": [{"name": "smartAccount", "type": "address", "internalType": "address", "indexed": true}]},
  {"type": "error", "name": "AlreadyInitialized", "inputs": []}
]"#;
