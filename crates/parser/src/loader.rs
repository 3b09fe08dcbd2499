//! Artifact loading: raw ABI records to validated [`ContractArtifact`]s.

use crate::{
    raw::{RawAbiEntry, RawArtifact, RawParam},
    signature::{TypeParseError, parse_type_with_components},
};
use abi_bind_data::{
    AbiEntry, ArtifactSet, Composite, Constructor, ContractArtifact, CustomError, EntryKind, Event,
    Function, Param, StateMutability, TypeRef,
};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("contract `{contract}`, entry `{entry}`: malformed type signature `{signature}`: {source}")]
    MalformedTypeSignature {
        contract: String,
        entry: String,
        signature: String,
        source: TypeParseError,
    },
    #[error("contract `{contract}`: duplicate {kind} `{name}{signature}`")]
    DuplicateAbiEntry { contract: String, kind: EntryKind, name: String, signature: String },
    #[error("contract `{contract}`: unknown entry kind `{kind}`")]
    UnknownEntryKind { contract: String, kind: String },
    #[error("contract `{contract}`, entry `{entry}`: unknown state mutability `{value}`")]
    UnknownStateMutability { contract: String, entry: String, value: String },
    #[error("contract `{contract}`: {kind} entry without a name")]
    MissingName { contract: String, kind: EntryKind },
    #[error("contract `{contract}`: invalid artifact JSON: {source}")]
    Json { contract: String, source: serde_json::Error },
    #[error("contract `{0}` loaded twice")]
    DuplicateContract(String),
}

/// A type string that failed to parse, possibly nested inside tuple components.
struct BadType {
    signature: String,
    source: TypeParseError,
}

/// Decodes `json` (a bare ABI array or a compiler artifact) and loads it as contract `name`.
pub fn load_json(name: &str, json: &str) -> Result<ContractArtifact, LoadError> {
    let raw: RawArtifact = serde_json::from_str(json)
        .map_err(|source| LoadError::Json { contract: name.to_owned(), source })?;
    load_artifact(name, &raw.into_entries())
}

/// Loads every `(name, entries)` record into one [`ArtifactSet`], preserving record order.
pub fn load_set<N, I>(records: I) -> Result<ArtifactSet, LoadError>
where
    N: AsRef<str>,
    I: IntoIterator<Item = (N, Vec<RawAbiEntry>)>,
{
    let mut set = ArtifactSet::new();
    for (name, entries) in records {
        let artifact = load_artifact(name.as_ref(), &entries)?;
        set.insert(artifact).map_err(|dup| LoadError::DuplicateContract(dup.0))?;
    }
    Ok(set)
}

/// Validates and converts the raw entries of one contract.
pub fn load_artifact(name: &str, entries: &[RawAbiEntry]) -> Result<ContractArtifact, LoadError> {
    let mut seen = HashSet::with_capacity(entries.len());
    let mut abi = Vec::with_capacity(entries.len());

    for raw in entries {
        let entry = lower_entry(name, raw)?;
        let key = (entry.kind(), entry.name().to_owned(), entry.input_signature());
        if !seen.insert(key) {
            return Err(LoadError::DuplicateAbiEntry {
                contract: name.to_owned(),
                kind: entry.kind(),
                name: entry.name().to_owned(),
                signature: entry.input_signature(),
            });
        }
        abi.push(entry);
    }

    debug!(contract = name, entries = abi.len(), "loaded artifact");
    Ok(ContractArtifact { name: name.to_owned(), abi })
}

fn lower_entry(contract: &str, raw: &RawAbiEntry) -> Result<AbiEntry, LoadError> {
    let kind = match raw.kind.as_str() {
        "function" => EntryKind::Function,
        "event" => EntryKind::Event,
        "error" => EntryKind::Error,
        "constructor" => EntryKind::Constructor,
        "fallback" => EntryKind::Fallback,
        "receive" => EntryKind::Receive,
        other => {
            return Err(LoadError::UnknownEntryKind {
                contract: contract.to_owned(),
                kind: other.to_owned(),
            });
        }
    };
    let entry_label = raw.name.clone().unwrap_or_else(|| kind.to_string());
    let params = |params: &[RawParam]| -> Result<Vec<Param<TypeRef>>, LoadError> {
        params.iter().map(lower_param).collect::<Result<_, _>>().map_err(|bad| {
            LoadError::MalformedTypeSignature {
                contract: contract.to_owned(),
                entry: entry_label.clone(),
                signature: bad.signature,
                source: bad.source,
            }
        })
    };
    let name = || match raw.name.as_deref() {
        Some(name) if !name.is_empty() => Ok(name.to_owned()),
        _ => Err(LoadError::MissingName { contract: contract.to_owned(), kind }),
    };

    Ok(match kind {
        EntryKind::Function => AbiEntry::Function(Function {
            name: name()?,
            inputs: params(&raw.inputs)?,
            outputs: params(&raw.outputs)?,
            state_mutability: state_mutability(contract, &entry_label, raw)?,
        }),
        EntryKind::Event => AbiEntry::Event(Event {
            name: name()?,
            inputs: params(&raw.inputs)?,
            anonymous: raw.anonymous.unwrap_or(false),
        }),
        EntryKind::Error => {
            AbiEntry::Error(CustomError { name: name()?, inputs: params(&raw.inputs)? })
        }
        EntryKind::Constructor => AbiEntry::Constructor(Constructor {
            inputs: params(&raw.inputs)?,
            state_mutability: state_mutability(contract, &entry_label, raw)?,
        }),
        EntryKind::Fallback => {
            AbiEntry::Fallback { state_mutability: state_mutability(contract, &entry_label, raw)? }
        }
        EntryKind::Receive => AbiEntry::Receive,
    })
}

fn lower_param(raw: &RawParam) -> Result<Param<TypeRef>, BadType> {
    let components = match &raw.components {
        Some(components) => Some(Composite {
            label: struct_label(raw.internal_type.as_deref()),
            components: components.iter().map(lower_param).collect::<Result<_, _>>()?,
        }),
        None => None,
    };
    let ty = parse_type_with_components(&raw.ty, components)
        .map_err(|source| BadType { signature: raw.ty.clone(), source })?;
    Ok(Param {
        name: raw.name.clone(),
        ty,
        internal_type: raw.internal_type.clone(),
        indexed: raw.indexed.unwrap_or(false),
    })
}

/// `struct IEntryPoint.PackedUserOperation[]` -> `IEntryPoint.PackedUserOperation`. The
/// qualifier is kept: `Vault.Config` and `Oracle.Config` are different structs.
fn struct_label(internal_type: Option<&str>) -> Option<String> {
    let name = internal_type?.strip_prefix("struct ")?;
    let name = name.split('[').next().unwrap_or(name).trim();
    (!name.is_empty()).then(|| name.to_owned())
}

fn state_mutability(
    contract: &str,
    entry: &str,
    raw: &RawAbiEntry,
) -> Result<StateMutability, LoadError> {
    Ok(match raw.state_mutability.as_deref() {
        Some("pure") => StateMutability::Pure,
        Some("view") => StateMutability::View,
        Some("nonpayable") => StateMutability::NonPayable,
        Some("payable") => StateMutability::Payable,
        Some(other) => {
            return Err(LoadError::UnknownStateMutability {
                contract: contract.to_owned(),
                entry: entry.to_owned(),
                value: other.to_owned(),
            });
        }
        None if raw.constant == Some(true) => StateMutability::View,
        None if raw.payable == Some(true) => StateMutability::Payable,
        None => StateMutability::NonPayable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use abi_bind_data::{AbiType, Primitive};

    #[test]
    fn test_loads_validator_fixture() {
        let artifact =
            load_json("MultiWebAuthNValidatorV3", test_utils::fixtures::MULTI_WEBAUTHN_VALIDATOR_V3)
                .unwrap();
        let passkeys: Vec<_> =
            artifact.abi.iter().filter(|entry| entry.name() == "getPasskey").collect();
        assert_eq!(passkeys.len(), 2);
        assert_eq!(passkeys[1].signature(), "getPasskey(address,bytes32)");

        let TypeRef::Composite(pub_key) = &passkeys[0].outputs()[1].ty else {
            panic!("expected a struct output");
        };
        assert_eq!(pub_key.label.as_deref(), Some("WebAuthNPubKey"));
        assert_eq!(pub_key.components[0].name, "x");
    }

    #[test]
    fn test_struct_labels() {
        assert_eq!(struct_label(Some("struct WebAuthNPubKey")).as_deref(), Some("WebAuthNPubKey"));
        assert_eq!(
            struct_label(Some("struct IEntryPoint.PackedUserOperation[]")).as_deref(),
            Some("IEntryPoint.PackedUserOperation")
        );
        assert_eq!(struct_label(Some("uint256")), None);
        assert_eq!(struct_label(None), None);
    }

    #[test]
    fn test_duplicate_entries_are_rejected() {
        let json = r#"[
            { "type": "error", "name": "NotInitialized", "inputs": [{ "name": "a", "type": "address" }] },
            { "type": "error", "name": "NotInitialized", "inputs": [{ "name": "b", "type": "address" }] }
        ]"#;
        let err = load_json("Broken", json).unwrap_err();
        let LoadError::DuplicateAbiEntry { contract, kind, name, signature } = &err else {
            panic!("expected duplicate entry, got {err}");
        };
        assert_eq!(contract, "Broken");
        assert_eq!(*kind, EntryKind::Error);
        assert_eq!(name, "NotInitialized");
        assert_eq!(signature, "(address)");
    }

    #[test]
    fn test_overloads_within_a_contract_are_kept() {
        let json = r#"[
            { "type": "function", "name": "f", "inputs": [], "outputs": [], "stateMutability": "view" },
            { "type": "function", "name": "f", "inputs": [{ "name": "a", "type": "uint" }], "outputs": [], "stateMutability": "view" }
        ]"#;
        let artifact = load_json("Overloads", json).unwrap();
        assert_eq!(artifact.abi.len(), 2);
        assert_eq!(artifact.abi[1].signature(), "f(uint256)");
    }

    #[test]
    fn test_malformed_nested_type_reports_context() {
        let json = r#"[
            { "type": "function", "name": "validateUserOp", "stateMutability": "payable",
              "inputs": [{ "name": "op", "type": "tuple", "internalType": "struct PackedUserOperation",
                           "components": [{ "name": "nonce", "type": "uint256[" }] }],
              "outputs": [] }
        ]"#;
        let err = load_json("Validator", json).unwrap_err();
        let LoadError::MalformedTypeSignature { contract, entry, signature, .. } = &err else {
            panic!("expected malformed type, got {err}");
        };
        assert_eq!(contract, "Validator");
        assert_eq!(entry, "validateUserOp");
        assert_eq!(signature, "uint256[");
    }

    #[test]
    fn test_unknown_kind_and_mutability() {
        let err = load_json("C", r#"[{ "type": "modifier", "name": "onlyOwner" }]"#).unwrap_err();
        assert!(matches!(err, LoadError::UnknownEntryKind { ref kind, .. } if kind == "modifier"));

        let err = load_json(
            "C",
            r#"[{ "type": "function", "name": "f", "stateMutability": "constant" }]"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::UnknownStateMutability { .. }));
    }

    #[test]
    fn test_legacy_mutability_flags() {
        let json = r#"[
            { "type": "function", "name": "get", "constant": true, "inputs": [], "outputs": [{ "name": "", "type": "uint" }] },
            { "type": "fallback", "payable": true }
        ]"#;
        let artifact = load_json("Legacy", json).unwrap();
        assert_eq!(artifact.abi[0].state_mutability(), Some(StateMutability::View));
        assert_eq!(artifact.abi[1].state_mutability(), Some(StateMutability::Payable));
        assert_eq!(artifact.abi[0].outputs()[0].ty, TypeRef::Primitive(Primitive::Uint(256)));
    }

    #[test]
    fn test_missing_name() {
        let err = load_json("C", r#"[{ "type": "event", "inputs": [] }]"#).unwrap_err();
        assert!(matches!(err, LoadError::MissingName { kind: EntryKind::Event, .. }));
    }

    #[test]
    fn test_load_set_preserves_order_and_rejects_duplicates() {
        let entries = || {
            serde_json::from_str::<RawArtifact>(test_utils::fixtures::WEBAUTHN_VALIDATOR)
                .unwrap()
                .into_entries()
        };
        let set = load_set([("WebAuthNValidator", entries()), ("Copy", entries())]).unwrap();
        let names: Vec<_> = set.iter().map(|(_, artifact)| artifact.name.as_str()).collect();
        assert_eq!(names, ["WebAuthNValidator", "Copy"]);

        let err = load_set([("Same", entries()), ("Same", entries())]).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateContract(ref name) if name == "Same"));
    }

    #[test]
    fn test_event_indexed_flags() {
        let artifact =
            load_json("WebAuthNValidator", test_utils::fixtures::WEBAUTHN_VALIDATOR).unwrap();
        let event = artifact.abi.iter().find(|entry| entry.kind() == EntryKind::Event).unwrap();
        assert_eq!(event.input_signature(), "(address indexed,string indexed,uint256,uint256)");
        assert_eq!(event.inputs()[2].ty.signature(), "uint256");
    }
}
