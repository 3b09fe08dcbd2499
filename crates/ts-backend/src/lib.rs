//! TypeScript ABI modules in the layout of wagmi's generated files: one banner and one
//! `export const <contract>Abi = [...] as const` per member contract.
//!
//! Each const lists every entry its contract declares, so an entry shared by several members is
//! repeated under each of them, as wagmi does. Every const is its own namespace, so entries keep
//! their declared names even when reconciliation renamed them: the ABI JSON has to hash to the
//! on-chain selectors.
//!
//! Struct components take their `internalType`s from the bundle's own type declarations, never
//! from the run-wide canonical type.

use abi_bind_data::{
    AbiEntry, BindingEmitter, EmitError, EmitterCapabilities, Param, ResolvedBundle,
    ResolvedEntry, ResolvedType,
};
use std::collections::HashSet;

const PRINT_WIDTH: usize = 80;
const BANNER_WIDTH: usize = 166;

#[derive(Debug, Clone, Copy, Default)]
pub struct TsEmitter;

impl BindingEmitter for TsEmitter {
    fn capabilities(&self) -> EmitterCapabilities {
        EmitterCapabilities {
            overloaded_functions: true,
            overloaded_events: true,
            overloaded_errors: true,
        }
    }

    fn emit(&self, bundle: &ResolvedBundle) -> Result<String, EmitError> {
        let mut names = HashSet::with_capacity(bundle.contracts.len());
        for contract in &bundle.contracts {
            let name = const_name(contract);
            if !names.insert(name.clone()) {
                return Err(EmitError::Unsupported {
                    bundle: bundle.name.clone(),
                    reason: format!("contract `{contract}` would redeclare `{name}`"),
                });
            }
        }

        let mut out = String::new();
        for (i, contract) in bundle.contracts.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let banner = "/".repeat(BANNER_WIDTH);
            out.push_str(&format!("{banner}\n// {contract}\n{banner}\n\n"));
            out.push_str(&format!("export const {} = [\n", const_name(contract)));
            let declared = bundle.entries.iter().filter(|e| e.declared_by.contains(contract));
            for entry in declared {
                write_value(&mut out, &entry_value(bundle, entry), 2, "", ",", true);
            }
            out.push_str("] as const\n");
        }
        Ok(out)
    }
}

/// `MultiWebAuthNValidatorV3` becomes `multiWebAuthNValidatorV3Abi`.
pub fn const_name(contract: &str) -> String {
    let mut name = String::with_capacity(contract.len() + 3);
    for (i, c) in contract.chars().enumerate() {
        match c {
            _ if i == 0 && c.is_ascii_digit() => {
                name.push('_');
                name.push(c);
            }
            _ if i == 0 => name.push(c.to_ascii_lowercase()),
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '$' => name.push(c),
            _ => name.push('_'),
        }
    }
    name.push_str("Abi");
    name
}

/// A JavaScript literal, printed in prettier's layout.
#[derive(Debug, Clone, PartialEq)]
enum Value {
    Str(String),
    Bool(bool),
    Array(Vec<Value>),
    Object(Vec<(&'static str, Value)>),
}

fn text(value: impl Into<String>) -> Value {
    Value::Str(value.into())
}

fn entry_value(bundle: &ResolvedBundle, entry: &ResolvedEntry) -> Value {
    let params = |params: &[Param<ResolvedType>]| {
        Value::Array(params.iter().map(|param| param_value(bundle, param, None)).collect())
    };
    let mut fields = vec![("type", text(entry.kind().as_str()))];
    match &entry.entry {
        AbiEntry::Function(function) => {
            fields.push(("inputs", params(&function.inputs)));
            fields.push(("name", text(&function.name)));
            fields.push(("outputs", params(&function.outputs)));
            fields.push(("stateMutability", text(function.state_mutability.as_str())));
        }
        AbiEntry::Event(event) => {
            let inputs = event
                .inputs
                .iter()
                .map(|param| param_value(bundle, param, Some(param.indexed)))
                .collect();
            fields.push(("anonymous", Value::Bool(event.anonymous)));
            fields.push(("inputs", Value::Array(inputs)));
            fields.push(("name", text(&event.name)));
        }
        AbiEntry::Error(error) => {
            fields.push(("inputs", params(&error.inputs)));
            fields.push(("name", text(&error.name)));
        }
        AbiEntry::Constructor(constructor) => {
            fields.push(("inputs", params(&constructor.inputs)));
            fields.push(("stateMutability", text(constructor.state_mutability.as_str())));
        }
        AbiEntry::Fallback { state_mutability } => {
            fields.push(("stateMutability", text(state_mutability.as_str())));
        }
        AbiEntry::Receive => fields.push(("stateMutability", text("payable"))),
    }
    Value::Object(fields)
}

/// `indexed` is only written for event inputs, where it is always written.
fn param_value(
    bundle: &ResolvedBundle,
    param: &Param<ResolvedType>,
    indexed: Option<bool>,
) -> Value {
    let mut fields = vec![("name", text(&param.name))];
    if let Some(internal_type) = &param.internal_type {
        fields.push(("internalType", text(internal_type)));
    }
    fields.push(("type", text(json_type(&param.ty))));
    if let Some(canonical) = param.ty.innermost_composite() {
        let components = match bundle.type_decl(canonical.id) {
            Some(decl) => decl.fields().map(|field| param_value(bundle, &field, None)).collect(),
            None => canonical.fields.iter().map(|field| param_value(bundle, field, None)).collect(),
        };
        fields.push(("components", Value::Array(components)));
    }
    if let Some(indexed) = indexed {
        fields.push(("indexed", Value::Bool(indexed)));
    }
    Value::Object(fields)
}

/// ABI JSON `type`: composites are spelled `tuple`, their shape lives in `components`.
fn json_type(ty: &ResolvedType) -> String {
    match ty {
        ResolvedType::Primitive(primitive) => primitive.to_string(),
        ResolvedType::Composite(_) => "tuple".to_owned(),
        ResolvedType::Array(inner, Some(len)) => format!("{}[{len}]", json_type(inner)),
        ResolvedType::Array(inner, None) => format!("{}[]", json_type(inner)),
    }
}

fn flat(value: &Value) -> String {
    match value {
        Value::Str(s) => {
            let mut out = String::with_capacity(s.len() + 2);
            out.push('\'');
            for c in s.chars() {
                if matches!(c, '\'' | '\\') {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push('\'');
            out
        }
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => {
            format!("[{}]", items.iter().map(flat).collect::<Vec<_>>().join(", "))
        }
        Value::Object(fields) if fields.is_empty() => "{}".to_owned(),
        Value::Object(fields) => {
            let fields: Vec<_> =
                fields.iter().map(|(key, value)| format!("{key}: {}", flat(value))).collect();
            format!("{{ {} }}", fields.join(", "))
        }
    }
}

/// Writes `prefix value suffix` on a line at `indent`, breaking `value` over several lines when
/// it does not fit the print width.
fn write_value(
    out: &mut String,
    value: &Value,
    indent: usize,
    prefix: &str,
    suffix: &str,
    force_break: bool,
) {
    let pad = " ".repeat(indent);
    let single = flat(value);
    let breakable = match value {
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        Value::Str(_) | Value::Bool(_) => false,
    };
    let fits = indent + prefix.len() + single.len() + suffix.len() <= PRINT_WIDTH;
    if !breakable || (fits && !force_break) {
        out.push_str(&format!("{pad}{prefix}{single}{suffix}\n"));
        return;
    }

    match value {
        Value::Array(items) => {
            out.push_str(&format!("{pad}{prefix}[\n"));
            for item in items {
                write_value(out, item, indent + 2, "", ",", false);
            }
            out.push_str(&format!("{pad}]{suffix}\n"));
        }
        Value::Object(fields) => {
            out.push_str(&format!("{pad}{prefix}{{\n"));
            for (key, value) in fields {
                write_value(out, value, indent + 2, &format!("{key}: "), ",", false);
            }
            out.push_str(&format!("{pad}}}{suffix}\n"));
        }
        Value::Str(_) | Value::Bool(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abi_bind_data::{
        CanonicalType, CanonicalTypeId, ConflictResolution, CustomError, Event, Function,
        Primitive, StateMutability, TypeDecl,
    };
    use std::sync::Arc;
    use test_utils::assert_strings_with_diff;

    fn typed(name: &str, primitive: Primitive) -> Param<ResolvedType> {
        Param::new(name, ResolvedType::Primitive(primitive))
            .with_internal_type(primitive.to_string())
    }

    fn resolved(entry: AbiEntry<ResolvedType>, declared_by: &[&str]) -> ResolvedEntry {
        ResolvedEntry {
            emitted_name: entry.name().to_owned(),
            origin: declared_by[0].to_owned(),
            declared_by: declared_by.iter().map(|c| (*c).to_owned()).collect(),
            resolution: None,
            entry,
        }
    }

    fn bundle() -> ResolvedBundle {
        let point = Arc::new(CanonicalType {
            id: CanonicalTypeId::new(0),
            key: "(uint256 x,uint256 y)".into(),
            fields: vec![
                Param::new("x", ResolvedType::Primitive(Primitive::Uint(256))),
                Param::new("y", ResolvedType::Primitive(Primitive::Uint(256))),
            ],
        });
        let get_passkey = |inputs| {
            AbiEntry::Function(Function {
                name: "getPasskey".into(),
                inputs,
                outputs: vec![
                    typed("", Primitive::FixedBytes(32)),
                    Param::new("", ResolvedType::Composite(Arc::clone(&point)))
                        .with_internal_type("struct WebAuthNPubKey"),
                ],
                state_mutability: StateMutability::View,
            })
        };
        let mut short =
            resolved(get_passkey(vec![typed("_smartWallet", Primitive::Address)]), &["V2", "V3"]);
        short.resolution = Some(ConflictResolution::MergeAsOverload);
        let mut long = resolved(
            get_passkey(vec![
                typed("_smartWallet", Primitive::Address),
                typed("_authenticatorId", Primitive::FixedBytes(32)),
            ]),
            &["V3"],
        );
        long.resolution = Some(ConflictResolution::MergeAsOverload);

        ResolvedBundle {
            name: "abi/kernel-abis.ts".into(),
            contracts: vec!["V2".into(), "V3".into()],
            types: vec![TypeDecl {
                name: "WebAuthNPubKey".into(),
                labels: vec!["WebAuthNPubKey".into()],
                field_internal_types: vec![Some("uint256".into()), Some("uint256".into())],
                canonical: point,
            }],
            entries: vec![
                short,
                long,
                resolved(
                    AbiEntry::Event(Event {
                        name: "PrimaryPassKeyChanged".into(),
                        inputs: vec![
                            typed("smartAccount", Primitive::Address).indexed(),
                            typed("authenticatorIdHash", Primitive::FixedBytes(32)).indexed(),
                        ],
                        anonymous: false,
                    }),
                    &["V3"],
                ),
                resolved(
                    AbiEntry::Error(CustomError {
                        name: "AlreadyInitialized".into(),
                        inputs: vec![typed("smartAccount", Primitive::Address)],
                    }),
                    &["V2", "V3"],
                ),
                resolved(AbiEntry::Receive, &["V3"]),
            ],
            conflicts: vec![],
        }
    }

    #[test]
    fn test_module_layout() {
        let banner = "/".repeat(BANNER_WIDTH);
        let expected = format!(
            r#"{banner}
// V2
{banner}

export const v2Abi = [
  {{
    type: 'function',
    inputs: [
      {{ name: '_smartWallet', internalType: 'address', type: 'address' }},
    ],
    name: 'getPasskey',
    outputs: [
      {{ name: '', internalType: 'bytes32', type: 'bytes32' }},
      {{
        name: '',
        internalType: 'struct WebAuthNPubKey',
        type: 'tuple',
        components: [
          {{ name: 'x', internalType: 'uint256', type: 'uint256' }},
          {{ name: 'y', internalType: 'uint256', type: 'uint256' }},
        ],
      }},
    ],
    stateMutability: 'view',
  }},
  {{
    type: 'error',
    inputs: [
      {{ name: 'smartAccount', internalType: 'address', type: 'address' }},
    ],
    name: 'AlreadyInitialized',
  }},
] as const

{banner}
// V3
{banner}

export const v3Abi = [
  {{
    type: 'function',
    inputs: [
      {{ name: '_smartWallet', internalType: 'address', type: 'address' }},
    ],
    name: 'getPasskey',
    outputs: [
      {{ name: '', internalType: 'bytes32', type: 'bytes32' }},
      {{
        name: '',
        internalType: 'struct WebAuthNPubKey',
        type: 'tuple',
        components: [
          {{ name: 'x', internalType: 'uint256', type: 'uint256' }},
          {{ name: 'y', internalType: 'uint256', type: 'uint256' }},
        ],
      }},
    ],
    stateMutability: 'view',
  }},
  {{
    type: 'function',
    inputs: [
      {{ name: '_smartWallet', internalType: 'address', type: 'address' }},
      {{ name: '_authenticatorId', internalType: 'bytes32', type: 'bytes32' }},
    ],
    name: 'getPasskey',
    outputs: [
      {{ name: '', internalType: 'bytes32', type: 'bytes32' }},
      {{
        name: '',
        internalType: 'struct WebAuthNPubKey',
        type: 'tuple',
        components: [
          {{ name: 'x', internalType: 'uint256', type: 'uint256' }},
          {{ name: 'y', internalType: 'uint256', type: 'uint256' }},
        ],
      }},
    ],
    stateMutability: 'view',
  }},
  {{
    type: 'event',
    anonymous: false,
    inputs: [
      {{
        name: 'smartAccount',
        internalType: 'address',
        type: 'address',
        indexed: true,
      }},
      {{
        name: 'authenticatorIdHash',
        internalType: 'bytes32',
        type: 'bytes32',
        indexed: true,
      }},
    ],
    name: 'PrimaryPassKeyChanged',
  }},
  {{
    type: 'error',
    inputs: [
      {{ name: 'smartAccount', internalType: 'address', type: 'address' }},
    ],
    name: 'AlreadyInitialized',
  }},
  {{
    type: 'receive',
    stateMutability: 'payable',
  }},
] as const
"#
        );
        let actual = TsEmitter.emit(&bundle()).unwrap();
        assert_strings_with_diff(&actual, &expected, "TypeScript output", None);
    }

    #[test]
    fn test_const_names() {
        assert_eq!(const_name("MultiWebAuthNValidatorV3"), "multiWebAuthNValidatorV3Abi");
        assert_eq!(const_name("webAuthNValidator"), "webAuthNValidatorAbi");
        assert_eq!(const_name("Stylus-Flattened"), "stylus_FlattenedAbi");
    }

    #[test]
    fn test_renamed_entries_keep_declared_name() {
        let mut bundle = bundle();
        bundle.entries[3].emitted_name = "AlreadyInitialized_V2".into();
        bundle.entries[3].resolution = Some(ConflictResolution::RenameWithSuffix);
        let actual = TsEmitter.emit(&bundle).unwrap();
        assert!(actual.contains("    name: 'AlreadyInitialized',\n"));
        assert!(!actual.contains("AlreadyInitialized_V2"));
    }

    #[test]
    fn test_clashing_const_names_are_rejected() {
        let mut bundle = bundle();
        bundle.contracts = vec!["Multi-Validator".into(), "Multi_Validator".into()];
        let err = TsEmitter.emit(&bundle).unwrap_err();
        assert!(matches!(err, EmitError::Unsupported { .. }));
    }

    #[test]
    fn test_strings_are_escaped() {
        assert_eq!(flat(&text("it's")), r"'it\'s'");
        assert_eq!(flat(&Value::Object(vec![])), "{}");
    }

    #[test]
    fn test_event_inputs_always_carry_indexed() {
        let mut bundle = bundle();
        bundle.contracts = vec!["Token".into()];
        bundle.types.clear();
        bundle.entries = vec![resolved(
            AbiEntry::Event(Event {
                name: "Transfer".into(),
                inputs: vec![
                    typed("from", Primitive::Address).indexed(),
                    typed("ok", Primitive::Bool),
                ],
                anonymous: false,
            }),
            &["Token"],
        )];
        let banner = "/".repeat(BANNER_WIDTH);
        let expected = format!(
            r#"{banner}
// Token
{banner}

export const tokenAbi = [
  {{
    type: 'event',
    anonymous: false,
    inputs: [
      {{ name: 'from', internalType: 'address', type: 'address', indexed: true }},
      {{ name: 'ok', internalType: 'bool', type: 'bool', indexed: false }},
    ],
    name: 'Transfer',
  }},
] as const
"#
        );
        let actual = TsEmitter.emit(&bundle).unwrap();
        assert_strings_with_diff(&actual, &expected, "TypeScript output", None);
    }

    #[test]
    fn test_components_use_the_bundle_declaration() {
        let mut bundle = bundle();
        bundle.types[0].field_internal_types = vec![Some("int256".into()), None];
        let actual = TsEmitter.emit(&bundle).unwrap();
        assert!(actual.contains("{ name: 'x', internalType: 'int256', type: 'uint256' },"));
        assert!(actual.contains("{ name: 'y', type: 'uint256' },"));
        assert!(!actual.contains("name: 'x', internalType: 'uint256'"));
    }
}
