//! The fully resolved per-bundle model handed to a [`crate::BindingEmitter`].

use crate::{
    AbiEntry, CanonicalType, CanonicalTypeId, EntryKind, Param, ResolvedType, types::AbiType,
};
use alloy_primitives::{B256, FixedBytes, keccak256};
use std::{fmt, sync::Arc};

/// How a collision between two same-named entries of one bundle was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictResolution {
    MergeAsOverload,
    RenameWithSuffix,
    Reject,
}

impl fmt::Display for ConflictResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConflictResolution::MergeAsOverload => "overload",
            ConflictResolution::RenameWithSuffix => "renamed",
            ConflictResolution::Reject => "rejected",
        })
    }
}

/// One side of a [`Conflict`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictSide {
    pub contract: String,
    pub signature: String,
}

/// Two entries of the same kind and name with different shapes inside one bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub kind: EntryKind,
    pub name: String,
    pub first: ConflictSide,
    pub second: ConflictSide,
    pub resolution: ConflictResolution,
}

/// A canonical composite as declared by one bundle.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    /// Bundle local declaration name, unique within the bundle.
    pub name: String,
    /// Every distinct source label that resolved to this type, in bundle order.
    pub labels: Vec<String>,
    /// Component `internalType`s as this bundle first wrote them, one per canonical field.
    pub field_internal_types: Vec<Option<String>>,
    pub canonical: Arc<CanonicalType>,
}

impl TypeDecl {
    pub fn id(&self) -> CanonicalTypeId {
        self.canonical.id
    }

    /// The canonical fields with this bundle's `internalType`s put back.
    pub fn fields(&self) -> impl Iterator<Item = Param<ResolvedType>> + '_ {
        self.canonical.fields.iter().enumerate().map(|(i, field)| Param {
            internal_type: self.field_internal_types.get(i).cloned().flatten(),
            ..field.clone()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// First four bytes of the signature hash, for functions and errors.
    Function(FixedBytes<4>),
    /// Full signature hash, for non-anonymous events.
    Topic(B256),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Function(selector) => write!(f, "{selector}"),
            Selector::Topic(topic) => write!(f, "{topic}"),
        }
    }
}

/// A reconciled entry of a bundle.
#[derive(Debug, Clone)]
pub struct ResolvedEntry {
    pub entry: AbiEntry<ResolvedType>,
    /// Name to emit under. Differs from `entry.name()` only after a rename.
    pub emitted_name: String,
    /// First contract, in bundle order, that declared this exact shape.
    pub origin: String,
    /// Every member contract declaring this exact shape, in bundle order.
    pub declared_by: Vec<String>,
    pub resolution: Option<ConflictResolution>,
}

impl ResolvedEntry {
    pub fn kind(&self) -> EntryKind {
        self.entry.kind()
    }

    pub fn is_renamed(&self) -> bool {
        self.emitted_name != self.entry.name()
    }

    /// Selector or topic derived from the declared (never the emitted) name.
    pub fn selector(&self) -> Option<Selector> {
        let hash = || keccak256(self.entry.signature().as_bytes());
        match self.entry {
            AbiEntry::Function(_) | AbiEntry::Error(_) => {
                Some(Selector::Function(FixedBytes::<4>::from_slice(&hash()[..4])))
            }
            AbiEntry::Event(ref event) if !event.anonymous => Some(Selector::Topic(hash())),
            _ => None,
        }
    }
}

/// Everything an emitter needs for one output unit. Types are topologically ordered: a type
/// appears after every type it embeds.
#[derive(Debug, Clone)]
pub struct ResolvedBundle {
    pub name: String,
    pub contracts: Vec<String>,
    pub types: Vec<TypeDecl>,
    pub entries: Vec<ResolvedEntry>,
    pub conflicts: Vec<Conflict>,
}

impl ResolvedBundle {
    pub fn type_decl(&self, id: CanonicalTypeId) -> Option<&TypeDecl> {
        self.types.iter().find(|decl| decl.id() == id)
    }

    pub fn type_name(&self, id: CanonicalTypeId) -> Option<&str> {
        self.type_decl(id).map(|decl| decl.name.as_str())
    }

    pub fn entries_of(&self, kind: EntryKind) -> impl Iterator<Item = &ResolvedEntry> + '_ {
        self.entries.iter().filter(move |entry| entry.kind() == kind)
    }

    pub fn entries_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ResolvedEntry> {
        self.entries.iter().filter(move |entry| entry.emitted_name == name)
    }

    /// Renders `ty` using bundle declaration names for composites, e.g. `WebAuthNPubKey[]`.
    pub fn display_type(&self, ty: &ResolvedType) -> String {
        match ty {
            ResolvedType::Primitive(primitive) => primitive.to_string(),
            ResolvedType::Composite(canonical) => match self.type_name(canonical.id) {
                Some(name) => name.to_owned(),
                None => canonical.abi_signature(),
            },
            ResolvedType::Array(inner, Some(len)) => format!("{}[{len}]", self.display_type(inner)),
            ResolvedType::Array(inner, None) => format!("{}[]", self.display_type(inner)),
        }
    }

    /// ABI signature of `ty`, composites expanded, e.g. `(uint256,uint256)[]`.
    pub fn abi_type(&self, ty: &ResolvedType) -> String {
        ty.signature()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CustomError, Event, Function, Param, Primitive, StateMutability};

    fn resolved(entry: AbiEntry<ResolvedType>) -> ResolvedEntry {
        ResolvedEntry {
            emitted_name: entry.name().to_owned(),
            origin: "Validator".into(),
            declared_by: vec!["Validator".into()],
            resolution: None,
            entry,
        }
    }

    fn address(name: &str) -> Param<ResolvedType> {
        Param::new(name, ResolvedType::Primitive(Primitive::Address))
    }

    #[test]
    fn test_function_selector() {
        let transfer = resolved(AbiEntry::Function(Function {
            name: "transfer".into(),
            inputs: vec![
                address("to"),
                Param::new("amount", ResolvedType::Primitive(Primitive::Uint(256))),
            ],
            outputs: vec![],
            state_mutability: StateMutability::NonPayable,
        }));
        assert_eq!(transfer.selector().unwrap().to_string(), "0xa9059cbb");
    }

    #[test]
    fn test_error_selector_uses_declared_name() {
        let mut error = resolved(AbiEntry::Error(CustomError {
            name: "AlreadyInitialized".into(),
            inputs: vec![address("smartAccount")],
        }));
        let before = error.selector();
        error.emitted_name = "AlreadyInitialized_Other".into();
        assert!(error.is_renamed());
        assert_eq!(error.selector(), before);
    }

    #[test]
    fn test_anonymous_event_has_no_topic() {
        let event = resolved(AbiEntry::Event(Event {
            name: "Ping".into(),
            inputs: vec![],
            anonymous: true,
        }));
        assert_eq!(event.selector(), None);
    }

    #[test]
    fn test_decl_fields_take_bundle_internal_types() {
        let pool = Arc::new(CanonicalType {
            id: CanonicalTypeId::new(0),
            key: "(address token,uint24 fee)".into(),
            fields: vec![
                address("token"),
                Param::new("fee", ResolvedType::Primitive(Primitive::Uint(24))),
            ],
        });
        let decl = TypeDecl {
            name: "Pool".into(),
            labels: vec!["Pool".into()],
            field_internal_types: vec![Some("contract IERC20".into())],
            canonical: pool,
        };
        let fields: Vec<_> = decl.fields().collect();
        assert_eq!(fields[0].internal_type.as_deref(), Some("contract IERC20"));
        assert_eq!(fields[1].internal_type, None);
        assert_eq!(fields[1].name, "fee");
    }
}
