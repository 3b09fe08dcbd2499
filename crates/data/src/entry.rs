//! ABI entries and contract artifacts.

use crate::{
    ContractId, IndexVec, TypeRef,
    types::{AbiType, Param, write_tuple_signature},
};
use std::{collections::HashMap, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryKind {
    Function,
    Event,
    Error,
    Constructor,
    Fallback,
    Receive,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Function => "function",
            EntryKind::Event => "event",
            EntryKind::Error => "error",
            EntryKind::Constructor => "constructor",
            EntryKind::Fallback => "fallback",
            EntryKind::Receive => "receive",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateMutability {
    Pure,
    View,
    NonPayable,
    Payable,
}

impl StateMutability {
    pub fn as_str(self) -> &'static str {
        match self {
            StateMutability::Pure => "pure",
            StateMutability::View => "view",
            StateMutability::NonPayable => "nonpayable",
            StateMutability::Payable => "payable",
        }
    }
}

impl fmt::Display for StateMutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Function<T> {
    pub name: String,
    pub inputs: Vec<Param<T>>,
    pub outputs: Vec<Param<T>>,
    pub state_mutability: StateMutability,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event<T> {
    pub name: String,
    pub inputs: Vec<Param<T>>,
    pub anonymous: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomError<T> {
    pub name: String,
    pub inputs: Vec<Param<T>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constructor<T> {
    pub inputs: Vec<Param<T>>,
    pub state_mutability: StateMutability,
}

/// One element of a contract ABI. `T` is the parameter type representation: [`TypeRef`] as
/// loaded, [`crate::ResolvedType`] once composites are interned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AbiEntry<T = TypeRef> {
    Function(Function<T>),
    Event(Event<T>),
    Error(CustomError<T>),
    Constructor(Constructor<T>),
    Fallback { state_mutability: StateMutability },
    Receive,
}

impl<T> AbiEntry<T> {
    pub fn kind(&self) -> EntryKind {
        match self {
            AbiEntry::Function(_) => EntryKind::Function,
            AbiEntry::Event(_) => EntryKind::Event,
            AbiEntry::Error(_) => EntryKind::Error,
            AbiEntry::Constructor(_) => EntryKind::Constructor,
            AbiEntry::Fallback { .. } => EntryKind::Fallback,
            AbiEntry::Receive => EntryKind::Receive,
        }
    }

    /// Declared name, empty for constructor, fallback and receive.
    pub fn name(&self) -> &str {
        match self {
            AbiEntry::Function(function) => &function.name,
            AbiEntry::Event(event) => &event.name,
            AbiEntry::Error(error) => &error.name,
            AbiEntry::Constructor(_) | AbiEntry::Fallback { .. } | AbiEntry::Receive => "",
        }
    }

    pub fn inputs(&self) -> &[Param<T>] {
        match self {
            AbiEntry::Function(function) => &function.inputs,
            AbiEntry::Event(event) => &event.inputs,
            AbiEntry::Error(error) => &error.inputs,
            AbiEntry::Constructor(constructor) => &constructor.inputs,
            AbiEntry::Fallback { .. } | AbiEntry::Receive => &[],
        }
    }

    pub fn outputs(&self) -> &[Param<T>] {
        match self {
            AbiEntry::Function(function) => &function.outputs,
            _ => &[],
        }
    }

    pub fn state_mutability(&self) -> Option<StateMutability> {
        match self {
            AbiEntry::Function(function) => Some(function.state_mutability),
            AbiEntry::Constructor(constructor) => Some(constructor.state_mutability),
            AbiEntry::Fallback { state_mutability } => Some(*state_mutability),
            AbiEntry::Receive => Some(StateMutability::Payable),
            AbiEntry::Event(_) | AbiEntry::Error(_) => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, AbiEntry::Event(Event { anonymous: true, .. }))
    }

    /// Rebuilds the entry with every parameter type converted by `f`, stopping at the first
    /// failure.
    pub fn try_map_types<U, E>(
        &self,
        mut f: impl FnMut(&T) -> Result<U, E>,
    ) -> Result<AbiEntry<U>, E> {
        let mut map_params = |params: &[Param<T>]| -> Result<Vec<Param<U>>, E> {
            params.iter().map(|param| param.try_map_type(&mut f)).collect()
        };
        Ok(match self {
            AbiEntry::Function(function) => AbiEntry::Function(Function {
                name: function.name.clone(),
                inputs: map_params(&function.inputs)?,
                outputs: map_params(&function.outputs)?,
                state_mutability: function.state_mutability,
            }),
            AbiEntry::Event(event) => AbiEntry::Event(Event {
                name: event.name.clone(),
                inputs: map_params(&event.inputs)?,
                anonymous: event.anonymous,
            }),
            AbiEntry::Error(error) => AbiEntry::Error(CustomError {
                name: error.name.clone(),
                inputs: map_params(&error.inputs)?,
            }),
            AbiEntry::Constructor(constructor) => AbiEntry::Constructor(Constructor {
                inputs: map_params(&constructor.inputs)?,
                state_mutability: constructor.state_mutability,
            }),
            AbiEntry::Fallback { state_mutability } => {
                AbiEntry::Fallback { state_mutability: *state_mutability }
            }
            AbiEntry::Receive => AbiEntry::Receive,
        })
    }
}

impl<T: AbiType> AbiEntry<T> {
    /// Input tuple signature, e.g. `(address,bytes32)`. Event inputs carry their `indexed`
    /// markers since they change how the event is decoded.
    pub fn input_signature(&self) -> String {
        let mut out = String::new();
        if let AbiEntry::Event(event) = self {
            write_event_inputs(&mut out, &event.inputs);
        } else {
            write_tuple_signature(&mut out, self.inputs());
        }
        out
    }

    /// `name(types)` as hashed for selectors and topics.
    pub fn signature(&self) -> String {
        let mut out = String::from(self.name());
        write_tuple_signature(&mut out, self.inputs());
        out
    }

    /// Every normative part of the entry besides its name: inputs, outputs, mutability and
    /// event anonymity. Two entries with equal shapes declare the same thing.
    pub fn shape(&self) -> String {
        let mut out = self.input_signature();
        if let AbiEntry::Function(function) = self {
            out.push_str("->");
            write_tuple_signature(&mut out, &function.outputs);
        }
        if let Some(mutability) = self.state_mutability() {
            out.push(' ');
            out.push_str(mutability.as_str());
        }
        if self.is_anonymous() {
            out.push_str(" anonymous");
        }
        out
    }
}

fn write_event_inputs<T: AbiType>(out: &mut String, params: &[Param<T>]) {
    out.push('(');
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        param.ty.write_signature(out);
        if param.indexed {
            out.push_str(" indexed");
        }
    }
    out.push(')');
}

impl<T: AbiType> fmt::Display for AbiEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.kind())?;
        if matches!(self, AbiEntry::Event(_)) {
            write!(f, "{}{}", self.name(), self.input_signature())?;
        } else {
            write!(f, "{}", self.signature())?;
        }
        if let AbiEntry::Function(function) = self {
            if !function.outputs.is_empty() {
                let mut outputs = String::new();
                write_tuple_signature(&mut outputs, &function.outputs);
                write!(f, " returns {outputs}")?;
            }
        }
        match self {
            AbiEntry::Function(_) | AbiEntry::Constructor(_) | AbiEntry::Fallback { .. } => {
                if let Some(mutability) = self.state_mutability() {
                    write!(f, " {mutability}")?;
                }
            }
            AbiEntry::Event(event) if event.anonymous => write!(f, " anonymous")?,
            _ => {}
        }
        Ok(())
    }
}

/// A compiled contract. Created once by the loader and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
    pub name: String,
    pub abi: Vec<AbiEntry>,
}

#[derive(Debug)]
pub struct DuplicateContract(pub String);

/// Every loaded artifact of one generation run, in load order.
#[derive(Debug, Default)]
pub struct ArtifactSet {
    artifacts: IndexVec<ContractId, ContractArtifact>,
    by_name: HashMap<String, ContractId>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, artifact: ContractArtifact) -> Result<ContractId, DuplicateContract> {
        if self.by_name.contains_key(&artifact.name) {
            return Err(DuplicateContract(artifact.name));
        }
        let name = artifact.name.clone();
        let id = self.artifacts.push(artifact);
        self.by_name.insert(name, id);
        Ok(id)
    }

    pub fn lookup(&self, name: &str) -> Option<ContractId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&ContractArtifact> {
        self.lookup(name).map(|id| &self.artifacts[id])
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContractId, &ContractArtifact)> + '_ {
        self.artifacts.iter_enumerated()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl std::ops::Index<ContractId> for ArtifactSet {
    type Output = ContractArtifact;

    fn index(&self, id: ContractId) -> &Self::Output {
        &self.artifacts[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Primitive;

    fn prim(primitive: Primitive) -> TypeRef {
        TypeRef::Primitive(primitive)
    }

    fn get_passkey(with_authenticator: bool) -> AbiEntry {
        let mut inputs = vec![Param::new("_smartWallet", prim(Primitive::Address))];
        if with_authenticator {
            inputs.push(Param::new("_authenticatorId", prim(Primitive::FixedBytes(32))));
        }
        AbiEntry::Function(Function {
            name: "getPasskey".into(),
            inputs,
            outputs: vec![Param::new("", prim(Primitive::FixedBytes(32)))],
            state_mutability: StateMutability::View,
        })
    }

    #[test]
    fn test_signatures() {
        let entry = get_passkey(true);
        assert_eq!(entry.signature(), "getPasskey(address,bytes32)");
        assert_eq!(entry.input_signature(), "(address,bytes32)");
        assert_eq!(entry.shape(), "(address,bytes32)->(bytes32) view");
        assert_eq!(entry.to_string(), "function getPasskey(address,bytes32) returns (bytes32) view");
    }

    #[test]
    fn test_event_shape_includes_indexed() {
        let event = |indexed: bool| {
            let mut account = Param::new("smartAccount", prim(Primitive::Address));
            account.indexed = indexed;
            AbiEntry::Event(Event {
                name: "PrimaryPassKeyChanged".into(),
                inputs: vec![account],
                anonymous: false,
            })
        };
        assert_eq!(event(true).signature(), event(false).signature());
        assert_ne!(event(true).shape(), event(false).shape());
        assert_eq!(event(true).to_string(), "event PrimaryPassKeyChanged(address indexed)");
    }

    #[test]
    fn test_unnamed_entries() {
        let constructor: AbiEntry = AbiEntry::Constructor(Constructor {
            inputs: vec![Param::new("_p256Verifier", prim(Primitive::Address))],
            state_mutability: StateMutability::NonPayable,
        });
        assert_eq!(constructor.name(), "");
        assert_eq!(constructor.signature(), "(address)");
        assert_eq!(constructor.to_string(), "constructor (address) nonpayable");
        assert_eq!(AbiEntry::<TypeRef>::Receive.state_mutability(), Some(StateMutability::Payable));
    }

    #[test]
    fn test_try_map_types_stops_on_error() {
        let entry = get_passkey(true);
        let mut seen = 0;
        let result: Result<AbiEntry<()>, &str> = entry.try_map_types(|_| {
            seen += 1;
            if seen == 2 { Err("boom") } else { Ok(()) }
        });
        assert_eq!(result, Err("boom"));
    }

    #[test]
    fn test_artifact_set_rejects_duplicate_names() {
        let mut set = ArtifactSet::new();
        let artifact = ContractArtifact { name: "Validator".into(), abi: vec![] };
        let id = set.insert(artifact.clone()).unwrap();
        assert_eq!(set.lookup("Validator"), Some(id));
        assert!(set.insert(artifact).is_err());
        assert_eq!(set.len(), 1);
    }
}
