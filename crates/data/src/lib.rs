pub mod emit;
pub mod entry;
pub mod index;
pub mod resolved;
pub mod types;

pub use crate::{
    emit::{BindingEmitter, EmitError, EmitterCapabilities},
    entry::{
        AbiEntry, ArtifactSet, Constructor, ContractArtifact, CustomError, DuplicateContract,
        EntryKind, Event, Function, StateMutability,
    },
    index::*,
    resolved::{
        Conflict, ConflictResolution, ConflictSide, ResolvedBundle, ResolvedEntry, Selector,
        TypeDecl,
    },
    types::{AbiType, CanonicalType, Composite, Param, Primitive, ResolvedType, TypeRef},
};
