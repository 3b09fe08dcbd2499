//! Front end: ABI type strings and compiler artifacts into the [`abi_bind_data`] model.

pub mod loader;
pub mod raw;
pub mod signature;

pub use loader::{LoadError, load_artifact, load_json, load_set};
pub use raw::{RawAbiEntry, RawArtifact, RawParam};
pub use signature::{TypeExpr, TypeParseError, parse_expr, parse_type, parse_type_with_components};
