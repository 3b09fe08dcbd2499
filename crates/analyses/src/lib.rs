//! Resolution core: turns loaded artifacts and a bundle configuration into deduplicated,
//! conflict free [`abi_bind_data::ResolvedBundle`]s.

pub mod declare;
pub mod diagnostics;
pub mod interner;
pub mod partition;
pub mod pipeline;
pub mod reconcile;

pub use diagnostics::{DedupStats, Diagnostic, NamingConflict, Subject};
pub use interner::{InternError, TypeInterner};
pub use partition::{Bundle, BundleSpec, MemberIdx, PartitionError, partition, partition_bundle};
pub use pipeline::{BundleOutput, GenerateError, GenerationOutput, Generator};
pub use reconcile::{ReconcileError, ReconcilePolicy, Reconciled, VersionReconciler};
