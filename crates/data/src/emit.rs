//! The contract between the resolution core and target language backends.

use crate::{EntryKind, ResolvedBundle};
use thiserror::Error;

/// What a target representation can express. Drives the reconciler's choice between merging
/// same-named entries as overloads and renaming them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitterCapabilities {
    pub overloaded_functions: bool,
    pub overloaded_events: bool,
    pub overloaded_errors: bool,
}

impl EmitterCapabilities {
    pub fn allows_overloads(&self, kind: EntryKind) -> bool {
        match kind {
            EntryKind::Function => self.overloaded_functions,
            EntryKind::Event => self.overloaded_events,
            EntryKind::Error => self.overloaded_errors,
            // Contract scoped entries have no name to disambiguate by.
            EntryKind::Constructor | EntryKind::Fallback | EntryKind::Receive => true,
        }
    }
}

impl Default for EmitterCapabilities {
    fn default() -> Self {
        Self { overloaded_functions: true, overloaded_events: false, overloaded_errors: false }
    }
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("bundle `{bundle}`: type {id} is used but not declared")]
    UndeclaredType { bundle: String, id: crate::CanonicalTypeId },
    #[error("bundle `{bundle}`: {reason}")]
    Unsupported { bundle: String, reason: String },
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
}

/// Renders a resolved bundle into target language source. Implementations must not re-run
/// deduplication or conflict resolution, the model is final.
pub trait BindingEmitter {
    fn capabilities(&self) -> EmitterCapabilities {
        EmitterCapabilities::default()
    }

    fn emit(&self, bundle: &ResolvedBundle) -> Result<String, EmitError>;
}
