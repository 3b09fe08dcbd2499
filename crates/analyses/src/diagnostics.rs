use abi_bind_data::EntryKind;
use std::fmt;

/// What a naming conflict was about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Entry(EntryKind),
    Struct,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Entry(kind) => kind.fmt(f),
            Subject::Struct => f.write_str("struct"),
        }
    }
}

/// A same-named declaration that had to be emitted under a different name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConflict {
    pub bundle: String,
    pub subject: Subject,
    pub name: String,
    pub renamed_to: String,
    /// Contract the renamed declaration came from.
    pub contract: String,
    pub signature: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupStats {
    pub bundle: String,
    pub contracts: usize,
    pub input_entries: usize,
    pub output_entries: usize,
    pub merged_identical: usize,
    pub overload_groups: usize,
    pub composite_occurrences: usize,
    pub canonical_types: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    NamingConflictResolved(NamingConflict),
    DedupStats(DedupStats),
}

impl Diagnostic {
    pub fn bundle(&self) -> &str {
        match self {
            Diagnostic::NamingConflictResolved(conflict) => &conflict.bundle,
            Diagnostic::DedupStats(stats) => &stats.bundle,
        }
    }

    pub fn as_naming_conflict(&self) -> Option<&NamingConflict> {
        match self {
            Diagnostic::NamingConflictResolved(conflict) => Some(conflict),
            Diagnostic::DedupStats(_) => None,
        }
    }

    pub fn as_stats(&self) -> Option<&DedupStats> {
        match self {
            Diagnostic::DedupStats(stats) => Some(stats),
            Diagnostic::NamingConflictResolved(_) => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NamingConflictResolved(c) => write!(
                f,
                "{}: {} `{}` from `{}` ({}) emitted as `{}`",
                c.bundle, c.subject, c.name, c.contract, c.signature, c.renamed_to
            ),
            Diagnostic::DedupStats(s) => write!(
                f,
                "{}: {} contracts, {} -> {} entries ({} identical merged, {} overload groups), \
                 {} composite occurrences -> {} types",
                s.bundle,
                s.contracts,
                s.input_entries,
                s.output_entries,
                s.merged_identical,
                s.overload_groups,
                s.composite_occurrences,
                s.canonical_types
            ),
        }
    }
}
