//! Merges the entries of every contract in a bundle into one conflict free list.
//!
//! Entries are grouped by `(kind, name)` in order of first appearance. Inside a group, entries
//! with an identical shape collapse into one attributed to the first declaring contract. The
//! remaining distinct shapes become overloads when the target can express them, otherwise every
//! variant after the first is renamed with its contract as suffix.

use crate::diagnostics::{NamingConflict, Subject};
use abi_bind_data::{
    AbiEntry, Conflict, ConflictResolution, ConflictSide, EmitterCapabilities, EntryKind,
    ResolvedEntry, ResolvedType,
};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// User tunable reconciliation settings, the `[policy]` table of a bundle configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcilePolicy {
    /// Reject instead of resolving conflicts between entries of different contracts.
    pub strict: bool,
    pub overloaded_events: Option<bool>,
    pub overloaded_errors: Option<bool>,
}

impl ReconcilePolicy {
    pub fn strict() -> Self {
        Self { strict: true, ..Self::default() }
    }

    /// `base` with this policy's overrides applied.
    pub fn capabilities(&self, base: EmitterCapabilities) -> EmitterCapabilities {
        EmitterCapabilities {
            overloaded_events: self.overloaded_events.unwrap_or(base.overloaded_events),
            overloaded_errors: self.overloaded_errors.unwrap_or(base.overloaded_errors),
            ..base
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error(
        "bundle `{bundle}`: {kind} `{name}` is declared as `{first_signature}` by `{first}` and \
         as `{second_signature}` by `{second}`, rejected by strict policy"
    )]
    ConflictRejected {
        bundle: String,
        kind: EntryKind,
        name: String,
        first: String,
        first_signature: String,
        second: String,
        second_signature: String,
    },
}

/// The resolved entries of one member contract, in declaration order.
pub struct MemberEntries<'a> {
    pub contract: &'a str,
    pub entries: Vec<AbiEntry<ResolvedType>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub input_entries: usize,
    pub merged_identical: usize,
    pub overload_groups: usize,
}

#[derive(Debug, Clone)]
pub struct Reconciled {
    pub entries: Vec<ResolvedEntry>,
    pub conflicts: Vec<Conflict>,
    pub renames: Vec<NamingConflict>,
    pub stats: ReconcileStats,
}

/// One distinct shape inside a `(kind, name)` group.
struct Variant {
    entry: AbiEntry<ResolvedType>,
    shape: String,
    inputs: String,
    declared_by: Vec<String>,
    /// Position of first appearance across the whole bundle.
    order: usize,
}

impl Variant {
    fn origin(&self) -> &str {
        &self.declared_by[0]
    }

    fn side(&self) -> ConflictSide {
        ConflictSide { contract: self.origin().to_owned(), signature: self.entry.to_string() }
    }

    fn into_resolved(
        self,
        emitted_name: String,
        resolution: Option<ConflictResolution>,
    ) -> ResolvedEntry {
        ResolvedEntry {
            origin: self.declared_by[0].clone(),
            declared_by: self.declared_by,
            entry: self.entry,
            emitted_name,
            resolution,
        }
    }
}

struct Group {
    kind: EntryKind,
    name: String,
    variants: Vec<Variant>,
}

pub struct VersionReconciler<'b> {
    bundle: &'b str,
    policy: ReconcilePolicy,
    capabilities: EmitterCapabilities,
}

impl<'b> VersionReconciler<'b> {
    pub fn new(bundle: &'b str, policy: ReconcilePolicy, capabilities: EmitterCapabilities) -> Self {
        Self { bundle, policy, capabilities: policy.capabilities(capabilities) }
    }

    /// Reconciles `members`, given in bundle declaration order.
    pub fn reconcile(&self, members: Vec<MemberEntries<'_>>) -> Result<Reconciled, ReconcileError> {
        let mut stats = ReconcileStats::default();
        let mut groups: Vec<Group> = Vec::new();
        let mut group_of: HashMap<(EntryKind, String), usize> = HashMap::new();
        let mut order = 0;

        for member in members {
            for entry in member.entries {
                stats.input_entries += 1;
                let key = (entry.kind(), entry.name().to_owned());
                let group = *group_of.entry(key).or_insert_with(|| {
                    groups.push(Group {
                        kind: entry.kind(),
                        name: entry.name().to_owned(),
                        variants: Vec::new(),
                    });
                    groups.len() - 1
                });
                let group = &mut groups[group];

                let shape = entry.shape();
                if let Some(variant) = group.variants.iter_mut().find(|v| v.shape == shape) {
                    stats.merged_identical += 1;
                    if !variant.declared_by.iter().any(|c| c == member.contract) {
                        variant.declared_by.push(member.contract.to_owned());
                    }
                    continue;
                }
                group.variants.push(Variant {
                    inputs: entry.input_signature(),
                    shape,
                    entry,
                    declared_by: vec![member.contract.to_owned()],
                    order,
                });
                order += 1;
            }
        }

        // Every name in use, so generated names never shadow a declared one.
        let mut taken: HashSet<(EntryKind, String)> =
            groups.iter().map(|group| (group.kind, group.name.clone())).collect();

        let mut entries = Vec::with_capacity(order);
        let mut conflicts = Vec::new();
        let mut renames = Vec::new();
        for group in groups {
            self.settle(group, &mut taken, &mut entries, &mut conflicts, &mut renames, &mut stats)?;
        }

        Ok(Reconciled { entries, conflicts, renames, stats })
    }

    fn settle(
        &self,
        group: Group,
        taken: &mut HashSet<(EntryKind, String)>,
        entries: &mut Vec<ResolvedEntry>,
        conflicts: &mut Vec<Conflict>,
        renames: &mut Vec<NamingConflict>,
        stats: &mut ReconcileStats,
    ) -> Result<(), ReconcileError> {
        let Group { kind, name, variants } = group;
        let mut variants = variants.into_iter();
        let Some(first) = variants.next() else { return Ok(()) };

        let mut kept = vec![first];
        let mut renamed = Vec::new();
        for variant in variants {
            let first = &kept[0];
            let cross_contract = variant.origin() != first.origin();
            let resolution = if self.policy.strict && cross_contract {
                ConflictResolution::Reject
            } else if self.capabilities.allows_overloads(kind)
                && kept.iter().all(|k| k.inputs != variant.inputs)
            {
                ConflictResolution::MergeAsOverload
            } else {
                ConflictResolution::RenameWithSuffix
            };

            conflicts.push(Conflict {
                kind,
                name: name.clone(),
                first: first.side(),
                second: variant.side(),
                resolution,
            });

            match resolution {
                ConflictResolution::Reject => {
                    return Err(ReconcileError::ConflictRejected {
                        bundle: self.bundle.to_owned(),
                        kind,
                        name,
                        first: first.origin().to_owned(),
                        first_signature: first.entry.to_string(),
                        second: variant.origin().to_owned(),
                        second_signature: variant.entry.to_string(),
                    });
                }
                ConflictResolution::MergeAsOverload => kept.push(variant),
                ConflictResolution::RenameWithSuffix => {
                    let renamed_to = unique_name(taken, kind, &name, variant.origin());
                    tracing::warn!(
                        bundle = self.bundle,
                        %kind,
                        name = %name,
                        contract = variant.origin(),
                        renamed_to = %renamed_to,
                        "renamed conflicting entry"
                    );
                    renames.push(NamingConflict {
                        bundle: self.bundle.to_owned(),
                        subject: Subject::Entry(kind),
                        name: name.clone(),
                        renamed_to: renamed_to.clone(),
                        contract: variant.origin().to_owned(),
                        signature: variant.entry.to_string(),
                    });
                    renamed.push((variant, renamed_to));
                }
            }
        }

        let overloaded = kept.len() > 1;
        if overloaded {
            stats.overload_groups += 1;
            kept.sort_by_key(|variant| (variant.entry.inputs().len(), variant.order));
        }
        let resolution = overloaded.then_some(ConflictResolution::MergeAsOverload);
        entries.extend(
            kept.into_iter().map(|variant| variant.into_resolved(name.clone(), resolution)),
        );
        entries.extend(renamed.into_iter().map(|(variant, renamed_to)| {
            variant.into_resolved(renamed_to, Some(ConflictResolution::RenameWithSuffix))
        }));
        Ok(())
    }
}

/// `{name}_{contract}`, with a numeric suffix if even that is taken. Contract scoped entries have
/// no name and are renamed to the contract alone.
fn unique_name(
    taken: &mut HashSet<(EntryKind, String)>,
    kind: EntryKind,
    name: &str,
    contract: &str,
) -> String {
    let base = if name.is_empty() { contract.to_owned() } else { format!("{name}_{contract}") };
    let mut candidate = base.clone();
    let mut k = 2;
    while taken.contains(&(kind, candidate.clone())) {
        candidate = format!("{base}_{k}");
        k += 1;
    }
    taken.insert((kind, candidate.clone()));
    candidate
}
