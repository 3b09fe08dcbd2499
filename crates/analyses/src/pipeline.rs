//! Drives partitioning, interning, reconciliation and type declaration for every configured
//! bundle.

use crate::{
    declare::{TypeUsage, declare_types, topological_order},
    diagnostics::{DedupStats, Diagnostic},
    interner::{InternError, TypeInterner},
    partition::{BundleSpec, PartitionError, partition_bundle},
    reconcile::{MemberEntries, ReconcileError, ReconcilePolicy, VersionReconciler},
};
use abi_bind_data::{ArtifactSet, EmitterCapabilities, ResolvedBundle};
use abi_bind_parser::{LoadError, load_json};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Partition(#[from] PartitionError),
    #[error("contract `{contract}`, entry `{entry}`: {source}")]
    Intern {
        contract: String,
        entry: String,
        #[source]
        source: InternError,
    },
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error("bundle `{0}` was not resolved, its worker panicked")]
    WorkerPanicked(String),
}

/// A resolved bundle together with what happened while resolving it.
#[derive(Debug, Clone)]
pub struct BundleOutput {
    pub bundle: ResolvedBundle,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Default)]
pub struct GenerationOutput {
    pub bundles: Vec<ResolvedBundle>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationOutput {
    fn push(&mut self, output: BundleOutput) {
        self.bundles.push(output.bundle);
        self.diagnostics.extend(output.diagnostics);
    }
}

/// One generation run over a loaded artifact set. Every run creates a fresh interner, so no
/// canonical type outlives the run that created it.
pub struct Generator {
    artifacts: ArtifactSet,
    bundles: Vec<BundleSpec>,
    policy: ReconcilePolicy,
    capabilities: EmitterCapabilities,
}

impl Generator {
    pub fn new(artifacts: ArtifactSet, bundles: Vec<BundleSpec>) -> Self {
        Self {
            artifacts,
            bundles,
            policy: ReconcilePolicy::default(),
            capabilities: EmitterCapabilities::default(),
        }
    }

    /// Loads `(contract name, artifact JSON)` records and builds a generator over them.
    pub fn from_json<'a>(
        records: impl IntoIterator<Item = (&'a str, &'a str)>,
        bundles: Vec<BundleSpec>,
    ) -> Result<Self, GenerateError> {
        let mut artifacts = ArtifactSet::new();
        for (name, json) in records {
            artifacts
                .insert(load_json(name, json)?)
                .map_err(|duplicate| LoadError::DuplicateContract(duplicate.0))?;
        }
        Ok(Self::new(artifacts, bundles))
    }

    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Capabilities of the emitter the bundles are resolved for.
    pub fn with_capabilities(mut self, capabilities: EmitterCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn artifacts(&self) -> &ArtifactSet {
        &self.artifacts
    }

    pub fn bundles(&self) -> &[BundleSpec] {
        &self.bundles
    }

    /// Resolves every bundle in configuration order, stopping at the first failure.
    pub fn run(&self) -> Result<GenerationOutput, GenerateError> {
        let interner = TypeInterner::new();
        let mut output = GenerationOutput::default();
        for spec in &self.bundles {
            output.push(self.resolve_bundle(&interner, spec)?);
        }
        info!(bundles = output.bundles.len(), types = interner.len(), "generation complete");
        Ok(output)
    }

    /// Resolves bundles on `jobs` workers sharing one interner. Once a bundle fails no new
    /// bundles are started, and the first failure in configuration order is returned.
    pub fn run_parallel(&self, jobs: usize) -> Result<GenerationOutput, GenerateError> {
        let mut output = GenerationOutput::default();
        // Bundles are claimed in order, so skipped slots only ever follow a failure.
        for (result, spec) in self.drive(jobs, true).into_iter().zip(&self.bundles) {
            match result {
                Some(result) => output.push(result?),
                None => return Err(GenerateError::WorkerPanicked(spec.name.clone())),
            }
        }
        Ok(output)
    }

    /// Resolves every bundle independently: a failing bundle does not keep the others from
    /// completing. Results are in configuration order.
    pub fn run_each(&self, jobs: usize) -> Vec<Result<BundleOutput, GenerateError>> {
        self.drive(jobs, false)
            .into_iter()
            .zip(&self.bundles)
            .map(|(result, spec)| {
                result.unwrap_or_else(|| Err(GenerateError::WorkerPanicked(spec.name.clone())))
            })
            .collect()
    }

    /// Slots left `None` were either skipped after a failure or lost to a panicking worker.
    fn drive(
        &self,
        jobs: usize,
        stop_on_error: bool,
    ) -> Vec<Option<Result<BundleOutput, GenerateError>>> {
        let interner = TypeInterner::new();
        let jobs = jobs.clamp(1, self.bundles.len().max(1));
        info!(bundles = self.bundles.len(), jobs, "resolving bundles");

        if jobs == 1 {
            let mut results = Vec::with_capacity(self.bundles.len());
            for spec in &self.bundles {
                let result = self.resolve_bundle(&interner, spec);
                let failed = result.is_err();
                results.push(Some(result));
                if failed && stop_on_error {
                    break;
                }
            }
            results.resize_with(self.bundles.len(), || None);
            return results;
        }

        let next = AtomicUsize::new(0);
        let failed = AtomicBool::new(false);
        let results = Mutex::new((0..self.bundles.len()).map(|_| None).collect::<Vec<_>>());
        let scope = crossbeam::scope(|scope| {
            for _ in 0..jobs {
                scope.spawn(|_| {
                    loop {
                        if stop_on_error && failed.load(Ordering::Acquire) {
                            break;
                        }
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(spec) = self.bundles.get(index) else { break };
                        let result = self.resolve_bundle(&interner, spec);
                        if result.is_err() {
                            failed.store(true, Ordering::Release);
                        }
                        results.lock()[index] = Some(result);
                    }
                });
            }
        });
        if scope.is_err() {
            warn!("a bundle worker panicked");
        }
        results.into_inner()
    }

    /// Resolves a single bundle against `interner`.
    #[instrument(name = "bundle", skip_all, fields(name = %spec.name))]
    pub fn resolve_bundle(
        &self,
        interner: &TypeInterner,
        spec: &BundleSpec,
    ) -> Result<BundleOutput, GenerateError> {
        let bundle = partition_bundle(&self.artifacts, spec)?;

        let mut usage = TypeUsage::new();
        let mut members = Vec::with_capacity(bundle.members.len());
        for artifact in bundle.members.iter() {
            let mut entries = Vec::with_capacity(artifact.abi.len());
            for entry in &artifact.abi {
                let resolved = entry
                    .try_map_types(|ty| {
                        interner.resolve_observed(ty, &mut |canonical, source| {
                            usage.record(canonical, source)
                        })
                    })
                    .map_err(|source| GenerateError::Intern {
                        contract: artifact.name.clone(),
                        entry: entry.to_string(),
                        source,
                    })?;
                entries.push(resolved);
            }
            members.push(MemberEntries { contract: &artifact.name, entries });
        }

        let reconciled =
            VersionReconciler::new(bundle.name, self.policy, self.capabilities).reconcile(members)?;
        let (types, type_renames) =
            declare_types(bundle.name, topological_order(&reconciled.entries), &usage);

        let stats = DedupStats {
            bundle: bundle.name.to_owned(),
            contracts: bundle.members.len(),
            input_entries: reconciled.stats.input_entries,
            output_entries: reconciled.entries.len(),
            merged_identical: reconciled.stats.merged_identical,
            overload_groups: reconciled.stats.overload_groups,
            composite_occurrences: usage.occurrences(),
            canonical_types: types.len(),
        };
        debug!(
            input_entries = stats.input_entries,
            output_entries = stats.output_entries,
            merged_identical = stats.merged_identical,
            overload_groups = stats.overload_groups,
            composite_occurrences = stats.composite_occurrences,
            canonical_types = stats.canonical_types,
            "deduplicated"
        );

        let diagnostics = reconciled
            .renames
            .into_iter()
            .chain(type_renames)
            .map(Diagnostic::NamingConflictResolved)
            .chain([Diagnostic::DedupStats(stats)])
            .collect();

        Ok(BundleOutput {
            bundle: ResolvedBundle {
                name: bundle.name.to_owned(),
                contracts: bundle.contract_names(),
                types,
                entries: reconciled.entries,
                conflicts: reconciled.conflicts,
            },
            diagnostics,
        })
    }
}
