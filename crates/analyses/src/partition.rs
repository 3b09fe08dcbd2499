use abi_bind_data::{
    ArtifactSet, ContractArtifact, ContractId, IndexLinearSet, IndexVec, newtype_index,
};
use serde::Deserialize;
use thiserror::Error;

newtype_index! {
    /// Position of a contract inside its bundle.
    pub struct MemberIdx;
}

/// One output unit as configured: a target name and the contracts it covers, in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BundleSpec {
    #[serde(rename = "out")]
    pub name: String,
    pub contracts: Vec<String>,
}

impl BundleSpec {
    pub fn new(
        name: impl Into<String>,
        contracts: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self { name: name.into(), contracts: contracts.into_iter().map(Into::into).collect() }
    }

    /// Contract names with any `.json` artifact suffix dropped.
    pub fn contract_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.contracts.iter().map(|contract| contract.strip_suffix(".json").unwrap_or(contract))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    #[error("bundle `{bundle}` references unknown contract `{contract}`")]
    UnknownContractReference { bundle: String, contract: String },
}

/// A bundle with every member looked up. Members keep configuration order, a contract listed
/// twice is only kept at its first position.
#[derive(Debug)]
pub struct Bundle<'a> {
    pub name: &'a str,
    pub members: IndexVec<MemberIdx, &'a ContractArtifact>,
}

impl Bundle<'_> {
    pub fn contract_names(&self) -> Vec<String> {
        self.members.iter().map(|artifact| artifact.name.clone()).collect()
    }
}

pub fn partition_bundle<'a>(
    artifacts: &'a ArtifactSet,
    spec: &'a BundleSpec,
) -> Result<Bundle<'a>, PartitionError> {
    let mut ids: IndexLinearSet<MemberIdx, ContractId> =
        IndexLinearSet::with_capacity(spec.contracts.len());
    for contract in spec.contract_names() {
        let id = artifacts.lookup(contract).ok_or_else(|| {
            PartitionError::UnknownContractReference {
                bundle: spec.name.clone(),
                contract: contract.to_owned(),
            }
        })?;
        if let Err(first) = ids.add(id) {
            tracing::debug!(bundle = %spec.name, contract, position = %first, "duplicate member");
        }
    }

    let members = ids.into_inner().into_iter().map(|id| &artifacts[id]).collect();
    Ok(Bundle { name: &spec.name, members })
}

/// Partitions every configured bundle, failing on the first unknown reference.
pub fn partition<'a>(
    artifacts: &'a ArtifactSet,
    specs: &'a [BundleSpec],
) -> Result<Vec<Bundle<'a>>, PartitionError> {
    specs.iter().map(|spec| partition_bundle(artifacts, spec)).collect()
}
