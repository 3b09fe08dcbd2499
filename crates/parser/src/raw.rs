//! ABI JSON records exactly as emitted by the Solidity compiler and foundry.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub internal_type: Option<String>,
    #[serde(default)]
    pub components: Option<Vec<RawParam>>,
    #[serde(default)]
    pub indexed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAbiEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<RawParam>,
    #[serde(default)]
    pub outputs: Vec<RawParam>,
    #[serde(default)]
    pub state_mutability: Option<String>,
    #[serde(default)]
    pub anonymous: Option<bool>,
    /// Pre 0.5 compilers.
    #[serde(default)]
    pub constant: Option<bool>,
    /// Pre 0.5 compilers.
    #[serde(default)]
    pub payable: Option<bool>,
}

/// Either a bare ABI array or a compiler artifact object carrying one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawArtifact {
    Abi(Vec<RawAbiEntry>),
    Artifact { abi: Vec<RawAbiEntry> },
}

impl RawArtifact {
    pub fn into_entries(self) -> Vec<RawAbiEntry> {
        match self {
            RawArtifact::Abi(entries) | RawArtifact::Artifact { abi: entries } => entries,
        }
    }
}
