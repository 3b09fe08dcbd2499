use abi_bind_analyses::{BundleSpec, ReconcilePolicy};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

/// The `abi-bind.toml` document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Foundry artifact root, `out/` when unset.
    #[serde(default)]
    pub artifacts: Option<PathBuf>,
    #[serde(default, rename = "bundle")]
    pub bundles: Vec<BundleSpec>,
    #[serde(default)]
    pub policy: ReconcilePolicy,
}

impl Config {
    pub fn read(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        Self::parse(&source).with_context(|| format!("invalid config '{}'", path.display()))
    }

    pub fn parse(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Every contract name referenced by any bundle.
    pub fn referenced_contracts(&self) -> HashSet<&str> {
        self.bundles.iter().flat_map(|bundle| bundle.contract_names()).collect()
    }
}

/// Collects `(contract name, JSON)` for every referenced contract below `root`. Foundry nests
/// artifacts as `<Source>.sol/<Contract>.json`; the first match in path order wins.
pub fn discover_artifacts(root: &Path, wanted: &HashSet<&str>) -> Result<Vec<(String, String)>> {
    let mut paths = Vec::new();
    collect_json_files(root, &mut paths)
        .with_context(|| format!("failed to scan artifacts in '{}'", root.display()))?;
    paths.sort();

    let mut found = HashSet::new();
    let mut records = Vec::new();
    for path in paths {
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else { continue };
        if !wanted.contains(name) {
            continue;
        }
        if !found.insert(name.to_owned()) {
            tracing::warn!(contract = name, path = %path.display(), "ignoring duplicate artifact");
            continue;
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("failed to read artifact '{}'", path.display()))?;
        tracing::debug!(contract = name, path = %path.display(), "found artifact");
        records.push((name.to_owned(), json));
    }
    Ok(records)
}

fn collect_json_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_json_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            out.push(path);
        }
    }
    Ok(())
}
