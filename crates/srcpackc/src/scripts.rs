use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::metadata::ProjectMeta;

/// An executable script shipped with the distribution.
#[derive(Debug, Clone)]
pub struct ScriptAsset {
    pub logical_path: String,
    pub absolute_path: PathBuf,
    pub bytes: Vec<u8>,
    pub sha256: String,
    pub size: u64,
}

/// Resolves every declared script against the project root.
///
/// The build must fail rather than silently omit a script, so all missing
/// paths are gathered and reported in one error.
pub fn collect_scripts(project_dir: &Path, meta: &ProjectMeta) -> Result<Vec<ScriptAsset>> {
    let mut scripts = Vec::new();
    let mut seen_paths = BTreeSet::new();
    let mut missing = Vec::new();

    for declared in &meta.scripts {
        let relative = PathBuf::from(declared);
        let logical_path = relative
            .components()
            .map(|comp| comp.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if !seen_paths.insert(logical_path.clone()) {
            anyhow::bail!("duplicate script declared: {}", logical_path);
        }

        let absolute_path = project_dir.join(&relative);
        if !absolute_path.is_file() {
            missing.push(logical_path);
            continue;
        }

        let bytes = fs::read(&absolute_path)
            .with_context(|| format!("failed to read script {}", absolute_path.display()))?;
        let sha256 = hex::encode(Sha256::digest(&bytes));
        let size = bytes.len() as u64;

        scripts.push(ScriptAsset {
            logical_path,
            absolute_path,
            bytes,
            sha256,
            size,
        });
    }

    if !missing.is_empty() {
        anyhow::bail!("declared scripts not found: {}", missing.join(", "));
    }

    scripts.sort_by(|a, b| a.logical_path.cmp(&b.logical_path));
    Ok(scripts)
}
