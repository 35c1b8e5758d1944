use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Marker file that makes a directory an importable package.
pub const PACKAGE_MARKER: &str = "__init__.py";

/// The packages discovered under one project root.
#[derive(Debug, Clone, Default)]
pub struct PackageSet {
    /// Dotted package names, sorted.
    pub names: Vec<String>,
    /// Every file carried by those packages, sorted by logical path.
    pub assets: Vec<PackageAsset>,
}

#[derive(Debug, Clone)]
pub struct PackageAsset {
    pub logical_path: String,
    pub absolute_path: PathBuf,
    pub bytes: Vec<u8>,
    pub sha256: String,
    pub size: u64,
}

/// Walks the project root and collects every importable package.
///
/// A top-level directory is a package when it carries the marker file; a
/// nested directory only counts when every directory between it and the
/// project root carries the marker too. Files inside non-package directories
/// are not shipped. Hidden directories and `__pycache__` are skipped.
pub fn discover_packages(project_dir: &Path) -> Result<PackageSet> {
    let mut names = Vec::new();
    let mut assets = Vec::new();

    let roots = fs::read_dir(project_dir)
        .with_context(|| format!("failed to read directory {}", project_dir.display()))?;
    for entry in roots {
        let entry = entry
            .with_context(|| format!("failed to read directory {}", project_dir.display()))?;
        let path = entry.path();
        if !path.is_dir() || is_hidden(&path) || is_pycache(&path) || !is_package_dir(&path) {
            continue;
        }
        collect_package_tree(project_dir, &path, &mut names, &mut assets)?;
    }

    names.sort();
    assets.sort_by(|a, b| a.logical_path.cmp(&b.logical_path));
    Ok(PackageSet { names, assets })
}

fn collect_package_tree(
    project_dir: &Path,
    package_root: &Path,
    names: &mut Vec<String>,
    assets: &mut Vec<PackageAsset>,
) -> Result<()> {
    let walker = WalkDir::new(package_root)
        .into_iter()
        .filter_entry(|entry| {
            if !entry.file_type().is_dir() {
                return !is_hidden(entry.path());
            }
            if entry.depth() == 0 {
                return true;
            }
            !is_hidden(entry.path()) && !is_pycache(entry.path()) && is_package_dir(entry.path())
        });

    for entry in walker {
        let entry = entry.with_context(|| {
            format!("failed to walk package tree {}", package_root.display())
        })?;
        let path = entry.into_path();
        let relative = path
            .strip_prefix(project_dir)
            .unwrap_or_else(|_| path.as_path())
            .to_path_buf();

        if path.is_dir() {
            names.push(dotted_name(&relative));
            continue;
        }

        let bytes = fs::read(&path)
            .with_context(|| format!("failed to read package file {}", path.display()))?;
        let sha256 = hex::encode(Sha256::digest(&bytes));
        let size = bytes.len() as u64;

        assets.push(PackageAsset {
            logical_path: logical_path(&relative),
            absolute_path: path,
            bytes,
            sha256,
            size,
        });
    }

    Ok(())
}

fn is_package_dir(path: &Path) -> bool {
    path.join(PACKAGE_MARKER).is_file()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn is_pycache(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name == "__pycache__")
        .unwrap_or(false)
}

fn dotted_name(relative: &Path) -> String {
    relative
        .components()
        .map(|comp| comp.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join(".")
}

fn logical_path(relative: &Path) -> String {
    relative
        .components()
        .map(|comp| comp.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
