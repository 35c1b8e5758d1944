use serde::{Deserialize, Serialize};

/// Logical path of the manifest inside a built archive.
pub const MANIFEST_NAME: &str = "MANIFEST.json";

/// Manifest describing a built source distribution.
///
/// One manifest is embedded in every archive as [`MANIFEST_NAME`] and a copy
/// is written next to the archive for tooling that does not want to open the
/// zip. `install_requires` and `tests_require` are always present so readers
/// can rely on the shape; the builder currently emits them empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DistManifest {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub author_email: String,
    pub url: String,
    pub created_at: String,
    pub packages: Vec<String>,
    pub scripts: Vec<FileEntry>,
    pub files: Vec<FileEntry>,
    pub install_requires: Vec<String>,
    pub tests_require: Vec<String>,
}

/// A single file carried by the distribution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEntry {
    pub logical_path: String,
    pub sha256: String,
    pub size: u64,
}

impl DistManifest {
    /// All file entries the archive is expected to carry, scripts included.
    pub fn entries(&self) -> impl Iterator<Item = &FileEntry> {
        self.files.iter().chain(self.scripts.iter())
    }
}

pub fn encode_manifest(manifest: &DistManifest) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec_pretty(manifest)
}

pub fn decode_manifest(bytes: &[u8]) -> serde_json::Result<DistManifest> {
    serde_json::from_slice(bytes)
}
