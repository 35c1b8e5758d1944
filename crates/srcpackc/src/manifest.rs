use srcpack::{DistManifest, FileEntry};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::metadata::ProjectMeta;
use crate::packages::PackageSet;
use crate::scripts::ScriptAsset;

/// Assembles the distribution manifest from validated inputs.
///
/// The dependency lists are emitted empty on purpose: this tool declares no
/// install-time or test-time requirements for the distributions it builds.
pub fn build_manifest(
    meta: &ProjectMeta,
    packages: &PackageSet,
    scripts: &[ScriptAsset],
) -> DistManifest {
    let created_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string());

    let file_entries = packages
        .assets
        .iter()
        .map(|asset| FileEntry {
            logical_path: asset.logical_path.clone(),
            sha256: asset.sha256.clone(),
            size: asset.size,
        })
        .collect();

    let script_entries = scripts
        .iter()
        .map(|script| FileEntry {
            logical_path: script.logical_path.clone(),
            sha256: script.sha256.clone(),
            size: script.size,
        })
        .collect();

    DistManifest {
        name: meta.title.clone(),
        version: meta.version.clone(),
        description: meta.description.clone(),
        author: meta.author.clone(),
        author_email: meta.author_email.clone(),
        url: meta.url.clone(),
        created_at,
        packages: packages.names.clone(),
        scripts: script_entries,
        files: file_entries,
        install_requires: Vec::new(),
        tests_require: Vec::new(),
    }
}
