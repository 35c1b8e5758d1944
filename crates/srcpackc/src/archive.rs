use anyhow::{Context, Result};
use std::io::{Cursor, Write};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use srcpack::MANIFEST_NAME;

use crate::packages::PackageSet;
use crate::scripts::ScriptAsset;

/// Encodes the distribution archive into a byte buffer.
///
/// The manifest goes in first, then every asset in sorted logical-path
/// order with a fixed per-entry timestamp, so two builds of the same inputs
/// produce the same bytes and the caller can write-if-changed.
pub fn encode_archive(
    manifest_bytes: &[u8],
    packages: &PackageSet,
    scripts: &[ScriptAsset],
) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    writer
        .start_file(MANIFEST_NAME, options)
        .with_context(|| format!("failed to add {MANIFEST_NAME} to archive"))?;
    writer
        .write_all(manifest_bytes)
        .with_context(|| format!("failed to write {MANIFEST_NAME}"))?;

    let mut entries: Vec<(&str, &[u8])> = packages
        .assets
        .iter()
        .map(|asset| (asset.logical_path.as_str(), asset.bytes.as_slice()))
        .chain(
            scripts
                .iter()
                .map(|script| (script.logical_path.as_str(), script.bytes.as_slice())),
        )
        .collect();
    entries.sort_by_key(|(logical_path, _)| *logical_path);

    for (logical_path, bytes) in entries {
        writer
            .start_file(logical_path, options)
            .with_context(|| format!("failed to add {logical_path} to archive"))?;
        writer
            .write_all(bytes)
            .with_context(|| format!("failed to write {logical_path}"))?;
    }

    let cursor = writer.finish().context("failed to finalise archive")?;
    Ok(cursor.into_inner())
}
