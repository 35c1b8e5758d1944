use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::manifest::{self, DistManifest, MANIFEST_NAME};

/// Errors raised while opening a distribution archive.
#[derive(Debug, Error)]
pub enum DistError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a valid distribution archive: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: ZipError,
    },
    #[error("archive does not contain MANIFEST.json")]
    MissingManifest,
    #[error("MANIFEST.json is not a valid manifest: {0}")]
    InvalidManifest(#[from] serde_json::Error),
    #[error("failed to read archive entry {logical_path}: {source}")]
    Entry {
        logical_path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result of opening and checking a distribution archive.
#[derive(Debug)]
pub struct DistLoad {
    pub manifest: DistManifest,
    pub report: InspectReport,
}

/// Outcome of re-hashing archive contents against the embedded manifest.
#[derive(Debug, Default)]
pub struct InspectReport {
    pub digests_ok: bool,
    pub warnings: Vec<String>,
}

/// Opens a built archive, decodes its manifest, and re-hashes every listed
/// file. Digest mismatches and missing or unlisted entries are reported as
/// warnings rather than hard errors so callers can still inspect a damaged
/// archive.
pub fn open_dist(path: &Path) -> Result<DistLoad, DistError> {
    let file = File::open(path).map_err(|source| DistError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut archive = ZipArchive::new(file).map_err(|source| DistError::Archive {
        path: path.to_path_buf(),
        source,
    })?;

    let manifest = read_manifest(&mut archive)?;

    let mut report = InspectReport {
        digests_ok: true,
        warnings: Vec::new(),
    };

    let mut expected = BTreeSet::new();
    for entry in manifest.entries() {
        expected.insert(entry.logical_path.clone());
        match read_entry(&mut archive, &entry.logical_path) {
            Ok(Some(bytes)) => {
                let sha256 = hex::encode(Sha256::digest(&bytes));
                if sha256 != entry.sha256 {
                    report.digests_ok = false;
                    report
                        .warnings
                        .push(format!("digest mismatch for {}", entry.logical_path));
                }
                if bytes.len() as u64 != entry.size {
                    report.digests_ok = false;
                    report
                        .warnings
                        .push(format!("size mismatch for {}", entry.logical_path));
                }
            }
            Ok(None) => {
                report.digests_ok = false;
                report
                    .warnings
                    .push(format!("archive is missing {}", entry.logical_path));
            }
            Err(err) => return Err(err),
        }
    }

    for name in unlisted_entries(&mut archive, &expected) {
        report.warnings.push(format!("unlisted archive entry {name}"));
    }

    Ok(DistLoad { manifest, report })
}

fn read_manifest<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<DistManifest, DistError> {
    let mut entry = match archive.by_name(MANIFEST_NAME) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Err(DistError::MissingManifest),
        Err(source) => {
            return Err(DistError::Entry {
                logical_path: MANIFEST_NAME.to_string(),
                source: source.into(),
            });
        }
    };
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|source| DistError::Entry {
            logical_path: MANIFEST_NAME.to_string(),
            source,
        })?;
    Ok(manifest::decode_manifest(&bytes)?)
}

fn read_entry<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    logical_path: &str,
) -> Result<Option<Vec<u8>>, DistError> {
    let mut entry = match archive.by_name(logical_path) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(source) => {
            return Err(DistError::Entry {
                logical_path: logical_path.to_string(),
                source: source.into(),
            });
        }
    };
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|source| DistError::Entry {
            logical_path: logical_path.to_string(),
            source,
        })?;
    Ok(Some(bytes))
}

fn unlisted_entries<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    expected: &BTreeSet<String>,
) -> Vec<String> {
    let mut extra = Vec::new();
    for name in archive.file_names() {
        if name == MANIFEST_NAME || name.ends_with('/') {
            continue;
        }
        if !expected.contains(name) {
            extra.push(name.to_string());
        }
    }
    extra.sort();
    extra
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{FileEntry, encode_manifest};
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn entry_for(logical_path: &str, bytes: &[u8]) -> FileEntry {
        FileEntry {
            logical_path: logical_path.to_string(),
            sha256: hex::encode(Sha256::digest(bytes)),
            size: bytes.len() as u64,
        }
    }

    fn write_archive(path: &Path, manifest: &DistManifest, files: &[(&str, &[u8])]) {
        let file = File::create(path).expect("create archive");
        let mut writer = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        writer
            .start_file(MANIFEST_NAME, options)
            .expect("start manifest");
        writer
            .write_all(&encode_manifest(manifest).expect("encode manifest"))
            .expect("write manifest");
        for (name, bytes) in files {
            writer.start_file(*name, options).expect("start entry");
            writer.write_all(bytes).expect("write entry");
        }
        writer.finish().expect("finish archive");
    }

    fn sample_manifest(files: Vec<FileEntry>) -> DistManifest {
        DistManifest {
            name: "selfie".to_string(),
            version: "0.1.0".to_string(),
            description: "take a snapshot".to_string(),
            author: "Jess Example".to_string(),
            author_email: "jess@example.com".to_string(),
            url: "https://example.com/selfie".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            packages: vec!["selfie".to_string()],
            scripts: Vec::new(),
            files,
            install_requires: Vec::new(),
            tests_require: Vec::new(),
        }
    }

    #[test]
    fn open_dist_accepts_intact_archive() {
        let temp = tempfile::tempdir().expect("temp dir");
        let archive_path = temp.path().join("selfie-0.1.0.zip");
        let body = b"__version__ = '0.1.0'\n";
        let manifest = sample_manifest(vec![entry_for("selfie/__init__.py", body)]);
        write_archive(&archive_path, &manifest, &[("selfie/__init__.py", body)]);

        let load = open_dist(&archive_path).expect("open dist");
        assert_eq!(load.manifest.name, "selfie");
        assert_eq!(load.manifest.version, "0.1.0");
        assert!(load.report.digests_ok);
        assert!(load.report.warnings.is_empty());
    }

    #[test]
    fn open_dist_flags_tampered_entry() {
        let temp = tempfile::tempdir().expect("temp dir");
        let archive_path = temp.path().join("selfie-0.1.0.zip");
        let manifest = sample_manifest(vec![entry_for("selfie/__init__.py", b"original")]);
        write_archive(
            &archive_path,
            &manifest,
            &[("selfie/__init__.py", b"tampered")],
        );

        let load = open_dist(&archive_path).expect("open dist");
        assert!(!load.report.digests_ok);
        assert!(
            load.report
                .warnings
                .iter()
                .any(|warning| warning.contains("digest mismatch"))
        );
    }

    #[test]
    fn open_dist_flags_missing_and_unlisted_entries() {
        let temp = tempfile::tempdir().expect("temp dir");
        let archive_path = temp.path().join("selfie-0.1.0.zip");
        let manifest = sample_manifest(vec![entry_for("selfie/__init__.py", b"x")]);
        write_archive(&archive_path, &manifest, &[("selfie/stray.py", b"y")]);

        let load = open_dist(&archive_path).expect("open dist");
        assert!(!load.report.digests_ok);
        assert!(
            load.report
                .warnings
                .iter()
                .any(|warning| warning.contains("missing selfie/__init__.py"))
        );
        assert!(
            load.report
                .warnings
                .iter()
                .any(|warning| warning.contains("unlisted archive entry selfie/stray.py"))
        );
    }

    #[test]
    fn open_dist_rejects_archive_without_manifest() {
        let temp = tempfile::tempdir().expect("temp dir");
        let archive_path = temp.path().join("empty.zip");
        let file = File::create(&archive_path).expect("create archive");
        let mut writer = ZipWriter::new(file);
        writer
            .start_file("selfie/__init__.py", SimpleFileOptions::default())
            .expect("start entry");
        writer.finish().expect("finish archive");

        let err = open_dist(&archive_path).expect_err("should fail");
        assert!(matches!(err, DistError::MissingManifest));
    }
}
