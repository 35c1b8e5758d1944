use crate::BuildArgs;
use crate::archive;
use crate::manifest;
use crate::metadata;
use crate::packages;
use crate::scripts;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub project_dir: PathBuf,
    /// Defaults to `dist/<name>-<version>.zip` once metadata is known.
    pub archive_out: Option<PathBuf>,
    pub manifest_out: PathBuf,
    pub dry_run: bool,
}

impl From<BuildArgs> for BuildOptions {
    fn from(args: BuildArgs) -> Self {
        Self {
            project_dir: normalize(args.input),
            archive_out: args.archive_out.map(normalize),
            manifest_out: normalize(args.manifest),
            dry_run: args.dry_run,
        }
    }
}

pub fn run(opts: &BuildOptions) -> Result<()> {
    info!(
        project_dir = %opts.project_dir.display(),
        manifest_out = %opts.manifest_out.display(),
        dry_run = opts.dry_run,
        "building source distribution"
    );

    let meta = metadata::load_metadata(&opts.project_dir)?;
    info!(title = %meta.title, version = %meta.version, "loaded project metadata");

    let package_set = packages::discover_packages(&opts.project_dir)?;
    if package_set.names.is_empty() {
        warn!("no importable packages discovered");
    }
    info!(count = package_set.names.len(), "discovered packages");

    let script_assets = scripts::collect_scripts(&opts.project_dir, &meta)?;
    info!(count = script_assets.len(), "collected scripts");

    let dist_manifest = manifest::build_manifest(&meta, &package_set, &script_assets);
    let manifest_bytes = srcpack::manifest::encode_manifest(&dist_manifest)
        .context("failed to encode manifest")?;
    info!(len = manifest_bytes.len(), "encoded manifest");

    if opts.dry_run {
        info!("dry-run complete; no files written");
        return Ok(());
    }

    let archive_bytes = archive::encode_archive(&manifest_bytes, &package_set, &script_assets)?;
    let archive_out = opts.archive_out.clone().unwrap_or_else(|| {
        normalize(PathBuf::from(format!(
            "dist/{}-{}.zip",
            meta.title, meta.version
        )))
    });

    write_if_changed(&opts.manifest_out, &manifest_bytes)?;
    write_if_changed(&archive_out, &archive_bytes)?;
    info!(path = %archive_out.display(), "build complete");

    Ok(())
}

pub(crate) fn normalize(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        cwd.join(path)
    }
}

fn write_if_changed(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let mut needs_write = true;
    if let Ok(current) = fs::read(path)
        && current == contents
    {
        needs_write = false;
    }

    if needs_write {
        fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote file");
    } else {
        debug!(path = %path.display(), "unchanged");
    }

    Ok(())
}
