#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde_json::json;
use tracing::info;

use crate::build::normalize;
use crate::{manifest, metadata, packages, scripts};

#[derive(Debug, Parser)]
pub struct LintArgs {
    /// Root directory of the project (must contain about.toml)
    #[arg(long = "in", value_name = "DIR")]
    pub input: PathBuf,
}

pub fn handle(args: LintArgs, json: bool) -> Result<()> {
    let project_dir = normalize(args.input);
    info!(path = %project_dir.display(), "linting project");

    let meta = metadata::load_metadata(&project_dir)?;
    let package_set = packages::discover_packages(&project_dir)?;
    let script_assets = scripts::collect_scripts(&project_dir, &meta)?;

    // Building the manifest ensures the collected assets are well-formed.
    let dist_manifest = manifest::build_manifest(&meta, &package_set, &script_assets);

    if json {
        let payload = json!({
            "status": "ok",
            "name": dist_manifest.name,
            "version": dist_manifest.version,
            "packages": dist_manifest.packages,
            "scripts": dist_manifest.scripts.len(),
            "files": dist_manifest.files.len(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!(
            "lint ok\n  project: {}@{}\n  packages: {}\n  scripts: {}\n  files: {}",
            dist_manifest.name,
            dist_manifest.version,
            dist_manifest.packages.len(),
            dist_manifest.scripts.len(),
            dist_manifest.files.len()
        );
    }

    Ok(())
}
