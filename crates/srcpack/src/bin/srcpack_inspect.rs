#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use serde_json::json;
use srcpack::{DistManifest, InspectReport, open_dist};

#[derive(Parser, Debug)]
#[command(
    name = "srcpack-inspect",
    version,
    about = "Inspect source distribution archives"
)]
struct Args {
    /// Path to the distribution .zip file
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Emit JSON output
    #[arg(long)]
    json: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let load = open_dist(&args.path)?;

    if args.json {
        print_json(&load.manifest, &load.report)?;
    } else {
        print_human(&load.manifest, &load.report);
    }

    Ok(if load.report.digests_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_human(manifest: &DistManifest, report: &InspectReport) {
    println!("Distribution: {} ({})", manifest.name, manifest.version);
    println!("Packages: {}", manifest.packages.len());
    println!("Scripts: {}", manifest.scripts.len());
    println!("Files: {}", manifest.files.len());
    println!("Digests OK: {}", report.digests_ok);
    if report.warnings.is_empty() {
        println!("Warnings: none");
    } else {
        println!("Warnings:");
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }
}

fn print_json(manifest: &DistManifest, report: &InspectReport) -> Result<()> {
    let payload = json!({
        "manifest": {
            "name": manifest.name,
            "version": manifest.version,
            "packages": manifest.packages,
            "scripts": manifest.scripts.len(),
            "files": manifest.files.len(),
        },
        "report": {
            "digests_ok": report.digests_ok,
            "warnings": report.warnings,
        },
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
