//! `lambda-push deploy` — run one sync against the service.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::{debug, info};

use lambda_push_client::{ClientConfig, SdkLambdaClient};
use lambda_push_core::Artifact;
use lambda_push_sync::{validate, ArtifactCollector, LambdaSync, PipelineItem, SyncReport};

use super::TargetArgs;

/// Arguments for `lambda-push deploy`.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// ZIP artifacts. The first file wins; directories are skipped and `-`
    /// (standard input) is rejected.
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Write the deployed artifact here under its file name.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

impl DeployArgs {
    pub async fn run(self) -> Result<()> {
        let (target, options) = self.target.resolve()?;

        let mut collector = ArtifactCollector::new();
        for path in &self.files {
            if collector.has_artifact() && !is_stdin(path) && !path.is_dir() {
                debug!("ignoring {}; an artifact is already selected", path.display());
                continue;
            }
            collector.accept(read_item(path)?)?;
        }
        let artifact = collector.finish();

        // Reject bad input before looking for credentials.
        validate(&target, &options, artifact.as_ref())?;

        let config = ClientConfig::resolve(&options)
            .await
            .context("could not resolve credentials")?;
        info!(
            region = config.region().unwrap_or("unset"),
            "deploying \"{}\"",
            target.function_name()
        );
        let client = SdkLambdaClient::new(&config);
        let function = target.function_name().clone();
        let report = LambdaSync::new(client, target, options)
            .sync(artifact)
            .await
            .with_context(|| format!("deploy failed for '{function}'"))?;

        print_report(&report);

        if let (Some(dir), Some(artifact)) = (&self.out_dir, &report.artifact) {
            let written = write_artifact(dir, artifact)?;
            debug!("re-emitted artifact to {}", written.display());
            println!("  artifact: {}", written.display());
        }
        Ok(())
    }
}

fn is_stdin(path: &Path) -> bool {
    path == Path::new("-")
}

fn read_item(path: &Path) -> Result<PipelineItem> {
    if is_stdin(path) {
        return Ok(PipelineItem::Streamed {
            path: path.to_path_buf(),
        });
    }
    if path.is_dir() {
        return Ok(PipelineItem::Empty {
            path: path.to_path_buf(),
        });
    }
    let contents = fs::read(path).with_context(|| format!("could not read {}", path.display()))?;
    Ok(PipelineItem::buffered(path, contents))
}

fn write_artifact(dir: &Path, artifact: &Artifact) -> Result<PathBuf> {
    let name = artifact
        .path()
        .file_name()
        .with_context(|| format!("artifact path {} has no file name", artifact.path().display()))?;
    fs::create_dir_all(dir).with_context(|| format!("could not create {}", dir.display()))?;
    let dest = dir.join(name);
    fs::write(&dest, &artifact.contents)
        .with_context(|| format!("could not write {}", dest.display()))?;
    Ok(dest)
}

fn print_report(report: &SyncReport) {
    println!(
        "{} '{}' {}",
        "✓".green().bold(),
        report.function_name,
        report.path
    );
    if let Some(version) = &report.published_version {
        println!("  version:  {version}");
    }
    if let Some(alias) = &report.alias {
        println!(
            "  alias:    {}d '{}' → {}",
            alias.operation, alias.name, alias.version
        );
    }
    for warning in &report.warnings {
        println!("  {} {warning}", "⚠".yellow().bold());
    }
}
