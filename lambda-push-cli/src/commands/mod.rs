//! Subcommands, plus the deploy-file and flag handling they share.

pub mod check;
pub mod deploy;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use lambda_push_core::{
    config::{self, DeployFile},
    AliasName, AliasOptions, ConfigError, DeploymentTarget, FunctionName, SyncOptions, Version,
};

/// Deploy-file location and the flags that override it.
#[derive(Args, Debug, Default)]
pub struct TargetArgs {
    /// Deploy file (default: ./lambda-push.yaml when present).
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Function to deploy. Renames a record from the deploy file, otherwise
    /// sets a bare-name (code-only) target.
    #[arg(long, short = 'f')]
    pub function: Option<String>,

    #[arg(long)]
    pub region: Option<String>,

    /// Profile in the shared credentials file.
    #[arg(long)]
    pub profile: Option<String>,

    /// Publish a new version after the code lands.
    #[arg(long)]
    pub publish: bool,

    /// Alias to point at the published version.
    #[arg(long)]
    pub alias: Option<String>,

    #[arg(long, requires = "alias")]
    pub alias_description: Option<String>,

    /// Version for the alias instead of the one just published.
    #[arg(long, requires = "alias")]
    pub alias_version: Option<String>,

    /// Base URL of a Lambda-compatible endpoint.
    #[arg(long)]
    pub endpoint: Option<String>,
}

impl TargetArgs {
    /// Load the deploy file relative to `cwd`, then apply the flags.
    pub fn resolve_in(&self, cwd: &Path) -> Result<(DeploymentTarget, SyncOptions)> {
        let file = match &self.config {
            Some(path) => config::load(path)?,
            None => config::load_default_at(cwd)?.unwrap_or_default(),
        };
        self.apply(file)
    }

    pub fn resolve(&self) -> Result<(DeploymentTarget, SyncOptions)> {
        let cwd = std::env::current_dir().context("could not determine working directory")?;
        self.resolve_in(&cwd)
    }

    fn apply(&self, file: DeployFile) -> Result<(DeploymentTarget, SyncOptions)> {
        let DeployFile { function, mut options } = file;

        let target = match (function, &self.function) {
            (Some(DeploymentTarget::Record(mut record)), Some(name)) => {
                record.function_name = FunctionName::from(name.as_str());
                DeploymentTarget::Record(record)
            }
            (_, Some(name)) => DeploymentTarget::from(name.as_str()),
            (Some(target), None) => target,
            (None, None) => return Err(ConfigError::MissingTarget.into()),
        };

        if let Some(region) = &self.region {
            options.region = region.clone();
        }
        if let Some(profile) = &self.profile {
            options.profile = Some(profile.clone());
        }
        if self.publish {
            options.publish = true;
        }
        if let Some(endpoint) = &self.endpoint {
            options.endpoint = Some(endpoint.clone());
        }
        if let Some(name) = &self.alias {
            let alias = options.alias.get_or_insert_with(AliasOptions::default);
            alias.name = AliasName::Named(name.clone());
            if let Some(description) = &self.alias_description {
                alias.description = Some(description.clone());
            }
            if let Some(version) = &self.alias_version {
                alias.version = Some(Version::from(version.as_str()));
            }
        }

        Ok((target, options))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use lambda_push_core::FunctionRecord;
    use tempfile::TempDir;

    use super::*;

    const RECORD_FILE: &str = "\
function:
  function_name: orders
  memory_size: 256
options:
  region: eu-west-1
  alias:
    name: live
    description: production
";

    fn dir_with(contents: &str) -> TempDir {
        let dir = TempDir::new().expect("dir");
        fs::write(dir.path().join("lambda-push.yaml"), contents).expect("write");
        dir
    }

    #[test]
    fn no_file_and_no_flag_is_an_error() {
        let dir = TempDir::new().expect("dir");
        let err = TargetArgs::default().resolve_in(dir.path()).unwrap_err();
        assert!(err.to_string().contains("no function given"), "got: {err}");
    }

    #[test]
    fn function_flag_alone_gives_bare_name() {
        let dir = TempDir::new().expect("dir");
        let args = TargetArgs {
            function: Some("orders".into()),
            ..TargetArgs::default()
        };
        let (target, options) = args.resolve_in(dir.path()).expect("resolve");
        assert_eq!(target, DeploymentTarget::from("orders"));
        assert_eq!(options.region, "us-east-1");
    }

    #[test]
    fn function_flag_renames_record() {
        let dir = dir_with(RECORD_FILE);
        let args = TargetArgs {
            function: Some("orders-staging".into()),
            ..TargetArgs::default()
        };
        let (target, _) = args.resolve_in(dir.path()).expect("resolve");
        let record = target.record().expect("record kept");
        assert_eq!(record.function_name.as_str(), "orders-staging");
        assert_eq!(record.memory_size, Some(256));
    }

    #[test]
    fn flags_override_file_options() {
        let dir = dir_with(RECORD_FILE);
        let args = TargetArgs {
            region: Some("us-west-2".into()),
            publish: true,
            alias: Some("canary".into()),
            alias_version: Some("4".into()),
            ..TargetArgs::default()
        };
        let (target, options) = args.resolve_in(dir.path()).expect("resolve");

        let mut expected = FunctionRecord::new("orders");
        expected.memory_size = Some(256);
        assert_eq!(target, DeploymentTarget::from(expected));
        assert_eq!(options.region, "us-west-2");
        assert!(options.publish);

        let alias = options.alias.expect("alias");
        assert_eq!(alias.name.as_str(), Some("canary"));
        assert_eq!(alias.description.as_deref(), Some("production"));
        assert_eq!(alias.version, Some(Version::from("4")));
    }

    #[test]
    fn explicit_config_path_is_used() {
        let dir = TempDir::new().expect("dir");
        let path = dir.path().join("deploy.yaml");
        fs::write(&path, "function: billing\n").expect("write");
        let args = TargetArgs {
            config: Some(path),
            ..TargetArgs::default()
        };
        let (target, _) = args.resolve_in(Path::new("/nonexistent")).expect("resolve");
        assert_eq!(target.function_name().as_str(), "billing");
    }
}
