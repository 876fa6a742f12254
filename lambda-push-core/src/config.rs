//! Deploy file loading.
//!
//! # Layout
//!
//! ```yaml
//! function: orders-api          # bare name: code-only update
//! # function:                   # or a full record
//! #   function_name: orders-api
//! #   role: arn:aws:iam::123456789012:role/lambda-exec
//! #   memory_size: 256
//! options:
//!   region: eu-west-1
//!   profile: deploy
//!   publish: true
//!   alias:
//!     name: live
//!     description: production traffic
//! ```
//!
//! Both keys are optional in the file; the CLI can supply or override them.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::{DeploymentTarget, SyncOptions};

/// File name picked up from the working directory when no path is given.
pub const DEFAULT_DEPLOY_FILE: &str = "lambda-push.yaml";

/// Parsed deploy file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeployFile {
    #[serde(default)]
    pub function: Option<DeploymentTarget>,
    #[serde(default)]
    pub options: SyncOptions,
}

impl DeployFile {
    /// The target, or [`ConfigError::MissingTarget`].
    pub fn target(&self) -> Result<&DeploymentTarget, ConfigError> {
        self.function.as_ref().ok_or(ConfigError::MissingTarget)
    }
}

/// Parse a deploy file from YAML text. `path` is used for error context only.
pub fn parse(contents: &str, path: &Path) -> Result<DeployFile, ConfigError> {
    if contents.trim().is_empty() {
        return Ok(DeployFile::default());
    }
    serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the deploy file at `path`.
pub fn load(path: &Path) -> Result<DeployFile, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents, path)
}

/// Load `<dir>/lambda-push.yaml` if it exists.
pub fn load_default_at(dir: &Path) -> Result<Option<DeployFile>, ConfigError> {
    let path = default_path_at(dir);
    if !path.exists() {
        return Ok(None);
    }
    load(&path).map(Some)
}

/// `<dir>/lambda-push.yaml` — pure, no I/O.
pub fn default_path_at(dir: &Path) -> PathBuf {
    dir.join(DEFAULT_DEPLOY_FILE)
}
