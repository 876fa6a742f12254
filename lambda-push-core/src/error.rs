//! Error types for lambda-push-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a deploy file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure, with the path that was being read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error, including line context from serde_yaml.
    #[error("failed to parse deploy file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Neither the deploy file nor the caller named a function.
    #[error("no function given; set `function` in the deploy file or pass --function")]
    MissingTarget,
}
