//! Error types for lambda-push-sync.

use std::path::PathBuf;

use thiserror::Error;

use lambda_push_client::ClientError;
use lambda_push_core::FunctionName;

/// Fatal outcomes of a sync run. Each run reports at most one.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No artifact arrived and the target names no remote code location.
    #[error("no code provided")]
    NoArtifactProvided,

    /// An item arrived as a stream rather than a buffer.
    #[error("streaming is not supported ({path})")]
    StreamingUnsupported { path: PathBuf },

    /// The artifact path does not end in `.zip`.
    #[error("provided file is not a ZIP: {path}")]
    NotAZipArchive { path: PathBuf },

    /// The alias option has no usable name.
    #[error("invalid alias: {reason}")]
    InvalidAliasName { reason: String },

    /// create-function failed.
    #[error("failed to create function '{function}': {source}")]
    RemoteCreateFailed {
        function: FunctionName,
        #[source]
        source: ClientError,
    },

    /// update-code, the wait for it to apply, or update-configuration failed.
    #[error("failed to update function '{function}': {source}")]
    RemoteUpdateFailed {
        function: FunctionName,
        #[source]
        source: ClientError,
    },
}

impl SyncError {
    /// True for errors raised before any remote call.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SyncError::NoArtifactProvided
                | SyncError::StreamingUnsupported { .. }
                | SyncError::NotAZipArchive { .. }
                | SyncError::InvalidAliasName { .. }
        )
    }
}
