//! Error types for lambda-push-client.

use thiserror::Error;

/// All errors a remote call (or client construction) can produce.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The function or alias does not exist.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The service answered with an error code.
    #[error("{operation} failed with {code}: {message}")]
    Api {
        operation: &'static str,
        code: String,
        message: String,
    },

    /// No response: connect, TLS, timeout, or a body that could not be read.
    #[error("{operation} failed: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    /// No credential source produced usable credentials.
    #[error("no usable credentials: {message}")]
    Credentials { message: String },

    /// A code update finished in a failed state.
    #[error("update did not apply: {reason}")]
    UpdateFailed { reason: String },

    /// A code update was still in progress after the polling budget ran out.
    #[error("update still in progress after {attempts} status checks")]
    UpdateStalled { attempts: u32 },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }
}
