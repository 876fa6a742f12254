//! lambda-push core library — domain types, configuration merge, deploy files.
//!
//! - [`types`] — newtypes, deployment target, artifact, options, remote shapes
//! - [`merge`] — create/update configuration precedence
//! - [`request`] — payloads for the remote operations
//! - [`config`] — deploy file loading
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod merge;
pub mod request;
pub mod types;

pub use error::ConfigError;
pub use merge::ConfigurationFields;
pub use request::{
    AliasRequest, CreateFunctionRequest, UpdateCodeRequest, UpdateConfigurationRequest,
};
pub use types::{
    AliasName, AliasOptions, AliasRecord, Artifact, CodeLocation, DeploymentTarget,
    FunctionCode, FunctionConfiguration, FunctionName, FunctionRecord, LastUpdateStatus,
    StaticCredentials, SyncOptions, UpdateWait, Version,
};
