//! # lambda-push-client
//!
//! The remote side of a sync run: the [`LambdaApi`] trait the orchestrator
//! drives, the per-run [`ClientConfig`], and [`SdkLambdaClient`], which
//! implements the trait with `aws-sdk-lambda`.

pub mod api;
pub mod config;
pub mod error;
pub mod sdk;

pub use api::LambdaApi;
pub use config::ClientConfig;
pub use error::ClientError;
pub use sdk::SdkLambdaClient;
