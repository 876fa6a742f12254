//! # lambda-push-sync
//!
//! Collects a ZIP artifact from a sequence of items and syncs it to one
//! function.
//!
//! [`LambdaSync`] is the entry point: [`LambdaSync::run`] for an iterator of
//! items, [`LambdaSync::transform`] for channels. The state machine itself
//! lives in [`orchestrator`].

pub mod collector;
pub mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod report;

pub use collector::{ArtifactCollector, PipelineItem};
pub use error::SyncError;
pub use orchestrator::{validate, Orchestrator};
pub use pipeline::LambdaSync;
pub use report::{AliasOperation, AliasOutcome, SyncPath, SyncReport, SyncWarning};
