//! Outcome of a successful sync run.

use std::fmt;

use lambda_push_core::{Artifact, FunctionConfiguration, FunctionName, Version};

/// Which branch of the state machine the run took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPath {
    /// The function did not exist and was created.
    Created,
    /// Code and configuration of an existing function were updated.
    Updated,
    /// Bare-name target: only the code was updated.
    CodeOnly,
}

impl fmt::Display for SyncPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncPath::Created => write!(f, "created"),
            SyncPath::Updated => write!(f, "updated"),
            SyncPath::CodeOnly => write!(f, "code updated"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasOperation {
    Create,
    Update,
}

impl fmt::Display for AliasOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasOperation::Create => write!(f, "create"),
            AliasOperation::Update => write!(f, "update"),
        }
    }
}

/// A landed alias upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasOutcome {
    pub operation: AliasOperation,
    pub name: String,
    pub version: Version,
}

/// Non-fatal problems. The run still succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncWarning {
    /// Code and configuration landed but the alias could not be written.
    AliasOperationFailed {
        alias: String,
        operation: AliasOperation,
        message: String,
    },
}

impl fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncWarning::AliasOperationFailed {
                alias,
                operation,
                message,
            } => write!(f, "could not {operation} alias '{alias}': {message}"),
        }
    }
}

/// What a successful run did.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub function_name: FunctionName,
    pub path: SyncPath,
    /// Configuration returned by the last successful call.
    pub configuration: FunctionConfiguration,
    /// Set when the run published a version.
    pub published_version: Option<Version>,
    pub alias: Option<AliasOutcome>,
    pub warnings: Vec<SyncWarning>,
    /// The accepted artifact, re-emitted downstream.
    pub artifact: Option<Artifact>,
}

impl SyncReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
