//! Request payloads for the remote operations.

use crate::merge::ConfigurationFields;
use crate::types::{FunctionCode, FunctionName, Version};

/// Payload for create-function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFunctionRequest {
    pub function_name: FunctionName,
    pub fields: ConfigurationFields,
    pub code: FunctionCode,
    pub publish: bool,
}

/// Payload for update-code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCodeRequest {
    pub function_name: FunctionName,
    pub code: FunctionCode,
    pub publish: bool,
}

/// Payload for update-configuration. Carries no code descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateConfigurationRequest {
    pub function_name: FunctionName,
    pub fields: ConfigurationFields,
}

/// Payload shared by create-alias and update-alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRequest {
    pub function_name: FunctionName,
    pub function_version: Version,
    pub name: String,
    pub description: Option<String>,
}
