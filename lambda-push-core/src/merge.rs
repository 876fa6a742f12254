//! Configuration merge for create and update paths.
//!
//! Precedence, highest first:
//! 1. fields explicitly present in the incoming [`FunctionRecord`]
//! 2. fields previously stored on the remote function
//! 3. built-in defaults ([`DEFAULT_HANDLER`], [`DEFAULT_RUNTIME`])
//!
//! An update-code followed by update-configuration therefore never reverts
//! settings the caller did not mention.

use std::collections::BTreeMap;

use crate::types::{
    FunctionConfiguration, FunctionRecord, DEFAULT_HANDLER, DEFAULT_RUNTIME,
};

/// The configuration fields carried by create-function and
/// update-configuration. There is no code descriptor here; code travels
/// separately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationFields {
    pub handler: Option<String>,
    pub runtime: Option<String>,
    pub role: Option<String>,
    pub memory_size: Option<u32>,
    pub timeout: Option<u32>,
    pub description: Option<String>,
    pub environment: Option<BTreeMap<String, String>>,
}

impl ConfigurationFields {
    /// Fields explicitly set on the record.
    pub fn from_record(record: &FunctionRecord) -> Self {
        Self {
            handler: record.handler.clone(),
            runtime: record.runtime.clone(),
            role: record.role.clone(),
            memory_size: record.memory_size,
            timeout: record.timeout,
            description: record.description.clone(),
            environment: record.environment.clone(),
        }
    }

    /// Preservable fields of a remote configuration.
    pub fn from_configuration(config: &FunctionConfiguration) -> Self {
        Self {
            handler: config.handler.clone(),
            runtime: config.runtime.clone(),
            role: config.role.clone(),
            memory_size: config.memory_size,
            timeout: config.timeout,
            description: config.description.clone(),
            environment: config.environment.clone(),
        }
    }

    /// Keep every field set on `self`; fill the gaps from `under`.
    pub fn over(self, under: ConfigurationFields) -> Self {
        Self {
            handler: self.handler.or(under.handler),
            runtime: self.runtime.or(under.runtime),
            role: self.role.or(under.role),
            memory_size: self.memory_size.or(under.memory_size),
            timeout: self.timeout.or(under.timeout),
            description: self.description.or(under.description),
            environment: self.environment.or(under.environment),
        }
    }

    /// Fill handler and runtime from the built-in defaults when still unset.
    pub fn with_defaults(self) -> Self {
        self.over(Self::defaults())
    }

    fn defaults() -> Self {
        Self {
            handler: Some(DEFAULT_HANDLER.to_owned()),
            runtime: Some(DEFAULT_RUNTIME.to_owned()),
            ..Self::default()
        }
    }
}

/// Fields for create-function: the record over the defaults.
pub fn for_create(record: &FunctionRecord) -> ConfigurationFields {
    ConfigurationFields::from_record(record).with_defaults()
}

/// Fields for update-configuration: the record over what the function
/// already had, over the defaults.
///
/// Image functions get no defaults; the service rejects a handler or runtime
/// for them.
pub fn for_update(record: &FunctionRecord, previous: &FunctionConfiguration) -> ConfigurationFields {
    let fields = ConfigurationFields::from_record(record)
        .over(ConfigurationFields::from_configuration(previous));
    if previous.is_image() {
        fields
    } else {
        fields.with_defaults()
    }
}
