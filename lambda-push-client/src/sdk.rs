//! [`LambdaApi`] on top of `aws-sdk-lambda`.

use std::collections::{BTreeMap, HashMap};
use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use aws_sdk_lambda::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{self as sdk, Environment, Runtime};
use aws_sdk_lambda::Client;
use tracing::debug;

use lambda_push_core::{
    AliasRecord, AliasRequest, ConfigurationFields, CreateFunctionRequest, FunctionCode,
    FunctionConfiguration, FunctionName, LastUpdateStatus, UpdateCodeRequest,
    UpdateConfigurationRequest, Version,
};

use crate::api::LambdaApi;
use crate::config::ClientConfig;
use crate::error::ClientError;

const NOT_FOUND: &str = "ResourceNotFoundException";

/// Lambda client for one region and one credential source.
#[derive(Clone)]
pub struct SdkLambdaClient {
    inner: Client,
}

impl fmt::Debug for SdkLambdaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkLambdaClient")
            .field("region", &self.inner.config().region())
            .finish()
    }
}

impl SdkLambdaClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            inner: Client::new(config.sdk_config()),
        }
    }
}

// ---------------------------------------------------------------------------
// Response mapping
// ---------------------------------------------------------------------------

/// The four configuration-shaped outputs share their accessors but not a type.
macro_rules! configuration {
    ($out:expr) => {{
        let out = $out;
        FunctionConfiguration {
            function_name: FunctionName::from(out.function_name().unwrap_or_default()),
            function_arn: out.function_arn().map(str::to_owned),
            version: out.version().map(Version::from).unwrap_or_default(),
            handler: out.handler().map(str::to_owned),
            runtime: out.runtime().map(|r| r.as_str().to_owned()),
            role: out.role().map(str::to_owned),
            memory_size: out.memory_size().and_then(|m| u32::try_from(m).ok()),
            timeout: out.timeout().and_then(|t| u32::try_from(t).ok()),
            description: out.description().map(str::to_owned),
            environment: out
                .environment()
                .and_then(|env| env.variables())
                .map(sorted),
            state: out.state().map(|s| s.as_str().to_owned()),
            last_update_status: out.last_update_status().and_then(update_status),
            last_update_status_reason: out.last_update_status_reason().map(str::to_owned),
            package_type: out.package_type().map(|p| p.as_str().to_owned()),
        }
    }};
}

macro_rules! alias {
    ($out:expr) => {{
        let out = $out;
        AliasRecord {
            name: out.name().unwrap_or_default().to_owned(),
            function_version: out.function_version().map(Version::from).unwrap_or_default(),
            description: out.description().map(str::to_owned),
            alias_arn: out.alias_arn().map(str::to_owned),
        }
    }};
}

fn sorted(variables: &HashMap<String, String>) -> BTreeMap<String, String> {
    variables
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn update_status(status: &sdk::LastUpdateStatus) -> Option<LastUpdateStatus> {
    match status.as_str() {
        "Successful" => Some(LastUpdateStatus::Successful),
        "Failed" => Some(LastUpdateStatus::Failed),
        "InProgress" => Some(LastUpdateStatus::InProgress),
        _ => None,
    }
}

/// Map an SDK failure. `ResourceNotFoundException` drives the create branch,
/// so it gets its own variant.
fn service_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> ClientError
where
    E: ProvideErrorMetadata + StdError + 'static,
    R: fmt::Debug,
{
    let message = err.message().unwrap_or_default().to_owned();
    match err.code() {
        Some(NOT_FOUND) => ClientError::NotFound { message },
        Some(code) => ClientError::Api {
            operation,
            code: code.to_owned(),
            message,
        },
        None => ClientError::Transport {
            operation,
            message: DisplayErrorContext(&err).to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Request mapping
// ---------------------------------------------------------------------------

fn environment(fields: &ConfigurationFields) -> Option<Environment> {
    fields.environment.as_ref().map(|variables| {
        Environment::builder()
            .set_variables(Some(variables.clone().into_iter().collect()))
            .build()
    })
}

fn runtime(fields: &ConfigurationFields) -> Option<Runtime> {
    fields.runtime.as_deref().map(Runtime::from)
}

fn to_i32(value: Option<u32>) -> Option<i32> {
    value.and_then(|v| i32::try_from(v).ok())
}

fn code(code: &FunctionCode) -> sdk::FunctionCode {
    match code {
        FunctionCode::ZipFile(bytes) => sdk::FunctionCode::builder()
            .zip_file(Blob::new(bytes.to_vec()))
            .build(),
        FunctionCode::Remote(location) => sdk::FunctionCode::builder()
            .s3_bucket(&location.s3_bucket)
            .s3_key(&location.s3_key)
            .set_s3_object_version(location.s3_object_version.clone())
            .build(),
    }
}

// ---------------------------------------------------------------------------
// LambdaApi
// ---------------------------------------------------------------------------

#[async_trait]
impl LambdaApi for SdkLambdaClient {
    async fn get_function_configuration(
        &self,
        function: &FunctionName,
    ) -> Result<FunctionConfiguration, ClientError> {
        debug!(function = %function, "get-function-configuration");
        let out = self
            .inner
            .get_function_configuration()
            .function_name(function.as_str())
            .send()
            .await
            .map_err(|e| service_error("get-function-configuration", e))?;
        Ok(configuration!(out))
    }

    async fn create_function(
        &self,
        request: CreateFunctionRequest,
    ) -> Result<FunctionConfiguration, ClientError> {
        debug!(function = %request.function_name, publish = request.publish, "create-function");
        let fields = &request.fields;
        let out = self
            .inner
            .create_function()
            .function_name(request.function_name.as_str())
            .set_handler(fields.handler.clone())
            .set_runtime(runtime(fields))
            .set_role(fields.role.clone())
            .set_memory_size(to_i32(fields.memory_size))
            .set_timeout(to_i32(fields.timeout))
            .set_description(fields.description.clone())
            .set_environment(environment(fields))
            .code(code(&request.code))
            .publish(request.publish)
            .send()
            .await
            .map_err(|e| service_error("create-function", e))?;
        Ok(configuration!(out))
    }

    async fn update_function_code(
        &self,
        request: UpdateCodeRequest,
    ) -> Result<FunctionConfiguration, ClientError> {
        debug!(function = %request.function_name, publish = request.publish, "update-function-code");
        let call = self
            .inner
            .update_function_code()
            .function_name(request.function_name.as_str())
            .publish(request.publish);
        let call = match &request.code {
            FunctionCode::ZipFile(bytes) => call.zip_file(Blob::new(bytes.to_vec())),
            FunctionCode::Remote(location) => call
                .s3_bucket(&location.s3_bucket)
                .s3_key(&location.s3_key)
                .set_s3_object_version(location.s3_object_version.clone()),
        };
        let out = call
            .send()
            .await
            .map_err(|e| service_error("update-function-code", e))?;
        Ok(configuration!(out))
    }

    async fn update_function_configuration(
        &self,
        request: UpdateConfigurationRequest,
    ) -> Result<FunctionConfiguration, ClientError> {
        debug!(function = %request.function_name, "update-function-configuration");
        let fields = &request.fields;
        let out = self
            .inner
            .update_function_configuration()
            .function_name(request.function_name.as_str())
            .set_handler(fields.handler.clone())
            .set_runtime(runtime(fields))
            .set_role(fields.role.clone())
            .set_memory_size(to_i32(fields.memory_size))
            .set_timeout(to_i32(fields.timeout))
            .set_description(fields.description.clone())
            .set_environment(environment(fields))
            .send()
            .await
            .map_err(|e| service_error("update-function-configuration", e))?;
        Ok(configuration!(out))
    }

    async fn get_alias(
        &self,
        function: &FunctionName,
        name: &str,
    ) -> Result<AliasRecord, ClientError> {
        let out = self
            .inner
            .get_alias()
            .function_name(function.as_str())
            .name(name)
            .send()
            .await
            .map_err(|e| service_error("get-alias", e))?;
        Ok(alias!(out))
    }

    async fn create_alias(&self, request: AliasRequest) -> Result<AliasRecord, ClientError> {
        let out = self
            .inner
            .create_alias()
            .function_name(request.function_name.as_str())
            .name(&request.name)
            .function_version(request.function_version.as_str())
            .set_description(request.description.clone())
            .send()
            .await
            .map_err(|e| service_error("create-alias", e))?;
        Ok(alias!(out))
    }

    async fn update_alias(&self, request: AliasRequest) -> Result<AliasRecord, ClientError> {
        let out = self
            .inner
            .update_alias()
            .function_name(request.function_name.as_str())
            .name(&request.name)
            .function_version(request.function_version.as_str())
            .set_description(request.description.clone())
            .send()
            .await
            .map_err(|e| service_error("update-alias", e))?;
        Ok(alias!(out))
    }
}
