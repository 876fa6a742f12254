//! The remote operations a sync run needs.

use std::sync::Arc;

use async_trait::async_trait;

use lambda_push_core::{
    AliasRecord, AliasRequest, CreateFunctionRequest, FunctionConfiguration, FunctionName,
    UpdateCodeRequest, UpdateConfigurationRequest,
};

use crate::error::ClientError;

/// Call surface of the function-hosting service.
///
/// Every method is one independent request/response exchange. Implementations
/// hold no per-run state; credentials and region are fixed when the
/// implementation is constructed.
#[async_trait]
pub trait LambdaApi: Send + Sync {
    /// Current configuration of `function`, or [`ClientError::NotFound`].
    async fn get_function_configuration(
        &self,
        function: &FunctionName,
    ) -> Result<FunctionConfiguration, ClientError>;

    async fn create_function(
        &self,
        request: CreateFunctionRequest,
    ) -> Result<FunctionConfiguration, ClientError>;

    /// Upload new code. The returned configuration carries the new version
    /// when `request.publish` is set.
    async fn update_function_code(
        &self,
        request: UpdateCodeRequest,
    ) -> Result<FunctionConfiguration, ClientError>;

    async fn update_function_configuration(
        &self,
        request: UpdateConfigurationRequest,
    ) -> Result<FunctionConfiguration, ClientError>;

    /// The alias `name` on `function`, or [`ClientError::NotFound`].
    async fn get_alias(
        &self,
        function: &FunctionName,
        name: &str,
    ) -> Result<AliasRecord, ClientError>;

    async fn create_alias(&self, request: AliasRequest) -> Result<AliasRecord, ClientError>;

    async fn update_alias(&self, request: AliasRequest) -> Result<AliasRecord, ClientError>;
}

#[async_trait]
impl<T: LambdaApi + ?Sized> LambdaApi for Arc<T> {
    async fn get_function_configuration(
        &self,
        function: &FunctionName,
    ) -> Result<FunctionConfiguration, ClientError> {
        (**self).get_function_configuration(function).await
    }

    async fn create_function(
        &self,
        request: CreateFunctionRequest,
    ) -> Result<FunctionConfiguration, ClientError> {
        (**self).create_function(request).await
    }

    async fn update_function_code(
        &self,
        request: UpdateCodeRequest,
    ) -> Result<FunctionConfiguration, ClientError> {
        (**self).update_function_code(request).await
    }

    async fn update_function_configuration(
        &self,
        request: UpdateConfigurationRequest,
    ) -> Result<FunctionConfiguration, ClientError> {
        (**self).update_function_configuration(request).await
    }

    async fn get_alias(
        &self,
        function: &FunctionName,
        name: &str,
    ) -> Result<AliasRecord, ClientError> {
        (**self).get_alias(function, name).await
    }

    async fn create_alias(&self, request: AliasRequest) -> Result<AliasRecord, ClientError> {
        (**self).create_alias(request).await
    }

    async fn update_alias(&self, request: AliasRequest) -> Result<AliasRecord, ClientError> {
        (**self).update_alias(request).await
    }
}
