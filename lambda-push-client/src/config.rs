//! Per-run client configuration and credential resolution.
//!
//! Credentials come from, in order:
//! 1. `options.credentials`
//! 2. `options.profile`, read from the shared config and credentials files
//!    (static keys, `role_arn`/`source_profile`, SSO, `credential_process`)
//! 3. the SDK default chain: environment, `AWS_PROFILE`/`default`, web
//!    identity, container and instance roles
//!
//! Nothing here mutates process state; the result is an immutable
//! [`ClientConfig`] handed to one client.

use aws_config::profile::profile_file::ProfileFiles;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_credential_types::Credentials;
use aws_sdk_lambda::config::Region;
use aws_sdk_lambda::error::DisplayErrorContext;
use secrecy::ExposeSecret;
use tracing::debug;

use lambda_push_core::{StaticCredentials, SyncOptions};

use crate::error::ClientError;

/// Provider name reported for credentials taken from the options.
const OPTIONS_PROVIDER: &str = "lambda-push-options";

/// Region, endpoint and credentials for one run.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    sdk: SdkConfig,
}

impl ClientConfig {
    /// Resolve from the options, the environment and the default profile
    /// file locations.
    pub async fn resolve(options: &SyncOptions) -> Result<Self, ClientError> {
        Self::resolve_with(options, None).await
    }

    /// Like [`resolve`](Self::resolve), reading profiles only from
    /// `profile_files` when given.
    pub async fn resolve_with(
        options: &SyncOptions,
        profile_files: Option<ProfileFiles>,
    ) -> Result<Self, ClientError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(options.region.clone()));
        if let Some(files) = &profile_files {
            loader = loader.profile_files(files.clone());
        }

        if let Some(credentials) = &options.credentials {
            loader = loader.credentials_provider(static_credentials(credentials));
        } else if let Some(profile) = &options.profile {
            let mut provider = ProfileFileCredentialsProvider::builder().profile_name(profile);
            if let Some(files) = profile_files {
                provider = provider.profile_files(files);
            }
            loader = loader.credentials_provider(provider.build());
        }

        if let Some(endpoint) = &options.endpoint {
            loader = loader.endpoint_url(endpoint.trim_end_matches('/'));
        }

        let config = Self {
            sdk: loader.load().await,
        };
        // Fail before the first remote call rather than inside it.
        config.credentials().await?;
        debug!(
            region = config.region().unwrap_or("unset"),
            endpoint = config.endpoint().unwrap_or("default"),
            "resolved client configuration"
        );
        Ok(config)
    }

    pub fn from_sdk_config(sdk: SdkConfig) -> Self {
        Self { sdk }
    }

    pub fn sdk_config(&self) -> &SdkConfig {
        &self.sdk
    }

    pub fn region(&self) -> Option<&str> {
        self.sdk.region().map(|region| region.as_ref())
    }

    /// Endpoint override, when one was configured.
    pub fn endpoint(&self) -> Option<&str> {
        self.sdk.endpoint_url()
    }

    /// Ask the configured provider for credentials.
    pub async fn credentials(&self) -> Result<Credentials, ClientError> {
        let provider = self
            .sdk
            .credentials_provider()
            .ok_or_else(|| ClientError::Credentials {
                message: "no credential provider configured".to_owned(),
            })?;
        provider
            .provide_credentials()
            .await
            .map_err(|err| ClientError::Credentials {
                message: DisplayErrorContext(&err).to_string(),
            })
    }
}

fn static_credentials(credentials: &StaticCredentials) -> Credentials {
    Credentials::new(
        credentials.access_key_id.clone(),
        credentials.secret_access_key.expose_secret(),
        credentials
            .session_token
            .as_ref()
            .map(|token| token.expose_secret().to_owned()),
        None,
        OPTIONS_PROVIDER,
    )
}
