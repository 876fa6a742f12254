//! The sync state machine.
//!
//! ```text
//! Validating ─► Resolving ─┬─► Creating ─────┬─► ConfiguringAlias ─► Done
//!                          └─► UpdatingCode ─┘
//! ```
//!
//! Every remote call is awaited before the next state is chosen, so calls for
//! one run never overlap. The first fatal error ends the run; alias failures
//! are recorded as warnings instead.

use tracing::{debug, info, warn};

use lambda_push_client::{ClientError, LambdaApi};
use lambda_push_core::{
    merge, AliasName, AliasRequest, Artifact, CreateFunctionRequest, DeploymentTarget,
    FunctionCode, FunctionConfiguration, FunctionName, LastUpdateStatus, SyncOptions,
    UpdateCodeRequest, UpdateConfigurationRequest, Version,
};

use crate::error::SyncError;
use crate::report::{AliasOperation, AliasOutcome, SyncPath, SyncReport, SyncWarning};

#[derive(Debug)]
enum State {
    Validating,
    Resolving,
    Creating,
    UpdatingCode {
        /// Present in record mode: the configuration to merge under.
        previous: Option<FunctionConfiguration>,
    },
    ConfiguringAlias {
        path: SyncPath,
        /// Version returned by the create or update-code call.
        published: Version,
        configuration: FunctionConfiguration,
    },
    Done {
        path: SyncPath,
        published: Version,
        configuration: FunctionConfiguration,
        alias: Option<AliasOutcome>,
    },
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            State::Validating => "validating",
            State::Resolving => "resolving",
            State::Creating => "creating",
            State::UpdatingCode { .. } => "updating-code",
            State::ConfiguringAlias { .. } => "configuring-alias",
            State::Done { .. } => "done",
        }
    }
}

/// Check the inputs of a run without touching the network.
///
/// Order: missing code, then the `.zip` suffix, then the alias name. The
/// alias is checked even when publishing is off.
pub fn validate(
    target: &DeploymentTarget,
    options: &SyncOptions,
    artifact: Option<&Artifact>,
) -> Result<(), SyncError> {
    match artifact {
        None if target.code_location().is_none() => return Err(SyncError::NoArtifactProvided),
        Some(artifact) if !artifact.is_zip() => {
            return Err(SyncError::NotAZipArchive {
                path: artifact.path().to_path_buf(),
            })
        }
        _ => {}
    }

    if let Some(alias) = &options.alias {
        let reason = match &alias.name {
            AliasName::Missing => Some("alias requires a name".to_owned()),
            AliasName::NotAString(kind) => Some(format!("alias name must be a string, got {kind}")),
            AliasName::Named(name) if name.is_empty() => {
                Some("alias name must not be empty".to_owned())
            }
            AliasName::Named(_) => None,
        };
        if let Some(reason) = reason {
            return Err(SyncError::InvalidAliasName { reason });
        }
    }
    Ok(())
}

/// Drives one run against a [`LambdaApi`].
pub struct Orchestrator<C> {
    client: C,
    target: DeploymentTarget,
    options: SyncOptions,
    artifact: Option<Artifact>,
    warnings: Vec<SyncWarning>,
}

impl<C: LambdaApi> Orchestrator<C> {
    pub fn new(
        client: C,
        target: DeploymentTarget,
        options: SyncOptions,
        artifact: Option<Artifact>,
    ) -> Self {
        Self {
            client,
            target,
            options,
            artifact,
            warnings: Vec::new(),
        }
    }

    fn function_name(&self) -> &FunctionName {
        self.target.function_name()
    }

    fn publish(&self) -> bool {
        self.target.effective_publish(&self.options)
    }

    /// Run the state machine to completion.
    pub async fn run(mut self) -> Result<SyncReport, SyncError> {
        let mut state = State::Validating;
        loop {
            debug!(function = %self.function_name(), state = state.name(), "sync state");
            state = match state {
                State::Validating => {
                    validate(&self.target, &self.options, self.artifact.as_ref())?;
                    info!("uploading function \"{}\"", self.function_name());
                    State::Resolving
                }
                State::Resolving => self.resolve().await,
                State::Creating => self.create().await?,
                State::UpdatingCode { previous } => self.update_code(previous).await?,
                State::ConfiguringAlias {
                    path,
                    published,
                    configuration,
                } => {
                    let alias = self.configure_alias(&published).await;
                    State::Done {
                        path,
                        published,
                        configuration,
                        alias,
                    }
                }
                State::Done {
                    path,
                    published,
                    configuration,
                    alias,
                } => {
                    info!("function \"{}\" successfully uploaded", self.function_name());
                    let published_version = self.publish().then_some(published);
                    return Ok(SyncReport {
                        function_name: self.function_name().clone(),
                        path,
                        configuration,
                        published_version,
                        alias,
                        warnings: self.warnings,
                        artifact: self.artifact,
                    });
                }
            };
        }
    }

    /// Bare-name targets skip the lookup; records check for existence first.
    async fn resolve(&self) -> State {
        if self.target.is_code_only() {
            return State::UpdatingCode { previous: None };
        }
        match self.client.get_function_configuration(self.function_name()).await {
            Ok(existing) => State::UpdatingCode {
                previous: Some(existing),
            },
            Err(err) => {
                debug!(function = %self.function_name(), error = %err, "function not found; creating");
                State::Creating
            }
        }
    }

    async fn create(&self) -> Result<State, SyncError> {
        let Some(record) = self.target.record() else {
            return Err(SyncError::NoArtifactProvided);
        };
        let code = match (record.code.clone(), &self.artifact) {
            (Some(location), _) => FunctionCode::Remote(location),
            (None, Some(artifact)) => FunctionCode::ZipFile(artifact.contents.clone()),
            (None, None) => return Err(SyncError::NoArtifactProvided),
        };

        let request = CreateFunctionRequest {
            function_name: record.function_name.clone(),
            fields: merge::for_create(record),
            code,
            publish: self.publish(),
        };
        let created = self
            .client
            .create_function(request)
            .await
            .map_err(|source| SyncError::RemoteCreateFailed {
                function: self.function_name().clone(),
                source,
            })?;
        self.log_published(&created.version);

        Ok(State::ConfiguringAlias {
            path: SyncPath::Created,
            published: created.version.clone(),
            configuration: created,
        })
    }

    async fn update_code(
        &self,
        previous: Option<FunctionConfiguration>,
    ) -> Result<State, SyncError> {
        let update_failed = |source: ClientError| SyncError::RemoteUpdateFailed {
            function: self.function_name().clone(),
            source,
        };

        let code = match (&self.artifact, self.target.code_location()) {
            (Some(artifact), _) => FunctionCode::ZipFile(artifact.contents.clone()),
            (None, Some(location)) => FunctionCode::Remote(location.clone()),
            (None, None) => return Err(SyncError::NoArtifactProvided),
        };
        let updated = self
            .client
            .update_function_code(UpdateCodeRequest {
                function_name: self.function_name().clone(),
                code,
                publish: self.publish(),
            })
            .await
            .map_err(update_failed)?;
        self.log_published(&updated.version);
        let published = updated.version.clone();

        let (Some(record), Some(previous)) = (self.target.record(), previous) else {
            return Ok(State::ConfiguringAlias {
                path: SyncPath::CodeOnly,
                published,
                configuration: updated,
            });
        };

        self.wait_for_update(updated).await.map_err(update_failed)?;

        let configured = self
            .client
            .update_function_configuration(UpdateConfigurationRequest {
                function_name: record.function_name.clone(),
                fields: merge::for_update(record, &previous),
            })
            .await
            .map_err(update_failed)?;

        Ok(State::ConfiguringAlias {
            path: SyncPath::Updated,
            published,
            configuration: configured,
        })
    }

    /// Poll until the code update has been applied remotely.
    async fn wait_for_update(&self, mut current: FunctionConfiguration) -> Result<(), ClientError> {
        let policy = self.options.update_wait;
        let mut attempts = 0;
        loop {
            match current.last_update_status {
                None | Some(LastUpdateStatus::Successful) => return Ok(()),
                Some(LastUpdateStatus::Failed) => {
                    return Err(ClientError::UpdateFailed {
                        reason: current
                            .last_update_status_reason
                            .unwrap_or_else(|| "no reason reported".to_owned()),
                    })
                }
                Some(LastUpdateStatus::InProgress) => {}
            }
            if attempts >= policy.max_attempts {
                return Err(ClientError::UpdateStalled { attempts });
            }
            debug!(function = %self.function_name(), attempts, "code update in progress; waiting");
            tokio::time::sleep(policy.interval()).await;
            attempts += 1;
            current = self
                .client
                .get_function_configuration(self.function_name())
                .await?;
        }
    }

    /// Upsert the alias. Never fails the run.
    async fn configure_alias(&mut self, published: &Version) -> Option<AliasOutcome> {
        let alias = self.options.alias.as_ref()?;
        let name = alias.name.as_str()?.to_owned();
        if !self.publish() {
            info!("alias '{name}' skipped: publishing is disabled");
            return None;
        }

        let request = AliasRequest {
            function_name: self.function_name().clone(),
            function_version: alias.version.clone().unwrap_or_else(|| published.clone()),
            name: name.clone(),
            description: alias.description.clone(),
        };
        let version = request.function_version.clone();

        let exists = self
            .client
            .get_alias(self.function_name(), &name)
            .await
            .is_ok();
        let (operation, result) = if exists {
            (AliasOperation::Update, self.client.update_alias(request).await)
        } else {
            (AliasOperation::Create, self.client.create_alias(request).await)
        };

        match result {
            Ok(_) => {
                info!("{operation}d alias '{name}' for version {version}");
                Some(AliasOutcome {
                    operation,
                    name,
                    version,
                })
            }
            Err(err) => {
                warn!("could not {operation} alias '{name}': {err}");
                self.warnings.push(SyncWarning::AliasOperationFailed {
                    alias: name,
                    operation,
                    message: err.to_string(),
                });
                None
            }
        }
    }

    fn log_published(&self, version: &Version) {
        if self.publish() {
            info!("publishing function version {version}");
        }
    }
}
