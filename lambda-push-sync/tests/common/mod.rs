//! Recording in-memory `LambdaApi` for orchestrator tests.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use lambda_push_client::{ClientError, LambdaApi};
use lambda_push_core::{
    AliasRecord, AliasRequest, CreateFunctionRequest, FunctionConfiguration, FunctionName,
    LastUpdateStatus, UpdateCodeRequest, UpdateConfigurationRequest, Version,
};

/// One remote call, in the order it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetConfiguration(FunctionName),
    Create(CreateFunctionRequest),
    UpdateCode(UpdateCodeRequest),
    UpdateConfiguration(UpdateConfigurationRequest),
    GetAlias(FunctionName, String),
    CreateAlias(AliasRequest),
    UpdateAlias(AliasRequest),
}

impl Call {
    pub fn kind(&self) -> &'static str {
        match self {
            Call::GetConfiguration(_) => "get-configuration",
            Call::Create(_) => "create",
            Call::UpdateCode(_) => "update-code",
            Call::UpdateConfiguration(_) => "update-configuration",
            Call::GetAlias(..) => "get-alias",
            Call::CreateAlias(_) => "create-alias",
            Call::UpdateAlias(_) => "update-alias",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Create,
    UpdateCode,
    UpdateConfiguration,
    CreateAlias,
    UpdateAlias,
}

#[derive(Debug, Default)]
pub struct FakeLambda {
    existing: Option<FunctionConfiguration>,
    publish_version: Option<Version>,
    alias_exists: bool,
    failing: HashSet<Op>,
    /// Update status returned by update-code, then by each later status check.
    statuses: Mutex<VecDeque<LastUpdateStatus>>,
    code_updated: AtomicBool,
    calls: Mutex<Vec<Call>>,
}

impl FakeLambda {
    pub fn new() -> Self {
        Self::default()
    }

    /// The function exists with this configuration.
    pub fn with_existing(mut self, configuration: FunctionConfiguration) -> Self {
        self.existing = Some(configuration);
        self
    }

    /// Version handed out by publishing calls.
    pub fn publishing(mut self, version: &str) -> Self {
        self.publish_version = Some(Version::from(version));
        self
    }

    pub fn with_alias(mut self) -> Self {
        self.alias_exists = true;
        self
    }

    pub fn failing(mut self, op: Op) -> Self {
        self.failing.insert(op);
        self
    }

    pub fn with_statuses(self, statuses: impl IntoIterator<Item = LastUpdateStatus>) -> Self {
        self.statuses
            .lock()
            .expect("statuses")
            .extend(statuses);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls").clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.calls().iter().map(Call::kind).collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls").push(call);
    }

    fn check(&self, op: Op) -> Result<(), ClientError> {
        if self.failing.contains(&op) {
            return Err(ClientError::Api {
                operation: "fake",
                code: "ServiceException".into(),
                message: format!("{op:?} rejected"),
            });
        }
        Ok(())
    }

    fn next_status(&self) -> Option<LastUpdateStatus> {
        self.statuses.lock().expect("statuses").pop_front()
    }

    fn published(&self, function: &FunctionName, publish: bool) -> FunctionConfiguration {
        let version = match (&self.publish_version, publish) {
            (Some(version), true) => version.clone(),
            _ => Version::latest(),
        };
        FunctionConfiguration {
            function_name: function.clone(),
            version,
            ..FunctionConfiguration::default()
        }
    }
}

fn not_found(what: &str) -> ClientError {
    ClientError::NotFound {
        message: format!("{what} not found"),
    }
}

#[async_trait]
impl LambdaApi for FakeLambda {
    async fn get_function_configuration(
        &self,
        function: &FunctionName,
    ) -> Result<FunctionConfiguration, ClientError> {
        self.record(Call::GetConfiguration(function.clone()));
        let mut configuration = self.existing.clone().ok_or_else(|| not_found("function"))?;
        if self.code_updated.load(Ordering::SeqCst) {
            configuration.last_update_status = self.next_status();
            configuration.last_update_status_reason = Some("bad handler".into());
        }
        Ok(configuration)
    }

    async fn create_function(
        &self,
        request: CreateFunctionRequest,
    ) -> Result<FunctionConfiguration, ClientError> {
        self.record(Call::Create(request.clone()));
        self.check(Op::Create)?;
        Ok(self.published(&request.function_name, request.publish))
    }

    async fn update_function_code(
        &self,
        request: UpdateCodeRequest,
    ) -> Result<FunctionConfiguration, ClientError> {
        self.record(Call::UpdateCode(request.clone()));
        self.check(Op::UpdateCode)?;
        self.code_updated.store(true, Ordering::SeqCst);
        let mut configuration = self.published(&request.function_name, request.publish);
        configuration.last_update_status = self.next_status();
        Ok(configuration)
    }

    async fn update_function_configuration(
        &self,
        request: UpdateConfigurationRequest,
    ) -> Result<FunctionConfiguration, ClientError> {
        self.record(Call::UpdateConfiguration(request.clone()));
        self.check(Op::UpdateConfiguration)?;
        Ok(FunctionConfiguration {
            function_name: request.function_name,
            handler: request.fields.handler,
            runtime: request.fields.runtime,
            ..FunctionConfiguration::default()
        })
    }

    async fn get_alias(
        &self,
        function: &FunctionName,
        name: &str,
    ) -> Result<AliasRecord, ClientError> {
        self.record(Call::GetAlias(function.clone(), name.to_owned()));
        if !self.alias_exists {
            return Err(not_found("alias"));
        }
        Ok(AliasRecord {
            name: name.to_owned(),
            function_version: Version::from("1"),
            ..AliasRecord::default()
        })
    }

    async fn create_alias(&self, request: AliasRequest) -> Result<AliasRecord, ClientError> {
        self.record(Call::CreateAlias(request.clone()));
        self.check(Op::CreateAlias)?;
        Ok(AliasRecord {
            name: request.name,
            function_version: request.function_version,
            description: request.description,
            alias_arn: None,
        })
    }

    async fn update_alias(&self, request: AliasRequest) -> Result<AliasRecord, ClientError> {
        self.record(Call::UpdateAlias(request.clone()));
        self.check(Op::UpdateAlias)?;
        Ok(AliasRecord {
            name: request.name,
            function_version: request.function_version,
            description: request.description,
            alias_arn: None,
        })
    }
}

/// Route library logs to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
