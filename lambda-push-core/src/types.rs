//! Domain types for a lambda-push run.
//!
//! Everything here is constructed fresh for a single sync run and dropped
//! afterwards. Remote shapes ([`FunctionConfiguration`], [`AliasRecord`]) are
//! wire-format agnostic; the client crate owns the JSON mapping.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use secrecy::SecretString;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";
/// Handler applied when neither the record nor the remote function names one.
pub const DEFAULT_HANDLER: &str = "index.handler";
/// Runtime applied when neither the record nor the remote function names one.
pub const DEFAULT_RUNTIME: &str = "nodejs20.x";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Name (or ARN) of the remote function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionName(pub String);

impl FunctionName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for FunctionName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FunctionName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A function version. Always carried as a string, even when the source
/// (a YAML file, a CLI flag) supplied a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Version(pub String);

impl Version {
    pub const LATEST: &'static str = "$LATEST";

    pub fn latest() -> Self {
        Self(Self::LATEST.to_owned())
    }

    pub fn is_latest(&self) -> bool {
        self.0 == Self::LATEST
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<u64> for Version {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Version(s),
            Raw::Number(n) => Version::from(n),
        })
    }
}

// ---------------------------------------------------------------------------
// Code
// ---------------------------------------------------------------------------

/// Code already uploaded to object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodeLocation {
    pub s3_bucket: String,
    pub s3_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_object_version: Option<String>,
}

/// Code descriptor sent with create-function and update-code.
#[derive(Clone, PartialEq, Eq)]
pub enum FunctionCode {
    /// ZIP bytes uploaded inline.
    ZipFile(Bytes),
    /// A reference to code already in object storage.
    Remote(CodeLocation),
}

impl fmt::Debug for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionCode::ZipFile(bytes) => write!(f, "ZipFile({} bytes)", bytes.len()),
            FunctionCode::Remote(location) => f.debug_tuple("Remote").field(location).finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// Deployment target
// ---------------------------------------------------------------------------

/// Full configuration record for a function.
///
/// Only the function name is required. The record can point at code in
/// object storage but never carries inline code; inline code always comes
/// from the pipeline artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionRecord {
    pub function_name: FunctionName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_size: Option<u32>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeLocation>,
    /// Overrides [`SyncOptions::publish`] when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<bool>,
}

impl FunctionRecord {
    pub fn new(function_name: impl Into<FunctionName>) -> Self {
        Self {
            function_name: function_name.into(),
            ..Self::default()
        }
    }
}

/// What a run deploys to. The mode is fixed once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DeploymentTarget {
    /// Bare function name: code-only update.
    Name(FunctionName),
    /// Full record: create-or-update code and configuration.
    Record(FunctionRecord),
}

impl DeploymentTarget {
    pub fn function_name(&self) -> &FunctionName {
        match self {
            DeploymentTarget::Name(name) => name,
            DeploymentTarget::Record(record) => &record.function_name,
        }
    }

    pub fn record(&self) -> Option<&FunctionRecord> {
        match self {
            DeploymentTarget::Name(_) => None,
            DeploymentTarget::Record(record) => Some(record),
        }
    }

    pub fn is_code_only(&self) -> bool {
        matches!(self, DeploymentTarget::Name(_))
    }

    /// Remote code location named by the record, if any.
    pub fn code_location(&self) -> Option<&CodeLocation> {
        self.record().and_then(|r| r.code.as_ref())
    }

    /// Publish flag after applying record-over-option precedence.
    pub fn effective_publish(&self, options: &SyncOptions) -> bool {
        self.record()
            .and_then(|r| r.publish)
            .unwrap_or(options.publish)
    }
}

impl From<&str> for DeploymentTarget {
    fn from(name: &str) -> Self {
        DeploymentTarget::Name(FunctionName::from(name))
    }
}

impl From<FunctionName> for DeploymentTarget {
    fn from(name: FunctionName) -> Self {
        DeploymentTarget::Name(name)
    }
}

impl From<FunctionRecord> for DeploymentTarget {
    fn from(record: FunctionRecord) -> Self {
        DeploymentTarget::Record(record)
    }
}

// A string selects bare-name mode, a mapping selects record mode. Written by
// hand so record errors (unknown fields, bad types) keep their message.
impl<'de> Deserialize<'de> for DeploymentTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TargetVisitor;

        impl<'de> Visitor<'de> for TargetVisitor {
            type Value = DeploymentTarget;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a function name or a function record")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(DeploymentTarget::from(v))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(DeploymentTarget::Name(FunctionName(v)))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                FunctionRecord::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(DeploymentTarget::Record)
            }
        }

        deserializer.deserialize_any(TargetVisitor)
    }
}

// ---------------------------------------------------------------------------
// Artifact
// ---------------------------------------------------------------------------

/// The single ZIP payload accepted from the pipeline.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: Bytes,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Bytes>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Literal, case-sensitive `.zip` suffix check on the source path.
    pub fn is_zip(&self) -> bool {
        self.path.to_string_lossy().ends_with(".zip")
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("path", &self.path)
            .field("len", &self.contents.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Alias name as supplied. Validation happens before any remote call, so a
/// malformed value is kept rather than rejected at parse time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AliasName {
    #[default]
    Missing,
    Named(String),
    /// A non-string value; holds a short description of what was given.
    NotAString(String),
}

impl AliasName {
    /// The name, when it is a non-empty string. Whitespace is left for the
    /// service to judge.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AliasName::Named(name) if !name.is_empty() => Some(name),
            _ => None,
        }
    }
}

impl From<&str> for AliasName {
    fn from(s: &str) -> Self {
        AliasName::Named(s.to_owned())
    }
}

impl From<String> for AliasName {
    fn from(s: String) -> Self {
        AliasName::Named(s)
    }
}

impl<'de> Deserialize<'de> for AliasName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde_yaml::Value;

        Ok(match Value::deserialize(deserializer)? {
            Value::Null => AliasName::Missing,
            Value::String(s) => AliasName::Named(s),
            Value::Bool(_) => AliasName::NotAString("a boolean".to_owned()),
            Value::Number(_) => AliasName::NotAString("a number".to_owned()),
            Value::Sequence(_) => AliasName::NotAString("a sequence".to_owned()),
            Value::Mapping(_) => AliasName::NotAString("a mapping".to_owned()),
            Value::Tagged(_) => AliasName::NotAString("a tagged value".to_owned()),
        })
    }
}

/// Alias to point at the published version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AliasOptions {
    #[serde(default)]
    pub name: AliasName,
    #[serde(default)]
    pub description: Option<String>,
    /// Explicit version; wins over the version returned by publishing.
    #[serde(default)]
    pub version: Option<Version>,
}

impl AliasOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: AliasName::Named(name.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<Version>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Explicit key/secret pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticCredentials {
    pub access_key_id: String,
    #[serde(deserialize_with = "secret")]
    pub secret_access_key: SecretString,
    #[serde(default, deserialize_with = "optional_secret")]
    pub session_token: Option<SecretString>,
}

impl StaticCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::from(secret_access_key.into()),
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(SecretString::from(token.into()));
        self
    }
}

fn secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

fn optional_secret<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SecretString>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

/// Polling policy while a code update is being applied remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct UpdateWait {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

impl UpdateWait {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for UpdateWait {
    fn default() -> Self {
        Self {
            interval_ms: 1_000,
            max_attempts: 60,
        }
    }
}

/// Options for one sync run.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SyncOptions {
    /// Named profile in the shared credentials file.
    pub profile: Option<String>,
    /// Explicit credentials; win over `profile`.
    pub credentials: Option<StaticCredentials>,
    pub region: String,
    /// Publish a new version after the code lands.
    pub publish: bool,
    pub alias: Option<AliasOptions>,
    /// Base URL override for Lambda-compatible endpoints.
    pub endpoint: Option<String>,
    pub update_wait: UpdateWait,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            profile: None,
            credentials: None,
            region: DEFAULT_REGION.to_owned(),
            publish: false,
            alias: None,
            endpoint: None,
            update_wait: UpdateWait::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Remote shapes
// ---------------------------------------------------------------------------

/// Progress of the most recent code or configuration update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastUpdateStatus {
    Successful,
    Failed,
    InProgress,
}

/// Function configuration as reported by the hosting service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionConfiguration {
    pub function_name: FunctionName,
    pub function_arn: Option<String>,
    pub version: Version,
    pub handler: Option<String>,
    pub runtime: Option<String>,
    pub role: Option<String>,
    pub memory_size: Option<u32>,
    pub timeout: Option<u32>,
    pub description: Option<String>,
    pub environment: Option<BTreeMap<String, String>>,
    pub state: Option<String>,
    pub last_update_status: Option<LastUpdateStatus>,
    pub last_update_status_reason: Option<String>,
    /// `Zip` or `Image`.
    pub package_type: Option<String>,
}

impl FunctionConfiguration {
    /// Container-image functions carry no handler or runtime.
    pub fn is_image(&self) -> bool {
        self.package_type.as_deref() == Some("Image")
    }
}

/// Alias as reported by the hosting service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasRecord {
    pub name: String,
    pub function_version: Version,
    pub description: Option<String>,
    pub alias_arn: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
