//! The deployment component that performs the actual provisioning.
//!
//! Trellis never creates services, functions or triggers itself. It prepares
//! a request and hands it to a [`DeploymentComponent`], then shapes the
//! component's result into a report.

mod http;

pub use http::HttpComponent;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::classify::DeployedTrigger;
use crate::config::CredentialsConfig;
use crate::error::DeployResult;
use crate::types::{DeploymentState, FunctionSpec, ProjectId, ServiceDescriptor};

/// Account credentials forwarded to the component.
///
/// The secret is only exposed when the request is serialised for sending.
#[derive(Debug, Default)]
pub struct Credentials {
    /// Account identifier.
    pub account_id: Option<String>,
    /// Access key identifier.
    pub access_key_id: Option<String>,
    /// Access key secret.
    pub access_key_secret: Option<SecretString>,
}

impl Credentials {
    /// Copy credentials out of the adapter configuration.
    #[must_use]
    pub fn from_config(config: &CredentialsConfig) -> Self {
        Self {
            account_id: config.account_id.clone(),
            access_key_id: config.access_key_id.clone(),
            access_key_secret: config
                .access_key_secret
                .as_ref()
                .map(|secret| SecretString::from(secret.expose_secret().to_owned())),
        }
    }
}

impl Serialize for Credentials {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Credentials", 3)?;
        s.serialize_field("AccountID", &self.account_id)?;
        s.serialize_field("AccessKeyID", &self.access_key_id)?;
        s.serialize_field(
            "AccessKeySecret",
            &self
                .access_key_secret
                .as_ref()
                .map(|secret| secret.expose_secret()),
        )?;
        s.end()
    }
}

/// Project the deployment belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectContext {
    /// Project name.
    pub project_name: ProjectId,
}

/// Service and function to deploy or remove.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubmittedProperties {
    /// Target region.
    pub region: String,
    /// Effective service attributes.
    pub service: ServiceDescriptor,
    /// Effective function with its reconciled triggers.
    pub function: FunctionSpec,
}

/// Request to deploy a function.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeployRequest {
    /// Desired configuration.
    pub properties: SubmittedProperties,
    /// State recorded by the previous deployment.
    pub state: Option<DeploymentState>,
    /// Account credentials.
    pub credentials: Credentials,
    /// Project context.
    pub project: ProjectContext,
}

/// Request to remove a deployed function.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoveRequest {
    /// What to remove.
    pub properties: SubmittedProperties,
    /// State recorded by the previous deployment.
    pub state: Option<DeploymentState>,
    /// Account credentials.
    pub credentials: Credentials,
    /// Project context.
    pub project: ProjectContext,
}

/// What the component reports after deploying.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeployedResult {
    /// Deployed service, as reported.
    #[serde(default)]
    pub service: serde_json::Value,
    /// Deployed function, as reported.
    #[serde(default)]
    pub function: serde_json::Value,
    /// Deployed triggers with resolved domains.
    #[serde(default)]
    pub triggers: Vec<DeployedTrigger>,
}

/// Trait for deployment component implementations.
///
/// Errors are passed through to the caller unchanged.
#[async_trait]
pub trait DeploymentComponent: Send + Sync {
    /// Deploy the service, function and triggers.
    async fn deploy(&self, request: DeployRequest) -> DeployResult<DeployedResult>;

    /// Remove the service, function and triggers.
    async fn remove(&self, request: RemoveRequest) -> DeployResult<()>;
}
