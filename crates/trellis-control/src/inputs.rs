//! Per-project deployment inputs.
//!
//! These are read from the project file on every invocation. Unlike
//! [`AdapterConfig`](crate::config::AdapterConfig) they describe one
//! function rather than the tool itself.

use serde::{Deserialize, Serialize};

use crate::component::ProjectContext;
use crate::merge::Overrides;
use crate::types::{
    DomainBinding, Environment, FunctionDescriptor, LogConfig, ServiceDescriptor, Trigger,
};

/// Code artifact location used when none is given.
pub const DEFAULT_CODE_URI: &str = "./";

/// Everything the user supplies for one deploy or remove.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeployInputs {
    /// Project the function belongs to.
    pub project: ProjectContext,
    /// Startup script handling.
    #[serde(default)]
    pub bootstrap: BootstrapInputs,
    /// Desired configuration.
    #[serde(default)]
    pub properties: Properties,
}

/// Startup script to place in the code artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BootstrapInputs {
    /// Script content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Replace an existing script.
    #[serde(default, rename = "IsConfig")]
    pub force: bool,
}

/// Desired configuration for the function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Properties {
    /// Target region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Path to the code artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_uri: Option<String>,
    /// Domains for the default HTTP trigger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains: Option<Vec<DomainBinding>>,
    /// Function environment, replacing any other source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    /// Service log configuration, replacing any other source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<LogConfig>,
    /// Per-field service and function overrides.
    #[serde(default)]
    pub detail: Detail,
}

/// Service and function overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Detail {
    /// Service attributes.
    #[serde(default)]
    pub service: ServiceDescriptor,
    /// Function attributes and explicit triggers.
    #[serde(default)]
    pub function: FunctionOverride,
}

/// Function attributes plus the user's own trigger list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionOverride {
    /// Function attributes.
    #[serde(flatten)]
    pub descriptor: FunctionDescriptor,
    /// Explicit triggers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Vec<Trigger>>,
}

impl DeployInputs {
    /// Region requested by the user, if any.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.properties.region.as_deref()
    }

    /// Code artifact location, defaulting to the working directory.
    #[must_use]
    pub fn code_uri(&self) -> &str {
        self.properties
            .code_uri
            .as_deref()
            .unwrap_or(DEFAULT_CODE_URI)
    }

    /// Whether the user declared a non-empty trigger list.
    #[must_use]
    pub fn has_user_triggers(&self) -> bool {
        self.properties
            .detail
            .function
            .triggers
            .as_ref()
            .is_some_and(|triggers| !triggers.is_empty())
    }

    /// Overrides to layer over defaults and recorded state.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            service: self.properties.detail.service.clone(),
            function: self.properties.detail.function.descriptor.clone(),
            log: self.properties.log.clone(),
            environment: self.properties.environment.clone(),
        }
    }
}
