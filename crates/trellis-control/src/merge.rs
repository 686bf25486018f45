//! Layering of service and function attributes.
//!
//! Precedence, lowest to highest: built-in defaults, the previously recorded
//! deployment, user overrides. Merging is shallow: a field that is present in
//! a higher layer replaces the lower value entirely.

use serde_json::Map;

use crate::types::{
    DeploymentState, Environment, FunctionDescriptor, LogConfig, ServiceDescriptor,
};

/// A service/function descriptor pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Descriptors {
    /// Service attributes.
    pub service: ServiceDescriptor,
    /// Function attributes.
    pub function: FunctionDescriptor,
}

/// Attributes supplied by the user for this deployment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    /// Per-field service overrides.
    pub service: ServiceDescriptor,
    /// Per-field function overrides.
    pub function: FunctionDescriptor,
    /// Top-level log configuration; replaces the service log wholesale.
    pub log: Option<LogConfig>,
    /// Top-level environment; replaces the function environment wholesale.
    pub environment: Option<Environment>,
}

/// Shallow field-wise layering of one descriptor over another.
pub trait Layer {
    /// Returns `self` with any missing fields taken from `lower`.
    #[must_use]
    fn over(self, lower: Self) -> Self;
}

fn layer_extra(
    upper: Map<String, serde_json::Value>,
    mut lower: Map<String, serde_json::Value>,
) -> Map<String, serde_json::Value> {
    lower.extend(upper);
    lower
}

impl Layer for ServiceDescriptor {
    fn over(self, lower: Self) -> Self {
        Self {
            name: self.name.or(lower.name),
            description: self.description.or(lower.description),
            log: self.log.or(lower.log),
            extra: layer_extra(self.extra, lower.extra),
        }
    }
}

impl Layer for FunctionDescriptor {
    fn over(self, lower: Self) -> Self {
        Self {
            name: self.name.or(lower.name),
            description: self.description.or(lower.description),
            handler: self.handler.or(lower.handler),
            memory_size: self.memory_size.or(lower.memory_size),
            runtime: self.runtime.or(lower.runtime),
            timeout: self.timeout.or(lower.timeout),
            environment: self.environment.or(lower.environment),
            extra: layer_extra(self.extra, lower.extra),
        }
    }
}

/// Compute the effective descriptors for a deployment.
#[must_use]
pub fn merge(
    defaults: Descriptors,
    previous: Option<&DeploymentState>,
    overrides: Overrides,
) -> Descriptors {
    let (previous_service, previous_function) = previous
        .map(|state| (state.service.clone(), state.function.descriptor.clone()))
        .unwrap_or_default();

    let mut service = overrides
        .service
        .over(previous_service.over(defaults.service));
    let mut function = overrides
        .function
        .over(previous_function.over(defaults.function));

    if let Some(log) = overrides.log {
        service.log = Some(log);
    }
    if let Some(environment) = overrides.environment {
        function.environment = Some(environment);
    }

    Descriptors { service, function }
}
