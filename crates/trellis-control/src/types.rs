//! Core types for trellis-control.
//!
//! Field names follow the PascalCase wire format shared by the project file,
//! the persisted state and the deployment component.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder domain meaning "assign a hostname automatically".
pub const AUTO_DOMAIN: &str = "Auto";

/// Path matched by the default route.
pub const DEFAULT_ROUTE_PATH: &str = "/*";

/// Qualifier served by the default route.
pub const DEFAULT_QUALIFIER: &str = "LATEST";

/// Name of the trigger created when the user declares none.
pub const DEFAULT_TRIGGER_NAME: &str = "http";

/// Project name used to key persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Create a new project ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Function environment variables.
pub type Environment = BTreeMap<String, String>;

/// Log shipping target for a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogConfig {
    /// Log store inside the project.
    pub log_store: String,
    /// Log project name.
    pub project: String,
}

/// Service attributes.
///
/// Well-known fields are typed; anything else is carried through untouched
/// in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceDescriptor {
    /// Service name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Human readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Log shipping configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<LogConfig>,
    /// Attributes without a dedicated field.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Function attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionDescriptor {
    /// Function name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Human readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Entry point, e.g. `index.handler`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    /// Memory limit in MB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_size: Option<u32>,
    /// Runtime identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    /// Timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    /// Environment variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    /// Attributes without a dedicated field.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The function as submitted to the deployment component and recorded in
/// state: merged attributes plus the artifact location and final triggers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionSpec {
    /// Merged function attributes.
    #[serde(flatten)]
    pub descriptor: FunctionDescriptor,
    /// Path to the code artifact.
    #[serde(default)]
    pub code_uri: String,
    /// Reconciled triggers.
    #[serde(default)]
    pub triggers: Vec<Trigger>,
}

/// State recorded after a successful deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentState {
    /// Region the function was deployed to.
    pub region: String,
    /// Service as submitted.
    pub service: ServiceDescriptor,
    /// Function as submitted.
    pub function: FunctionSpec,
    /// Hostname the platform assigned automatically, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_domain: Option<String>,
}

/// A single path routed to a function qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Route {
    /// Path pattern.
    pub path: String,
    /// Version or alias to serve.
    pub qualifier: String,
}

impl Default for Route {
    fn default() -> Self {
        Self {
            path: DEFAULT_ROUTE_PATH.to_owned(),
            qualifier: DEFAULT_QUALIFIER.to_owned(),
        }
    }
}

/// A hostname bound to an HTTP trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainBinding {
    /// Concrete hostname, auto-generated hostname or [`AUTO_DOMAIN`].
    pub domain: String,
    /// Routes served on this hostname.
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl DomainBinding {
    /// Bind `domain` with the default `/*` → `LATEST` route.
    #[must_use]
    pub fn with_default_route(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            routes: vec![Route::default()],
        }
    }

    /// A binding that asks the platform to assign a hostname.
    #[must_use]
    pub fn auto() -> Self {
        Self::with_default_route(AUTO_DOMAIN)
    }

    /// Whether the domain is the "Auto" placeholder (any casing).
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        is_sentinel(&self.domain)
    }
}

/// Whether `domain` is the "Auto" placeholder (any casing).
#[must_use]
pub fn is_sentinel(domain: &str) -> bool {
    domain.eq_ignore_ascii_case(AUTO_DOMAIN)
}

/// Trigger kind.
///
/// Only HTTP triggers can own domains; anything else is accepted on input
/// and coerced to HTTP during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TriggerType {
    /// HTTP trigger.
    #[default]
    #[serde(rename = "HTTP")]
    Http,
    /// A trigger kind this adapter does not manage.
    #[serde(other)]
    Unsupported,
}

impl TriggerType {
    /// Get the type name as a static string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "HTTP",
            Self::Unsupported => "Unsupported",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who may invoke an HTTP trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthType {
    /// No authentication.
    #[default]
    Anonymous,
    /// Signed requests only.
    Function,
}

/// HTTP verbs accepted by a trigger.
///
/// Written in upper case, read in any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// PATCH
    Patch,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
}

impl HttpMethod {
    /// Every supported verb.
    pub const ALL: [Self; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Patch,
        Self::Head,
        Self::Options,
    ];

    /// Wire name of the verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown HTTP method: {s}"))
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Parameters of an HTTP trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HttpTriggerParameters {
    /// Invocation authentication.
    #[serde(default)]
    pub auth_type: AuthType,
    /// Accepted verbs.
    #[serde(default)]
    pub methods: BTreeSet<HttpMethod>,
    /// Bound hostnames.
    #[serde(default)]
    pub domains: Vec<DomainBinding>,
    /// Parameters without a dedicated field.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A function trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Trigger {
    /// Trigger name, unique within the function.
    pub name: String,
    /// Trigger kind.
    #[serde(rename = "Type", default)]
    pub trigger_type: TriggerType,
    /// Trigger parameters.
    #[serde(default)]
    pub parameters: HttpTriggerParameters,
}

impl Trigger {
    /// The trigger used when the user declares none: anonymous GET/POST/PUT
    /// bound to `domains`.
    ///
    /// Built fresh on every call.
    #[must_use]
    pub fn default_http(domains: Vec<DomainBinding>) -> Self {
        Self {
            name: DEFAULT_TRIGGER_NAME.to_owned(),
            trigger_type: TriggerType::Http,
            parameters: HttpTriggerParameters {
                auth_type: AuthType::Anonymous,
                methods: [HttpMethod::Get, HttpMethod::Post, HttpMethod::Put]
                    .into_iter()
                    .collect(),
                domains,
                extra: Map::new(),
            },
        }
    }

    /// Iterate over every bound hostname.
    pub fn domain_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.domains.iter().map(|d| d.domain.as_str())
    }
}

/// A value the deployment component may report either as a scalar or as a
/// sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// A single value.
    One(T),
    /// Zero or more values.
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Collapse a one-element vector to [`OneOrMany::One`].
    #[must_use]
    pub fn collapse(mut values: Vec<T>) -> Self {
        if values.len() == 1 {
            if let Some(value) = values.pop() {
                return Self::One(value);
            }
        }
        Self::Many(values)
    }

    /// Normalise into a vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}
