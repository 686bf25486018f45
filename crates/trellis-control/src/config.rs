//! Configuration for trellis-control.

use std::path::PathBuf;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::domain::{SuffixMatcher, DEFAULT_AUTO_SUFFIX};
use crate::error::{DeployError, DeployResult};
use crate::merge::Descriptors;
use crate::types::{FunctionDescriptor, ServiceDescriptor};

/// Top-level adapter configuration.
#[derive(Debug, Deserialize, Default)]
pub struct AdapterConfig {
    /// Built-in service and function defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Automatic domain recognition.
    #[serde(default)]
    pub domains: DomainsConfig,

    /// Deployment component endpoint.
    #[serde(default)]
    pub component: ComponentConfig,

    /// Where deployment state is kept.
    #[serde(default)]
    pub state: StateConfig,

    /// Account credentials forwarded to the deployment component.
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

impl AdapterConfig {
    /// Load configuration from the default sources.
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. `trellis.toml` in the current directory (if present)
    /// 3. Environment variables with `TRELLIS_` prefix
    pub fn load() -> DeployResult<Self> {
        Self::from_file("trellis.toml")
    }

    /// Load configuration from a specific TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> DeployResult<Self> {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("TRELLIS_").split("__"))
            .extract()
            .map_err(|e| DeployError::Config(e.to_string()))
    }
}

/// Values used when neither the previous state nor the user supplies one.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    /// Region to deploy to.
    #[serde(default = "default_region")]
    pub region: String,

    /// Service name.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Service description.
    #[serde(default = "default_service_description")]
    pub service_description: String,

    /// Prefix of the generated function name.
    #[serde(default = "default_function_name_prefix")]
    pub function_name_prefix: String,

    /// Function description.
    #[serde(default = "default_function_description")]
    pub function_description: String,

    /// Function entry point.
    #[serde(default = "default_handler")]
    pub handler: String,

    /// Memory limit in MB.
    #[serde(default = "default_memory_size")]
    pub memory_size: u32,

    /// Runtime identifier.
    #[serde(default = "default_runtime")]
    pub runtime: String,

    /// Timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u32,
}

fn default_region() -> String {
    "cn-hangzhou".to_owned()
}

fn default_service_name() -> String {
    "s-service".to_owned()
}

fn default_service_description() -> String {
    "This Service Powered By Serverless Devs Tool".to_owned()
}

fn default_function_name_prefix() -> String {
    "s-function".to_owned()
}

fn default_function_description() -> String {
    "This Function Powered By Serverless Devs Tool".to_owned()
}

fn default_handler() -> String {
    "index.handler".to_owned()
}

const fn default_memory_size() -> u32 {
    128
}

fn default_runtime() -> String {
    "custom".to_owned()
}

const fn default_timeout() -> u32 {
    10
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            service_name: default_service_name(),
            service_description: default_service_description(),
            function_name_prefix: default_function_name_prefix(),
            function_description: default_function_description(),
            handler: default_handler(),
            memory_size: default_memory_size(),
            runtime: default_runtime(),
            timeout: default_timeout(),
        }
    }
}

impl DefaultsConfig {
    /// Build the default descriptors.
    ///
    /// The function name embeds the current time in milliseconds, so every
    /// call yields a distinct name.
    #[must_use]
    pub fn descriptors(&self) -> Descriptors {
        let function_name = format!(
            "{}-{}",
            self.function_name_prefix,
            chrono::Utc::now().timestamp_millis()
        );

        Descriptors {
            service: ServiceDescriptor {
                name: Some(self.service_name.clone()),
                description: Some(self.service_description.clone()),
                ..ServiceDescriptor::default()
            },
            function: FunctionDescriptor {
                name: Some(function_name),
                description: Some(self.function_description.clone()),
                handler: Some(self.handler.clone()),
                memory_size: Some(self.memory_size),
                runtime: Some(self.runtime.clone()),
                timeout: Some(self.timeout),
                ..FunctionDescriptor::default()
            },
        }
    }
}

/// Automatic domain recognition.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainsConfig {
    /// Suffix of platform-generated hostnames.
    #[serde(default = "default_auto_suffix")]
    pub auto_suffix: String,
}

fn default_auto_suffix() -> String {
    DEFAULT_AUTO_SUFFIX.to_owned()
}

impl Default for DomainsConfig {
    fn default() -> Self {
        Self {
            auto_suffix: default_auto_suffix(),
        }
    }
}

impl DomainsConfig {
    /// Build the matcher for the configured suffix.
    #[must_use]
    pub fn matcher(&self) -> SuffixMatcher {
        SuffixMatcher::new(self.auto_suffix.clone())
    }
}

/// Deployment component endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentConfig {
    /// Base URL of the component API.
    #[serde(default = "default_component_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_component_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_component_url() -> String {
    "http://localhost:8090".to_owned()
}

const fn default_component_timeout_secs() -> u64 {
    300 // 5 minutes
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            url: default_component_url(),
            timeout_secs: default_component_timeout_secs(),
        }
    }
}

/// Deployment state configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    /// Storage backend.
    #[serde(default)]
    pub backend: StateBackend,

    /// Directory holding state files.
    #[serde(default = "default_state_dir")]
    pub dir: PathBuf,
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".trellis")
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            backend: StateBackend::default(),
            dir: default_state_dir(),
        }
    }
}

/// Type of state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateBackend {
    /// One JSON file per project.
    #[default]
    File,

    /// In-process store, lost on exit.
    Memory,
}

/// Account credentials.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsConfig {
    /// Account identifier.
    #[serde(default)]
    pub account_id: Option<String>,

    /// Access key identifier.
    #[serde(default)]
    pub access_key_id: Option<String>,

    /// Access key secret.
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub access_key_secret: Option<SecretString>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.map(SecretString::from))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn default_config_is_valid() {
        let config = AdapterConfig::default();
        assert_eq!(config.defaults.region, "cn-hangzhou");
        assert_eq!(config.defaults.memory_size, 128);
        assert_eq!(config.domains.auto_suffix, ".test.functioncompute.com");
        assert_eq!(config.component.timeout_secs, 300);
        assert_eq!(config.state.backend, StateBackend::File);
        assert!(config.credentials.access_key_secret.is_none());
    }

    #[test]
    fn config_from_toml() {
        let toml = r#"
            [defaults]
            region = "cn-shanghai"
            runtime = "nodejs14"

            [domains]
            auto_suffix = ".fc.internal"

            [component]
            url = "http://component:9000"

            [state]
            backend = "memory"

            [credentials]
            account_id = "1234"
            access_key_id = "AKID"
            access_key_secret = "s3cret"
        "#;

        let config: AdapterConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.defaults.region, "cn-shanghai");
        assert_eq!(config.defaults.runtime, "nodejs14");
        assert_eq!(config.defaults.handler, "index.handler");
        assert_eq!(config.domains.auto_suffix, ".fc.internal");
        assert_eq!(config.component.url, "http://component:9000");
        assert_eq!(config.state.backend, StateBackend::Memory);
        assert_eq!(
            config
                .credentials
                .access_key_secret
                .as_ref()
                .unwrap()
                .expose_secret(),
            "s3cret"
        );
    }

    #[test]
    fn default_function_names_are_prefixed() {
        let defaults = DefaultsConfig::default();
        let descriptors = defaults.descriptors();
        let name = descriptors.function.name.unwrap();
        assert!(name.starts_with("s-function-"));
        assert!(name["s-function-".len()..].parse::<i64>().is_ok());
        assert_eq!(descriptors.service.name.as_deref(), Some("s-service"));
    }

    #[test]
    fn credentials_are_redacted_in_debug() {
        let config: AdapterConfig = toml::from_str(
            r#"
            [credentials]
            access_key_secret = "do-not-print"
            "#,
        )
        .unwrap();
        assert!(!format!("{config:?}").contains("do-not-print"));
    }
}
