//! HTTP client for a remote deployment component.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::config::ComponentConfig;
use crate::error::{DeployError, DeployResult};

use super::{DeployRequest, DeployedResult, DeploymentComponent, RemoveRequest};

/// Error body returned by the component API.
#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Deployment component reached over HTTP.
///
/// Posts JSON to `<url>/deploy` and `<url>/remove`.
#[derive(Debug, Clone)]
pub struct HttpComponent {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpComponent {
    /// Create a new component client from configuration.
    pub fn new(config: &ComponentConfig) -> DeployResult<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DeployError::Http)?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_owned(),
            timeout,
        })
    }

    /// Create a new component client with a custom base URL and the default
    /// timeout.
    pub fn with_url(url: impl Into<String>) -> DeployResult<Self> {
        Self::new(&ComponentConfig {
            url: url.into(),
            ..ComponentConfig::default()
        })
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn post<T: serde::Serialize + Sync>(&self, path: &str, body: &T) -> DeployResult<Response> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "calling deployment component");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(DeployError::Http)?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => format!("{path} failed: {status}"),
        };
        Err(DeployError::component(message))
    }
}

#[async_trait]
impl DeploymentComponent for HttpComponent {
    async fn deploy(&self, request: DeployRequest) -> DeployResult<DeployedResult> {
        let response = self.post("deploy", &request).await?;
        response.json().await.map_err(DeployError::Http)
    }

    async fn remove(&self, request: RemoveRequest) -> DeployResult<()> {
        self.post("remove", &request).await?;
        Ok(())
    }
}
