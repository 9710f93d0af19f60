//! Control service HTTP client

use std::path::Path;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::env::McpConfig;
use crate::error::{McpClientError, Result};
use crate::response::interpret_dp_set;
use crate::types::{HealthResponse, JsonRpcRequest, SetOutcome};
use crate::value::coerce_value;

/// Timeout of the health probe
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);
/// Timeout of a value write
pub const SET_TIMEOUT: Duration = Duration::from_secs(10);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
/// Response bytes shown in the log
const PREVIEW_CHARS: usize = 200;

const ACCEPT_STREAM: &str = "application/json, text/event-stream";

/// Last known state of the control service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reachability {
    /// Never probed, or not configured
    #[default]
    Unknown,
    Reachable,
    Unreachable,
}

impl std::fmt::Display for Reachability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Unknown => "unknown",
            Self::Reachable => "reachable",
            Self::Unreachable => "unreachable",
        };
        f.write_str(label)
    }
}

/// Client for the WinCC OA MCP HTTP control service
///
/// Starts unconfigured. [`McpClient::configure`] points it at the service
/// of a project; without an endpoint every write fails with
/// [`McpClientError::NotConfigured`].
#[derive(Debug, Clone)]
pub struct McpClient {
    client: Client,
    endpoint: Option<McpConfig>,
    reachability: Reachability,
    health_timeout: Duration,
    set_timeout: Duration,
}

impl McpClient {
    /// Create an unconfigured client with the default timeouts
    pub fn new() -> Result<Self> {
        Self::with_timeouts(HEALTH_TIMEOUT, SET_TIMEOUT)
    }

    /// Create an unconfigured client with custom timeouts
    pub fn with_timeouts(health_timeout: Duration, set_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(set_timeout))
            .build()?;

        Ok(Self {
            client,
            endpoint: None,
            reachability: Reachability::Unknown,
            health_timeout,
            set_timeout,
        })
    }

    /// Discover the endpoint of `project`.
    ///
    /// Returns whether the client is configured afterwards. A project without
    /// an environment file leaves the client unconfigured.
    #[instrument(skip(self), fields(project = %project.display()))]
    pub fn configure(&mut self, project: &Path) -> bool {
        match McpConfig::discover(project) {
            Ok(Some(config)) => {
                self.configure_with(config);
                true
            }
            Ok(None) => {
                info!("No control service configured for project");
                self.reset();
                false
            }
            Err(e) => {
                warn!(error = %e, "Failed to read control service env file");
                self.reset();
                false
            }
        }
    }

    /// Use an explicit endpoint
    pub fn configure_with(&mut self, config: McpConfig) {
        info!(
            url = %config.base_url,
            token = config.has_token(),
            "Control service configured"
        );
        if !config.has_token() {
            warn!("Control service token is empty");
        }
        self.endpoint = Some(config);
        self.reachability = Reachability::Unknown;
    }

    /// Drop the endpoint
    pub fn reset(&mut self) {
        self.endpoint = None;
        self.reachability = Reachability::Unknown;
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    pub fn config(&self) -> Option<&McpConfig> {
        self.endpoint.as_ref()
    }

    pub fn reachability(&self) -> Reachability {
        self.reachability
    }

    // =========================================================================
    // Health Check
    // =========================================================================

    /// Probe `GET /health` and record the outcome.
    ///
    /// Healthy only when the body reports `"status": "ok"`.
    #[instrument(skip(self))]
    pub async fn check_health(&mut self) -> bool {
        let Some(config) = self.endpoint.as_ref() else {
            debug!("Health check skipped, not configured");
            return false;
        };

        let healthy = match self.probe(config).await {
            Ok(health) if health.is_ok() => {
                info!(url = %config.base_url, "Control service reachable");
                true
            }
            Ok(health) => {
                warn!(status = ?health.status, "Control service not healthy");
                false
            }
            Err(e) => {
                warn!(url = %config.base_url, error = %e, "Control service unreachable");
                false
            }
        };

        self.reachability = if healthy {
            Reachability::Reachable
        } else {
            Reachability::Unreachable
        };
        healthy
    }

    async fn probe(&self, config: &McpConfig) -> Result<HealthResponse> {
        let url = config.base_url.join("/health")?;
        let response = self
            .client
            .get(url)
            .timeout(self.health_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(McpClientError::server_error(status));
        }
        // A body that is not JSON is simply not healthy
        Ok(response.json().await.unwrap_or_default())
    }

    // =========================================================================
    // Value Writes
    // =========================================================================

    /// Write `value` to the element `dpe_name` through the `dp-set` tool
    #[instrument(skip(self, value))]
    pub async fn dp_set(&self, dpe_name: &str, value: Value) -> Result<()> {
        let config = self.endpoint.as_ref().ok_or_else(|| {
            error!("dpSet called without a configured control service");
            McpClientError::NotConfigured
        })?;

        let url = config.base_url.join("/mcp")?;
        let request = JsonRpcRequest::dp_set(chrono::Utc::now().timestamp_millis(), dpe_name, value);
        info!(value = %request.params.arguments.datapoints.value, "dpSet");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, ACCEPT_STREAM)
            .bearer_auth(&config.token)
            .timeout(self.set_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "dpSet request failed");
                McpClientError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "dpSet rejected by server");
            return Err(McpClientError::server_error(status));
        }

        let body = response.text().await?;
        let preview: String = body.chars().take(PREVIEW_CHARS).collect();
        info!(response = %preview, "dpSet response");

        interpret_dp_set(&body, dpe_name).inspect_err(|e| match e {
            McpClientError::MalformedResponse => error!("Unexpected dpSet response format"),
            _ => warn!(error = %e, "dpSet failed"),
        })
    }

    /// Coerce user input and write it, reporting the outcome
    pub async fn set_value(&self, dpe_name: &str, raw: &str) -> SetOutcome {
        let outcome = SetOutcome::from(self.dp_set(dpe_name, coerce_value(raw)).await);
        if outcome.success {
            info!(dpe = dpe_name, "Value written");
        }
        outcome
    }
}
