//! Gateway connection settings.

use serde::{Deserialize, Serialize};

/// Environment variable holding the gateway base URL
pub const ENDPOINT_ENV: &str = "CLOUD_GATEWAY_ENDPOINT";
/// Environment variable holding the optional bearer token
pub const TOKEN_ENV: &str = "CLOUD_GATEWAY_TOKEN";

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:4566";

/// Cloud gateway configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL; operations are posted to `{endpoint}/{service}/{operation}`
    pub endpoint: String,
    /// Bearer token (optional for unauthenticated gateways)
    pub token: Option<String>,
    /// Per-request timeout; unset leaves calls bounded only by the caller
    pub timeout_secs: Option<u64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            endpoint: std::env::var(ENDPOINT_ENV).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            token: std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()),
            timeout_secs: None,
        }
    }
}

impl GatewayConfig {
    /// Create a config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create a config for a specific endpoint
    pub fn new(endpoint: &str) -> Self {
        GatewayConfig {
            endpoint: endpoint.to_string(),
            token: None,
            timeout_secs: None,
        }
    }

    /// Set authentication token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// URL for one gateway operation.
    pub fn operation_url(&self, service: &str, operation: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint.trim_end_matches('/'),
            service,
            operation
        )
    }
}
