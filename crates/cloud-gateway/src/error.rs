//! Error types for cloud-gateway

use thiserror::Error;

/// Errors raised while talking to the cloud gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration is unusable (bad endpoint, client build failure)
    #[error("invalid gateway configuration: {0}")]
    InvalidConfig(String),

    /// The request never got a response
    #[error("HTTP error: {0}")]
    Http(String),

    /// The gateway answered with a non-2xx status
    #[error("{operation} returned {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// Request or response body did not match the wire contract
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Http(err.to_string())
    }
}

impl GatewayError {
    /// Whether the failure happened below the wire contract, before any
    /// gateway answer was seen.
    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::Http(_) | GatewayError::InvalidConfig(_))
    }
}

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
