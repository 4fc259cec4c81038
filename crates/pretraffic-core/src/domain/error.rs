//! Error taxonomy for the pre-traffic gate.

use cloud_ports::PortError;

/// Errors that abort a gate invocation.
///
/// An evaluated `Failed` decision is never an error. Every variant here means
/// the gate could not finish, which the orchestrator must read as
/// "validation inconclusive".
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("malformed hook event: {0}")]
    MalformedEvent(String),

    #[error("capability call failed: {0}")]
    Port(#[from] PortError),
}

impl GateError {
    /// Name of the capability that failed, when the error came from one.
    pub fn capability(&self) -> Option<&'static str> {
        match self {
            GateError::Port(err) => Some(err.capability()),
            _ => None,
        }
    }
}

/// Result type for gate operations.
pub type Result<T> = std::result::Result<T, GateError>;
