//! Lifecycle hook event classification.
//!
//! The raw event is classified once, at the boundary, into a [`HookEvent`]
//! before any gate logic runs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{GateError, Result};

/// Raw event value used by operational self-check invocations.
pub const SENTINEL_EVENT: &str = "test";

/// Reply returned for the sentinel event.
pub const SENTINEL_ACK: &str = "ok";

/// Identifiers of one orchestrator-driven hook execution.
///
/// Both fields are optional: an event without `DeploymentId` is a manual
/// invocation, which still runs the checks and emits the metric but never
/// reports a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentEvent {
    #[serde(rename = "DeploymentId", default)]
    pub deployment_id: Option<String>,

    #[serde(rename = "LifecycleEventHookExecutionId", default)]
    pub hook_execution_id: Option<String>,
}

impl DeploymentEvent {
    pub fn new(deployment_id: Option<String>, hook_execution_id: Option<String>) -> Self {
        Self {
            deployment_id,
            hook_execution_id,
        }
    }

    /// Whether the orchestrator is waiting for a decision on this event.
    pub fn expects_decision(&self) -> bool {
        self.deployment_id.is_some()
    }
}

/// A classified hook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    /// Operational self-check; no external calls are made.
    Sentinel,
    /// A real validation request.
    Deployment(DeploymentEvent),
}

impl HookEvent {
    /// Classify a raw event.
    ///
    /// The string `"test"` is the sentinel, any JSON object is a deployment
    /// event (unknown fields ignored). Anything else is rejected.
    pub fn parse(raw: &Value) -> Result<Self> {
        match raw {
            Value::String(s) if s == SENTINEL_EVENT => Ok(HookEvent::Sentinel),
            Value::Object(_) => serde_json::from_value(raw.clone())
                .map(HookEvent::Deployment)
                .map_err(|e| GateError::MalformedEvent(e.to_string())),
            other => Err(GateError::MalformedEvent(format!(
                "expected \"{}\" or an object, got {}",
                SENTINEL_EVENT,
                kind_of(other)
            ))),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "another string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sentinel_string_is_classified() {
        assert_eq!(HookEvent::parse(&json!("test")).unwrap(), HookEvent::Sentinel);
    }

    #[test]
    fn test_full_deployment_event() {
        let raw = json!({
            "DeploymentId": "d-ABC123",
            "LifecycleEventHookExecutionId": "hook-1",
        });
        let event = HookEvent::parse(&raw).unwrap();
        assert_eq!(
            event,
            HookEvent::Deployment(DeploymentEvent::new(
                Some("d-ABC123".to_string()),
                Some("hook-1".to_string())
            ))
        );
    }

    #[test]
    fn test_empty_object_is_manual_invocation() {
        let event = HookEvent::parse(&json!({ "source": "console" })).unwrap();
        match event {
            HookEvent::Deployment(d) => assert!(!d.expects_decision()),
            HookEvent::Sentinel => panic!("object must not be the sentinel"),
        }
    }

    #[test]
    fn test_other_values_are_malformed() {
        for raw in [json!("TEST"), json!(null), json!(42), json!(["test"])] {
            let err = HookEvent::parse(&raw).unwrap_err();
            assert!(matches!(err, GateError::MalformedEvent(_)), "{raw}");
        }
    }

    #[test]
    fn test_wrongly_typed_id_is_malformed() {
        let err = HookEvent::parse(&json!({ "DeploymentId": 7 })).unwrap_err();
        assert!(matches!(err, GateError::MalformedEvent(_)));
    }
}
