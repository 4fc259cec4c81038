//! Structured observability hooks for the gate lifecycle.
//!
//! Every emission carries an `event` field so log pipelines can filter on
//! the lifecycle step without parsing messages. All gate steps of one
//! invocation run inside [`gate_span`], which tags them with the
//! invocation id.
//!
//! Verbosity follows `RUST_LOG`; see [`crate::telemetry::init_tracing`].

use cloud_ports::HookStatus;
use tracing::{info, Span};
use uuid::Uuid;

/// Span tagging everything a single gate invocation logs.
///
/// The span is not entered here. Attach it to the invocation's future with
/// [`tracing::Instrument::instrument`] so it follows the task across awaits.
///
/// ```ignore
/// use tracing::Instrument;
/// controller.evaluate(event).instrument(gate_span(&id)).await
/// ```
pub fn gate_span(invocation_id: &Uuid) -> Span {
    tracing::info_span!("pretraffic.gate", invocation_id = %invocation_id)
}

/// Emit event: a deployment event was accepted and checks are starting.
pub fn emit_gate_started(
    invocation_id: &Uuid,
    deployment_id: Option<&str>,
    function_name: &str,
) {
    info!(
        event = "gate.started",
        invocation_id = %invocation_id,
        deployment_id = deployment_id.unwrap_or("-"),
        function_name = %function_name,
    );
}

/// Emit event: the liveness sentinel was answered without doing any work.
pub fn emit_sentinel_acknowledged() {
    info!(event = "gate.sentinel_acknowledged");
}

pub fn emit_check_evaluated(check: &str, score_delta: u64, forced_failure: bool) {
    info!(
        event = "check.evaluated",
        check = %check,
        score_delta = score_delta,
        forced_failure = forced_failure,
    );
}

/// Emit event: all checks ran and the score is final.
pub fn emit_fitness_computed(score: u64, status: HookStatus) {
    info!(event = "fitness.computed", score = score, status = %status);
}

pub fn emit_decision_reported(deployment_id: &str, status: HookStatus) {
    info!(
        event = "decision.reported",
        deployment_id = %deployment_id,
        status = %status,
    );
}

/// Emit event: no deployment id on the event, so no decision was sent.
pub fn emit_decision_skipped() {
    info!(event = "decision.skipped", "no deployment id; decision not reported");
}

pub fn emit_metric_emitted(namespace: &str, metric_name: &str, value: f64) {
    info!(
        event = "metric.emitted",
        namespace = %namespace,
        metric_name = %metric_name,
        value = value,
    );
}

/// Emit event: the invocation failed (error level).
///
/// `capability` names the external call that failed, when there was one.
pub fn emit_gate_failed(capability: Option<&str>, error: &dyn std::fmt::Display) {
    tracing::error!(
        event = "gate.failed",
        capability = capability.unwrap_or("none"),
        error = %error,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_span_create() {
        let span = gate_span(&Uuid::new_v4());
        let _entered = span.entered();
        emit_decision_skipped();
    }
}
