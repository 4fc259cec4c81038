//! Gate controller: the entry point for one lifecycle hook event.
//!
//! ```text
//! raw event ─► classify ─┬─ "test" ─────────────────────────► "ok"
//!                        └─ deployment ─► plan ─► run checks ─► report ─► outcome
//! ```
//!
//! Invocations share nothing mutable. Each one gets its own
//! [`GateContext`] and [`FitnessReport`], so concurrent events never see
//! each other's status or score.

use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::aggregator::FitnessAggregator;
use crate::config::GateConfig;
use crate::context::{GateContext, GatePorts};
use crate::domain::{DeploymentEvent, FitnessReport, HookEvent, Result, SENTINEL_ACK};
use crate::obs;
use crate::reporter::{GateReporter, ReportOutcome};

/// Result of a fully evaluated deployment event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateOutcome {
    pub invocation_id: Uuid,
    pub report: FitnessReport,
    #[serde(flatten)]
    pub reported: ReportOutcome,
}

impl GateOutcome {
    /// Whether a decision reached the orchestrator.
    pub fn decision_reported(&self) -> bool {
        self.reported.decision.is_some()
    }
}

/// What the gate answers to its caller.
#[derive(Debug, Clone, PartialEq)]
pub enum HookResponse {
    /// Reply to the liveness sentinel
    Acknowledged,
    Evaluated(GateOutcome),
}

impl HookResponse {
    /// Answer `raw` when it is the liveness sentinel.
    ///
    /// Needs no configuration or ports, so callers can reply before
    /// building either.
    pub fn for_sentinel(raw: &Value) -> Option<Self> {
        match HookEvent::parse(raw) {
            Ok(HookEvent::Sentinel) => {
                obs::emit_sentinel_acknowledged();
                Some(HookResponse::Acknowledged)
            }
            _ => None,
        }
    }

    /// `"ok"` for the sentinel, the outcome document otherwise.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        match self {
            HookResponse::Acknowledged => Ok(Value::String(SENTINEL_ACK.to_string())),
            HookResponse::Evaluated(outcome) => serde_json::to_value(outcome),
        }
    }
}

/// Runs the pre-traffic gate against a fixed configuration and set of ports.
#[derive(Clone)]
pub struct GateController {
    config: GateConfig,
    ports: GatePorts,
}

impl GateController {
    pub fn new(config: GateConfig, ports: GatePorts) -> Self {
        Self { config, ports }
    }

    /// Handle one raw hook event.
    ///
    /// The sentinel is answered without any external call. Everything else
    /// must be a deployment event object; errors are logged here and then
    /// returned so the caller can surface the invocation as failed.
    pub async fn handle(&self, raw: &Value) -> Result<HookResponse> {
        let event = match HookEvent::parse(raw) {
            Ok(HookEvent::Sentinel) => {
                obs::emit_sentinel_acknowledged();
                return Ok(HookResponse::Acknowledged);
            }
            Ok(HookEvent::Deployment(event)) => event,
            Err(err) => {
                obs::emit_gate_failed(err.capability(), &err);
                return Err(err);
            }
        };

        self.evaluate(&event).await.map(HookResponse::Evaluated)
    }

    /// Evaluate a classified deployment event.
    pub async fn evaluate(&self, event: &DeploymentEvent) -> Result<GateOutcome> {
        let ctx = GateContext::new(&self.config, &self.ports, event);
        let span = obs::gate_span(&ctx.invocation_id);

        let result = Self::run(&ctx).instrument(span.clone()).await;
        if let Err(err) = &result {
            let _entered = span.enter();
            obs::emit_gate_failed(err.capability(), err);
        }
        result
    }

    async fn run(ctx: &GateContext<'_>) -> Result<GateOutcome> {
        obs::emit_gate_started(
            &ctx.invocation_id,
            ctx.event.deployment_id.as_deref(),
            &ctx.config.function_name,
        );

        let aggregator = FitnessAggregator::plan(ctx).await?;
        let report = aggregator.run(ctx).await?;
        let reported = GateReporter::report(ctx, &report).await?;

        Ok(GateOutcome {
            invocation_id: ctx.invocation_id,
            report,
            reported,
        })
    }
}
