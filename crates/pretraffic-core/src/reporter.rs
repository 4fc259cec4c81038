//! Reporting of the gate decision and the fitness metric.

use chrono::{DateTime, Utc};
use cloud_ports::{GateDecision, MetricDatum};
use serde::Serialize;

use crate::context::GateContext;
use crate::domain::{FitnessReport, Result};
use crate::obs;

/// What the reporter actually sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOutcome {
    /// The decision sent to the orchestrator, if the event asked for one
    pub decision: Option<GateDecision>,
    /// The fitness datapoint sent to the monitoring service
    pub metric: MetricDatum,
}

/// Sends the gate's two external reports.
pub struct GateReporter;

impl GateReporter {
    /// Report `report` with the current time as the metric timestamp.
    pub async fn report(ctx: &GateContext<'_>, report: &FitnessReport) -> Result<ReportOutcome> {
        Self::report_at(ctx, report, Utc::now()).await
    }

    /// Report `report`, stamping the metric with `timestamp`.
    ///
    /// 1. When the event carries a deployment id, the decision is sent to
    ///    the orchestrator; otherwise that step is skipped.
    /// 2. The fitness score is always emitted as a metric.
    ///
    /// Neither failure is handled here. A rejected decision report means the
    /// metric is not emitted; a rejected metric after an accepted decision
    /// still fails the call.
    pub async fn report_at(
        ctx: &GateContext<'_>,
        report: &FitnessReport,
        timestamp: DateTime<Utc>,
    ) -> Result<ReportOutcome> {
        let decision = match &ctx.event.deployment_id {
            Some(deployment_id) => {
                let decision = GateDecision {
                    deployment_id: deployment_id.clone(),
                    hook_execution_id: ctx.event.hook_execution_id.clone(),
                    status: report.status(),
                };
                ctx.ports.hooks.put_hook_status(&decision).await?;
                obs::emit_decision_reported(&decision.deployment_id, decision.status);
                Some(decision)
            }
            None => {
                obs::emit_decision_skipped();
                None
            }
        };

        let metric = MetricDatum {
            namespace: ctx.config.namespace.clone(),
            metric_name: ctx.config.metric_name.clone(),
            value: report.score() as f64,
            timestamp,
        };
        ctx.ports.metrics.put_metric(&metric).await?;
        obs::emit_metric_emitted(&metric.namespace, &metric.metric_name, metric.value);

        Ok(ReportOutcome { decision, metric })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GateConfig;
    use crate::context::GatePorts;
    use crate::domain::{CheckOutcome, DeploymentEvent, GateError};
    use cloud_ports::fakes::{
        MemoryComplianceEvaluations, MemoryStackResources, RecordingHookReporter,
        RecordingMetricSink, ScriptedInvoker,
    };
    use cloud_ports::{HookStatus, PortError};
    use std::sync::Arc;

    fn ports(hooks: Arc<RecordingHookReporter>, metrics: Arc<RecordingMetricSink>) -> GatePorts {
        GatePorts::new(
            Arc::new(MemoryStackResources::new()),
            Arc::new(ScriptedInvoker::new()),
            Arc::new(MemoryComplianceEvaluations::new()),
            hooks,
            metrics,
        )
    }

    fn failed_report() -> FitnessReport {
        let mut report = FitnessReport::new();
        report.record("invoke", CheckOutcome::forced_failure());
        report.record("compliance", CheckOutcome::scored(20));
        report
    }

    #[tokio::test]
    async fn test_reports_decision_then_metric() {
        let hooks = Arc::new(RecordingHookReporter::new());
        let metrics = Arc::new(RecordingMetricSink::new());
        let ports = ports(hooks.clone(), metrics.clone());
        let config = GateConfig::new("stack", "fn", "Deployments", "Fitness");
        let event = DeploymentEvent::new(Some("d-1".to_string()), Some("h-1".to_string()));
        let ctx = GateContext::new(&config, &ports, &event);

        let outcome = GateReporter::report(&ctx, &failed_report()).await.unwrap();

        let decisions = hooks.decisions();
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].status, HookStatus::Failed);
        assert_eq!(decisions[0].hook_execution_id.as_deref(), Some("h-1"));
        assert_eq!(outcome.decision, Some(decisions[0].clone()));

        let datums = metrics.datums();
        assert_eq!(datums.len(), 1);
        assert_eq!(datums[0].namespace, "Deployments");
        assert_eq!(datums[0].metric_name, "Fitness");
        assert_eq!(datums[0].value, 20.0);
    }

    #[tokio::test]
    async fn test_missing_deployment_id_skips_decision_only() {
        let hooks = Arc::new(RecordingHookReporter::new());
        let metrics = Arc::new(RecordingMetricSink::new());
        let ports = ports(hooks.clone(), metrics.clone());
        let config = GateConfig::new("stack", "fn", "ns", "m");
        let event = DeploymentEvent::new(None, Some("h-1".to_string()));
        let ctx = GateContext::new(&config, &ports, &event);

        let outcome = GateReporter::report(&ctx, &FitnessReport::new()).await.unwrap();
        assert!(outcome.decision.is_none());
        assert_eq!(hooks.call_count(), 0);
        assert_eq!(metrics.call_count(), 1);
    }

    #[tokio::test]
    async fn test_rejected_decision_skips_metric() {
        let hooks = Arc::new(RecordingHookReporter::new().failing("hook expired"));
        let metrics = Arc::new(RecordingMetricSink::new());
        let ports = ports(hooks.clone(), metrics.clone());
        let config = GateConfig::new("stack", "fn", "ns", "m");
        let event = DeploymentEvent::new(Some("d-1".to_string()), None);
        let ctx = GateContext::new(&config, &ports, &event);

        let err = GateReporter::report(&ctx, &FitnessReport::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::Port(PortError::Reporting { .. })));
        assert_eq!(metrics.call_count(), 0);
    }

    #[tokio::test]
    async fn test_metric_timestamp_is_caller_supplied() {
        let hooks = Arc::new(RecordingHookReporter::new());
        let metrics = Arc::new(RecordingMetricSink::new());
        let ports = ports(hooks, metrics.clone());
        let config = GateConfig::new("stack", "fn", "ns", "m");
        let event = DeploymentEvent::default();
        let ctx = GateContext::new(&config, &ports, &event);
        let ts = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        GateReporter::report_at(&ctx, &FitnessReport::new(), ts)
            .await
            .unwrap();
        assert_eq!(metrics.datums()[0].timestamp, ts);
    }
}
