//! Per-invocation gate context and the capability handles it borrows.

use std::sync::Arc;

use cloud_ports::{
    ComplianceEvaluations, FunctionInvoker, LifecycleHookReporter, MetricSink, StackResources,
};
use uuid::Uuid;

use crate::config::GateConfig;
use crate::domain::DeploymentEvent;

/// Handles to every external system the gate calls.
#[derive(Clone)]
pub struct GatePorts {
    pub resources: Arc<dyn StackResources>,
    pub invoker: Arc<dyn FunctionInvoker>,
    pub compliance: Arc<dyn ComplianceEvaluations>,
    pub hooks: Arc<dyn LifecycleHookReporter>,
    pub metrics: Arc<dyn MetricSink>,
}

impl GatePorts {
    pub fn new(
        resources: Arc<dyn StackResources>,
        invoker: Arc<dyn FunctionInvoker>,
        compliance: Arc<dyn ComplianceEvaluations>,
        hooks: Arc<dyn LifecycleHookReporter>,
        metrics: Arc<dyn MetricSink>,
    ) -> Self {
        Self {
            resources,
            invoker,
            compliance,
            hooks,
            metrics,
        }
    }

    /// Use one backend for every capability.
    pub fn shared<B>(backend: Arc<B>) -> Self
    where
        B: StackResources
            + FunctionInvoker
            + ComplianceEvaluations
            + LifecycleHookReporter
            + MetricSink
            + 'static,
    {
        Self {
            resources: backend.clone(),
            invoker: backend.clone(),
            compliance: backend.clone(),
            hooks: backend.clone(),
            metrics: backend,
        }
    }
}

/// Everything one gate invocation needs, created fresh per invocation.
///
/// Nothing in here is shared mutable state: configuration and ports are
/// borrowed read-only, and the mutable fitness status lives in the
/// [`FitnessReport`](crate::domain::FitnessReport) owned by the aggregator run.
pub struct GateContext<'a> {
    /// Correlates every log line of the invocation
    pub invocation_id: Uuid,
    pub config: &'a GateConfig,
    pub ports: &'a GatePorts,
    pub event: &'a DeploymentEvent,
}

impl<'a> GateContext<'a> {
    pub fn new(config: &'a GateConfig, ports: &'a GatePorts, event: &'a DeploymentEvent) -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            config,
            ports,
            event,
        }
    }
}
