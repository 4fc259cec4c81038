//! Process-wide gate configuration.
//!
//! Read once at start-up and never mutated; every invocation borrows it.

use serde::{Deserialize, Serialize};

/// Points per invocation-test point.
pub const DEFAULT_INVOCATION_WEIGHT: u64 = 1;

/// Points per compliant rule evaluation.
pub const DEFAULT_COMPLIANCE_WEIGHT: u64 = 10;

/// Configuration for the pre-traffic gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Stack whose resources are subject to compliance checks
    pub stack_id: String,
    /// Function version under deployment (invoked by the smoke test)
    pub function_name: String,
    /// Metric namespace for the fitness datapoint
    pub namespace: String,
    /// Metric name for the fitness datapoint
    pub metric_name: String,
    /// Run one compliance check per stack resource in addition to the
    /// invocation test
    pub compliance_checks: bool,
    pub invocation_weight: u64,
    pub compliance_weight: u64,
}

impl GateConfig {
    /// Minimal configuration: invocation test only, default weights.
    pub fn new(
        stack_id: impl Into<String>,
        function_name: impl Into<String>,
        namespace: impl Into<String>,
        metric_name: impl Into<String>,
    ) -> Self {
        Self {
            stack_id: stack_id.into(),
            function_name: function_name.into(),
            namespace: namespace.into(),
            metric_name: metric_name.into(),
            compliance_checks: false,
            invocation_weight: DEFAULT_INVOCATION_WEIGHT,
            compliance_weight: DEFAULT_COMPLIANCE_WEIGHT,
        }
    }

    /// Enable or disable the per-resource compliance checks
    pub fn with_compliance_checks(mut self, enabled: bool) -> Self {
        self.compliance_checks = enabled;
        self
    }

    /// Override check weights
    pub fn with_weights(mut self, invocation_weight: u64, compliance_weight: u64) -> Self {
        self.invocation_weight = invocation_weight;
        self.compliance_weight = compliance_weight;
        self
    }
}
