//! Fitness aggregation over the configured battery of checks.

use crate::check::{ComplianceCheck, FitnessCheck, InvocationCheck};
use crate::context::GateContext;
use crate::domain::{FitnessReport, Result};
use crate::obs;
use crate::resources::list_stack_resources;

/// Ordered list of checks run for one invocation.
///
/// Checks run strictly one after another. A forced failure from one check
/// does not stop later checks; their scores still count.
#[derive(Default)]
pub struct FitnessAggregator {
    checks: Vec<Box<dyn FitnessCheck>>,
}

impl FitnessAggregator {
    pub fn new(checks: Vec<Box<dyn FitnessCheck>>) -> Self {
        Self { checks }
    }

    /// Append a check to the end of the battery.
    pub fn with_check(mut self, check: Box<dyn FitnessCheck>) -> Self {
        self.checks.push(check);
        self
    }

    /// Build the battery the configuration asks for.
    ///
    /// Always starts with the invocation test. With `compliance_checks`
    /// enabled, the stack is listed (all pages) and one compliance check is
    /// added per resource, in listing order.
    pub async fn plan(ctx: &GateContext<'_>) -> Result<Self> {
        let config = ctx.config;
        let mut aggregator = Self::default().with_check(Box::new(InvocationCheck::new(
            config.function_name.clone(),
            config.invocation_weight,
        )));

        if config.compliance_checks {
            let resources =
                list_stack_resources(ctx.ports.resources.as_ref(), &config.stack_id).await?;
            for resource in resources {
                aggregator = aggregator.with_check(Box::new(ComplianceCheck::new(
                    resource,
                    config.compliance_weight,
                )));
            }
        }

        Ok(aggregator)
    }

    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check in order and fold the outcomes into a fresh report.
    ///
    /// The first check error aborts the run; no partial report is returned.
    pub async fn run(&self, ctx: &GateContext<'_>) -> Result<FitnessReport> {
        let mut report = FitnessReport::new();

        for check in &self.checks {
            let outcome = check.evaluate(ctx).await?;
            obs::emit_check_evaluated(check.name(), outcome.score_delta, outcome.forced_failure);
            report.record(check.name(), outcome);
        }

        obs::emit_fitness_computed(report.score(), report.status());
        Ok(report)
    }
}
