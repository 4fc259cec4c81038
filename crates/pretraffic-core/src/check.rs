//! Fitness check definitions.
//!
//! A check is a named, weighted evaluator sharing one contract: it reads the
//! per-invocation [`GateContext`] and returns a [`CheckOutcome`] (score delta
//! plus an optional forced failure). New kinds of check plug into the
//! aggregator's list without touching control flow.

use async_trait::async_trait;
use cloud_ports::StackResource;

use crate::compliance::check_compliance;
use crate::context::GateContext;
use crate::domain::{CheckOutcome, Result};
use crate::invocation::test_function;

/// One entry in the gate's battery of checks.
#[async_trait]
pub trait FitnessCheck: Send + Sync {
    /// Stable name used in logs and the report's check log.
    fn name(&self) -> &str;

    /// Points per unit the check measures.
    fn weight(&self) -> u64;

    /// Run the check.
    ///
    /// Scoring-level problems go into the returned outcome. Errors are for
    /// capability failures, which abort the gate.
    async fn evaluate(&self, ctx: &GateContext<'_>) -> Result<CheckOutcome>;
}

/// Smoke-test invocation of the function under deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationCheck {
    name: String,
    function_name: String,
    weight: u64,
}

impl InvocationCheck {
    pub fn new(function_name: impl Into<String>, weight: u64) -> Self {
        let function_name = function_name.into();
        Self {
            name: format!("invoke:{}", function_name),
            function_name,
            weight,
        }
    }
}

#[async_trait]
impl FitnessCheck for InvocationCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn weight(&self) -> u64 {
        self.weight
    }

    async fn evaluate(&self, ctx: &GateContext<'_>) -> Result<CheckOutcome> {
        Ok(test_function(ctx.ports.invoker.as_ref(), &self.function_name, self.weight).await?)
    }
}

/// Count of compliant policy rules for one stack resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceCheck {
    name: String,
    resource: StackResource,
    weight: u64,
}

impl ComplianceCheck {
    pub fn new(resource: StackResource, weight: u64) -> Self {
        Self {
            name: format!(
                "compliance:{}:{}",
                resource.resource_type, resource.resource_id
            ),
            resource,
            weight,
        }
    }

    pub fn resource(&self) -> &StackResource {
        &self.resource
    }
}

#[async_trait]
impl FitnessCheck for ComplianceCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn weight(&self) -> u64 {
        self.weight
    }

    async fn evaluate(&self, ctx: &GateContext<'_>) -> Result<CheckOutcome> {
        Ok(check_compliance(ctx.ports.compliance.as_ref(), &self.resource, self.weight).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_names_identify_their_target() {
        let invoke = InvocationCheck::new("orders-fn:7", 1);
        assert_eq!(invoke.name(), "invoke:orders-fn:7");
        assert_eq!(invoke.weight(), 1);

        let compliance =
            ComplianceCheck::new(StackResource::new("AWS::Lambda::Function", "orders-fn"), 10);
        assert_eq!(compliance.name(), "compliance:AWS::Lambda::Function:orders-fn");
        assert_eq!(compliance.resource().resource_id, "orders-fn");
    }
}
