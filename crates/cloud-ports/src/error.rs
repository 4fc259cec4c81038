//! Error types for cloud-ports

use thiserror::Error;

/// Errors raised by a capability call.
///
/// Every variant names the external system that rejected the call. Callers in
/// the gate never catch these locally; they abort the whole invocation.
#[derive(Error, Debug)]
pub enum PortError {
    /// Listing the resources of a stack failed
    #[error("list stack resources failed for stack {stack}: {reason}")]
    ListResources { stack: String, reason: String },

    /// The invoke call itself was rejected (not a non-2xx function response)
    #[error("invoke failed for function {function}: {reason}")]
    Invoke { function: String, reason: String },

    /// Compliance evaluation query failed
    #[error("compliance query failed for {resource_type} {resource_id}: {reason}")]
    ComplianceQuery {
        resource_type: String,
        resource_id: String,
        reason: String,
    },

    /// Lifecycle hook status report was rejected by the orchestrator
    #[error("lifecycle hook report failed for deployment {deployment_id}: {reason}")]
    Reporting {
        deployment_id: String,
        reason: String,
    },

    /// Metric datapoint was rejected by the monitoring service
    #[error("metric emission failed for {namespace}/{metric_name}: {reason}")]
    MetricEmission {
        namespace: String,
        metric_name: String,
        reason: String,
    },

    /// Item query against a table failed
    #[error("item query failed on table {table}: {reason}")]
    ItemQuery { table: String, reason: String },

    /// Transport-level failure not tied to one operation
    #[error("transport error: {0}")]
    Transport(String),

    /// Serialization error
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PortError {
    /// Short, stable name of the failing capability, used as a log field.
    pub fn capability(&self) -> &'static str {
        match self {
            PortError::ListResources { .. } => "list_stack_resources",
            PortError::Invoke { .. } => "invoke",
            PortError::ComplianceQuery { .. } => "compliance_details",
            PortError::Reporting { .. } => "put_hook_status",
            PortError::MetricEmission { .. } => "put_metric",
            PortError::ItemQuery { .. } => "query_items",
            PortError::Transport(_) => "transport",
            PortError::Serialization(_) => "serialization",
        }
    }
}
