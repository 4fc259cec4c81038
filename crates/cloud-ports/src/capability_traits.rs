//! Capability trait definitions for the pre-traffic gate
//!
//! These traits abstract every external system the gate and the data
//! handlers talk to:
//! - `StackResources`: paged listing of the resources in a deployed stack
//! - `FunctionInvoker`: synchronous invocation of a deployed function
//! - `ComplianceEvaluations`: paged policy-compliance results per resource
//! - `LifecycleHookReporter`: the orchestrator's lifecycle-hook status API
//! - `MetricSink`: the monitoring service's metric datapoint API
//! - `ItemStore`: key/filter queries against a table
//!
//! All traits are async and backend-agnostic. In-memory fakes are provided
//! for testing via the `fakes` module.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PortError;

/// Result type for capability calls
pub type PortResult<T> = std::result::Result<T, PortError>;

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

/// One page of a listing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page, in provider order
    pub items: Vec<T>,
    /// Continuation token for the next page, `None` on the last page
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// A terminal page (no continuation).
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }

    /// A page followed by another one.
    pub fn with_next(items: Vec<T>, next_token: impl Into<String>) -> Self {
        Self {
            items,
            next_token: Some(next_token.into()),
        }
    }

    /// Continuation token to pass to the next call, if any.
    ///
    /// An empty token is treated the same as a missing one.
    pub fn continuation(&self) -> Option<&str> {
        self.next_token.as_deref().filter(|t| !t.is_empty())
    }
}

// ---------------------------------------------------------------------------
// StackResources
// ---------------------------------------------------------------------------

/// One deployed unit belonging to a stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackResource {
    /// Provider resource type (e.g. "AWS::Lambda::Function")
    pub resource_type: String,
    /// Physical resource id, the key used by compliance queries
    pub resource_id: String,
    /// Logical id inside the stack template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_id: Option<String>,
}

impl StackResource {
    pub fn new(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            logical_id: None,
        }
    }
}

/// Paged listing of stack resources.
#[async_trait]
pub trait StackResources: Send + Sync {
    /// Fetch one page of resources for `stack_id`, starting at `next_token`.
    async fn list_stack_resources(
        &self,
        stack_id: &str,
        next_token: Option<&str>,
    ) -> PortResult<Page<StackResource>>;
}

// ---------------------------------------------------------------------------
// FunctionInvoker
// ---------------------------------------------------------------------------

/// Raw response of a synchronous function invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    /// Status code reported by the invoke API
    pub status_code: u16,
    /// Response payload as returned by the function (usually JSON)
    #[serde(default)]
    pub payload: Option<String>,
}

impl InvocationResponse {
    pub fn new(status_code: u16, payload: Option<String>) -> Self {
        Self {
            status_code,
            payload,
        }
    }

    /// Whether `status_code` lies in [200, 300).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Invokes a deployed function and waits for its response.
#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    /// Invoke `function` with a raw `payload`.
    ///
    /// A non-2xx `status_code` is a normal response, not an error. Errors are
    /// reserved for the invoke call itself being rejected.
    async fn invoke(&self, function: &str, payload: &str) -> PortResult<InvocationResponse>;
}

// ---------------------------------------------------------------------------
// ComplianceEvaluations
// ---------------------------------------------------------------------------

/// Compliance state of one rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceType {
    Compliant,
    NonCompliant,
    NotApplicable,
    InsufficientData,
}

impl ComplianceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceType::Compliant => "COMPLIANT",
            ComplianceType::NonCompliant => "NON_COMPLIANT",
            ComplianceType::NotApplicable => "NOT_APPLICABLE",
            ComplianceType::InsufficientData => "INSUFFICIENT_DATA",
        }
    }
}

/// A single policy-rule evaluation for a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// Name of the evaluated rule
    pub rule_name: String,
    /// Outcome of the evaluation
    pub compliance_type: ComplianceType,
    /// When the provider recorded the result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl EvaluationResult {
    pub fn new(rule_name: impl Into<String>, compliance_type: ComplianceType) -> Self {
        Self {
            rule_name: rule_name.into(),
            compliance_type,
            recorded_at: None,
        }
    }
}

/// Parameters of a compliance-details query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceQuery {
    pub resource_type: String,
    pub resource_id: String,
    /// Only results of these types are returned; empty means all types
    pub compliance_types: Vec<ComplianceType>,
}

impl ComplianceQuery {
    /// Query restricted to `COMPLIANT` results.
    pub fn compliant_only(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            compliance_types: vec![ComplianceType::Compliant],
        }
    }

    /// Whether a result of type `kind` passes this query's filter.
    pub fn accepts(&self, kind: ComplianceType) -> bool {
        self.compliance_types.is_empty() || self.compliance_types.contains(&kind)
    }
}

/// Paged compliance results for one resource.
#[async_trait]
pub trait ComplianceEvaluations: Send + Sync {
    /// Fetch one page of evaluation results matching `query`.
    async fn compliance_details(
        &self,
        query: &ComplianceQuery,
        next_token: Option<&str>,
    ) -> PortResult<Page<EvaluationResult>>;
}

// ---------------------------------------------------------------------------
// LifecycleHookReporter
// ---------------------------------------------------------------------------

/// Status reported back to the deployment orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookStatus {
    Succeeded,
    Failed,
}

impl HookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookStatus::Succeeded => "Succeeded",
            HookStatus::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for HookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pass/fail decision for one lifecycle hook execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateDecision {
    pub deployment_id: String,
    pub hook_execution_id: Option<String>,
    pub status: HookStatus,
}

/// The orchestrator's lifecycle-hook status interface.
#[async_trait]
pub trait LifecycleHookReporter: Send + Sync {
    /// Record `decision` against its deployment.
    async fn put_hook_status(&self, decision: &GateDecision) -> PortResult<()>;
}

// ---------------------------------------------------------------------------
// MetricSink
// ---------------------------------------------------------------------------

/// A single timestamped metric datapoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDatum {
    pub namespace: String,
    pub metric_name: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// The monitoring service's datapoint interface.
#[async_trait]
pub trait MetricSink: Send + Sync {
    async fn put_metric(&self, datum: &MetricDatum) -> PortResult<()>;
}

// ---------------------------------------------------------------------------
// ItemStore
// ---------------------------------------------------------------------------

/// Equality condition on one attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub attribute: String,
    pub value: serde_json::Value,
}

impl Condition {
    pub fn eq(attribute: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Whether `item` carries `attribute` with exactly `value`.
    pub fn matches(&self, item: &serde_json::Value) -> bool {
        item.get(&self.attribute) == Some(&self.value)
    }
}

/// A key query with optional filter and projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemQuery {
    pub table: String,
    pub key: Condition,
    pub filter: Option<Condition>,
    /// Attributes to return; empty returns whole items
    pub projection: Vec<String>,
}

impl ItemQuery {
    pub fn new(table: impl Into<String>, key: Condition) -> Self {
        Self {
            table: table.into(),
            key,
            filter: None,
            projection: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: Condition) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_projection<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = attributes.into_iter().map(Into::into).collect();
        self
    }
}

/// Table queries used by the data-access handlers.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Return every item matching `query`, in store order.
    async fn query(&self, query: &ItemQuery) -> PortResult<Vec<serde_json::Value>>;
}
