//! Request and response bodies of the gateway's JSON contract.
//!
//! Field names follow the cloud provider's API (PascalCase), except the
//! lifecycle hook status call, whose provider API is camelCase.

use chrono::{DateTime, Utc};
use cloud_ports::{
    ComplianceQuery, ComplianceType, Condition, EvaluationResult, GateDecision, HookStatus,
    InvocationResponse, ItemQuery, MetricDatum, Page, StackResource,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One gateway operation, addressed as `{service}/{name}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListStackResources,
    Invoke,
    GetComplianceDetails,
    PutHookStatus,
    PutMetricData,
    Query,
}

impl Operation {
    pub fn service(&self) -> &'static str {
        match self {
            Operation::ListStackResources => "cloudformation",
            Operation::Invoke => "lambda",
            Operation::GetComplianceDetails => "config",
            Operation::PutHookStatus => "codedeploy",
            Operation::PutMetricData => "cloudwatch",
            Operation::Query => "dynamodb",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::ListStackResources => "list-stack-resources",
            Operation::Invoke => "invoke",
            Operation::GetComplianceDetails => "get-compliance-details-by-resource",
            Operation::PutHookStatus => "put-lifecycle-event-hook-execution-status",
            Operation::PutMetricData => "put-metric-data",
            Operation::Query => "query",
        }
    }

    /// `service/name`, used in errors and logs.
    pub fn path(&self) -> &'static str {
        match self {
            Operation::ListStackResources => "cloudformation/list-stack-resources",
            Operation::Invoke => "lambda/invoke",
            Operation::GetComplianceDetails => "config/get-compliance-details-by-resource",
            Operation::PutHookStatus => "codedeploy/put-lifecycle-event-hook-execution-status",
            Operation::PutMetricData => "cloudwatch/put-metric-data",
            Operation::Query => "dynamodb/query",
        }
    }
}

fn non_empty(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}

// ---------------------------------------------------------------------------
// cloudformation/list-stack-resources
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListStackResourcesRequest<'a> {
    pub stack_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackResourceSummary {
    pub resource_type: String,
    pub physical_resource_id: String,
    #[serde(default)]
    pub logical_resource_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListStackResourcesResponse {
    #[serde(default)]
    pub stack_resource_summaries: Vec<StackResourceSummary>,
    #[serde(default)]
    pub next_token: Option<String>,
}

impl From<ListStackResourcesResponse> for Page<StackResource> {
    fn from(response: ListStackResourcesResponse) -> Self {
        let items = response
            .stack_resource_summaries
            .into_iter()
            .map(|s| StackResource {
                resource_type: s.resource_type,
                resource_id: s.physical_resource_id,
                logical_id: s.logical_resource_id,
            })
            .collect();
        Page {
            items,
            next_token: non_empty(response.next_token),
        }
    }
}

// ---------------------------------------------------------------------------
// lambda/invoke
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvokeRequest<'a> {
    pub function_name: &'a str,
    pub payload: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvokeResponse {
    pub status_code: u16,
    #[serde(default)]
    pub payload: Option<String>,
}

impl From<InvokeResponse> for InvocationResponse {
    fn from(response: InvokeResponse) -> Self {
        InvocationResponse::new(response.status_code, response.payload)
    }
}

// ---------------------------------------------------------------------------
// config/get-compliance-details-by-resource
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComplianceDetailsRequest<'a> {
    pub resource_type: &'a str,
    pub resource_id: &'a str,
    pub compliance_types: &'a [ComplianceType],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<&'a str>,
}

impl<'a> ComplianceDetailsRequest<'a> {
    pub fn new(query: &'a ComplianceQuery, next_token: Option<&'a str>) -> Self {
        Self {
            resource_type: &query.resource_type,
            resource_id: &query.resource_id,
            compliance_types: &query.compliance_types,
            next_token,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireEvaluationResult {
    pub config_rule_name: String,
    pub compliance_type: ComplianceType,
    #[serde(default)]
    pub result_recorded_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComplianceDetailsResponse {
    #[serde(default)]
    pub evaluation_results: Vec<WireEvaluationResult>,
    #[serde(default)]
    pub next_token: Option<String>,
}

impl From<ComplianceDetailsResponse> for Page<EvaluationResult> {
    fn from(response: ComplianceDetailsResponse) -> Self {
        let items = response
            .evaluation_results
            .into_iter()
            .map(|r| EvaluationResult {
                rule_name: r.config_rule_name,
                compliance_type: r.compliance_type,
                recorded_at: r.result_recorded_time,
            })
            .collect();
        Page {
            items,
            next_token: non_empty(response.next_token),
        }
    }
}

// ---------------------------------------------------------------------------
// codedeploy/put-lifecycle-event-hook-execution-status
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PutHookStatusRequest<'a> {
    pub deployment_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_event_hook_execution_id: Option<&'a str>,
    pub status: HookStatus,
}

impl<'a> From<&'a GateDecision> for PutHookStatusRequest<'a> {
    fn from(decision: &'a GateDecision) -> Self {
        Self {
            deployment_id: &decision.deployment_id,
            lifecycle_event_hook_execution_id: decision.hook_execution_id.as_deref(),
            status: decision.status,
        }
    }
}

// ---------------------------------------------------------------------------
// cloudwatch/put-metric-data
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDataEntry<'a> {
    pub metric_name: &'a str,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutMetricDataRequest<'a> {
    pub namespace: &'a str,
    pub metric_data: Vec<MetricDataEntry<'a>>,
}

impl<'a> From<&'a MetricDatum> for PutMetricDataRequest<'a> {
    fn from(datum: &'a MetricDatum) -> Self {
        Self {
            namespace: &datum.namespace,
            metric_data: vec![MetricDataEntry {
                metric_name: &datum.metric_name,
                timestamp: datum.timestamp,
                value: datum.value,
            }],
        }
    }
}

// ---------------------------------------------------------------------------
// dynamodb/query
// ---------------------------------------------------------------------------

fn condition_map(condition: &Condition) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(condition.attribute.clone(), condition.value.clone());
    map
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryRequest<'a> {
    pub table_name: &'a str,
    pub key: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub projection: &'a [String],
}

impl<'a> From<&'a ItemQuery> for QueryRequest<'a> {
    fn from(query: &'a ItemQuery) -> Self {
        Self {
            table_name: &query.table,
            key: condition_map(&query.key),
            filter: query.filter.as_ref().map(condition_map),
            projection: &query.projection,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub items: Vec<Value>,
}
