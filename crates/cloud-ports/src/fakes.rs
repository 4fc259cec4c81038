//! In-memory fakes for capability traits (testing only)
//!
//! Provides `MemoryStackResources`, `ScriptedInvoker`,
//! `MemoryComplianceEvaluations`, `RecordingHookReporter`,
//! `RecordingMetricSink` and `MemoryItemStore`. Each fake records every call
//! it receives so tests can assert on call counts and arguments, and each can
//! be told to reject calls.
//!
//! Paged fakes hand out continuation tokens of the form `<key>#<page>` and
//! reject tokens they did not issue.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::capability_traits::*;
use crate::error::PortError;

// ---------------------------------------------------------------------------
// Paging helpers
// ---------------------------------------------------------------------------

/// One recorded call to a paged fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCall {
    /// Stack id, or `<resource_type>/<resource_id>` for compliance queries
    pub key: String,
    pub next_token: Option<String>,
}

fn page_token(key: &str, index: usize) -> String {
    format!("{}#{}", key, index)
}

fn page_index(key: &str, token: Option<&str>) -> Option<usize> {
    match token {
        None => Some(0),
        Some(t) => t.strip_prefix(key)?.strip_prefix('#')?.parse().ok(),
    }
}

fn serve_page<T: Clone>(
    pages: &[Vec<T>],
    key: &str,
    token: Option<&str>,
) -> std::result::Result<Page<T>, String> {
    let index = page_index(key, token)
        .ok_or_else(|| format!("continuation token {:?} was not issued for {}", token, key))?;
    if pages.is_empty() && index == 0 {
        return Ok(Page::last(Vec::new()));
    }
    let items = pages
        .get(index)
        .cloned()
        .ok_or_else(|| format!("page {} out of range for {}", index, key))?;
    if index + 1 < pages.len() {
        Ok(Page::with_next(items, page_token(key, index + 1)))
    } else {
        Ok(Page::last(items))
    }
}

/// Returns the injected failure reason if call number `call_index` should fail.
fn planned_failure(plan: &Option<(usize, String)>, call_index: usize) -> Option<String> {
    match plan {
        Some((at, reason)) if call_index >= *at => Some(reason.clone()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// MemoryStackResources
// ---------------------------------------------------------------------------

/// In-memory stack listing backed by `HashMap<stack_id, pages>`.
#[derive(Debug, Default)]
pub struct MemoryStackResources {
    stacks: Mutex<HashMap<String, Vec<Vec<StackResource>>>>,
    calls: Mutex<Vec<PageCall>>,
    failure: Mutex<Option<(usize, String)>>,
}

impl MemoryStackResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `stack_id` with the given pages of resources.
    pub fn with_pages(mut self, stack_id: &str, pages: Vec<Vec<StackResource>>) -> Self {
        self.stacks
            .get_mut()
            .unwrap()
            .insert(stack_id.to_string(), pages);
        self
    }

    /// Reject every call from the `call_index`-th (zero-based) onwards.
    pub fn fail_on_call(mut self, call_index: usize, reason: &str) -> Self {
        *self.failure.get_mut().unwrap() = Some((call_index, reason.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<PageCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl StackResources for MemoryStackResources {
    async fn list_stack_resources(
        &self,
        stack_id: &str,
        next_token: Option<&str>,
    ) -> PortResult<Page<StackResource>> {
        let call_index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(PageCall {
                key: stack_id.to_string(),
                next_token: next_token.map(str::to_string),
            });
            calls.len() - 1
        };
        if let Some(reason) = planned_failure(&self.failure.lock().unwrap(), call_index) {
            return Err(PortError::ListResources {
                stack: stack_id.to_string(),
                reason,
            });
        }
        let stacks = self.stacks.lock().unwrap();
        let pages = stacks
            .get(stack_id)
            .ok_or_else(|| PortError::ListResources {
                stack: stack_id.to_string(),
                reason: "stack does not exist".to_string(),
            })?;
        serve_page(pages, stack_id, next_token).map_err(|reason| PortError::ListResources {
            stack: stack_id.to_string(),
            reason,
        })
    }
}

// ---------------------------------------------------------------------------
// ScriptedInvoker
// ---------------------------------------------------------------------------

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeCall {
    pub function: String,
    pub payload: String,
}

/// Function invoker returning a canned response per function name.
#[derive(Debug, Default)]
pub struct ScriptedInvoker {
    responses: Mutex<HashMap<String, InvocationResponse>>,
    calls: Mutex<Vec<InvokeCall>>,
    failure: Mutex<Option<String>>,
}

impl ScriptedInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `function` with `response`.
    pub fn with_response(mut self, function: &str, response: InvocationResponse) -> Self {
        self.responses
            .get_mut()
            .unwrap()
            .insert(function.to_string(), response);
        self
    }

    /// Reject every invoke call.
    pub fn failing(mut self, reason: &str) -> Self {
        *self.failure.get_mut().unwrap() = Some(reason.to_string());
        self
    }

    pub fn calls(&self) -> Vec<InvokeCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl FunctionInvoker for ScriptedInvoker {
    async fn invoke(&self, function: &str, payload: &str) -> PortResult<InvocationResponse> {
        self.calls.lock().unwrap().push(InvokeCall {
            function: function.to_string(),
            payload: payload.to_string(),
        });
        if let Some(reason) = self.failure.lock().unwrap().clone() {
            return Err(PortError::Invoke {
                function: function.to_string(),
                reason,
            });
        }
        self.responses
            .lock()
            .unwrap()
            .get(function)
            .cloned()
            .ok_or_else(|| PortError::Invoke {
                function: function.to_string(),
                reason: "function not found".to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// MemoryComplianceEvaluations
// ---------------------------------------------------------------------------

/// In-memory compliance results backed by
/// `HashMap<"<type>/<id>", pages>`.
///
/// The query's compliance-type filter is applied per page, so a page may come
/// back empty while still carrying a continuation token, as real providers do.
#[derive(Debug, Default)]
pub struct MemoryComplianceEvaluations {
    resources: Mutex<HashMap<String, Vec<Vec<EvaluationResult>>>>,
    calls: Mutex<Vec<PageCall>>,
    failure: Mutex<Option<(usize, String)>>,
}

fn resource_key(resource_type: &str, resource_id: &str) -> String {
    format!("{}/{}", resource_type, resource_id)
}

impl MemoryComplianceEvaluations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(
        mut self,
        resource_type: &str,
        resource_id: &str,
        pages: Vec<Vec<EvaluationResult>>,
    ) -> Self {
        self.resources
            .get_mut()
            .unwrap()
            .insert(resource_key(resource_type, resource_id), pages);
        self
    }

    /// Reject every call from the `call_index`-th (zero-based) onwards.
    pub fn fail_on_call(mut self, call_index: usize, reason: &str) -> Self {
        *self.failure.get_mut().unwrap() = Some((call_index, reason.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<PageCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ComplianceEvaluations for MemoryComplianceEvaluations {
    async fn compliance_details(
        &self,
        query: &ComplianceQuery,
        next_token: Option<&str>,
    ) -> PortResult<Page<EvaluationResult>> {
        let key = resource_key(&query.resource_type, &query.resource_id);
        let call_index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(PageCall {
                key: key.clone(),
                next_token: next_token.map(str::to_string),
            });
            calls.len() - 1
        };
        let query_error = |reason: String| PortError::ComplianceQuery {
            resource_type: query.resource_type.clone(),
            resource_id: query.resource_id.clone(),
            reason,
        };
        if let Some(reason) = planned_failure(&self.failure.lock().unwrap(), call_index) {
            return Err(query_error(reason));
        }
        let resources = self.resources.lock().unwrap();
        let pages = resources.get(&key).map(Vec::as_slice).unwrap_or(&[]);
        let mut page = serve_page(pages, &key, next_token).map_err(query_error)?;
        page.items.retain(|r| query.accepts(r.compliance_type));
        Ok(page)
    }
}

// ---------------------------------------------------------------------------
// RecordingHookReporter
// ---------------------------------------------------------------------------

/// Lifecycle-hook reporter that keeps every accepted decision.
#[derive(Debug, Default)]
pub struct RecordingHookReporter {
    decisions: Mutex<Vec<GateDecision>>,
    attempts: Mutex<usize>,
    failure: Mutex<Option<String>>,
}

impl RecordingHookReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, reason: &str) -> Self {
        *self.failure.get_mut().unwrap() = Some(reason.to_string());
        self
    }

    /// Decisions the orchestrator accepted.
    pub fn decisions(&self) -> Vec<GateDecision> {
        self.decisions.lock().unwrap().clone()
    }

    /// Calls received, accepted or not.
    pub fn call_count(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl LifecycleHookReporter for RecordingHookReporter {
    async fn put_hook_status(&self, decision: &GateDecision) -> PortResult<()> {
        *self.attempts.lock().unwrap() += 1;
        if let Some(reason) = self.failure.lock().unwrap().clone() {
            return Err(PortError::Reporting {
                deployment_id: decision.deployment_id.clone(),
                reason,
            });
        }
        self.decisions.lock().unwrap().push(decision.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RecordingMetricSink
// ---------------------------------------------------------------------------

/// Metric sink that keeps every accepted datapoint.
#[derive(Debug, Default)]
pub struct RecordingMetricSink {
    datums: Mutex<Vec<MetricDatum>>,
    attempts: Mutex<usize>,
    failure: Mutex<Option<String>>,
}

impl RecordingMetricSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, reason: &str) -> Self {
        *self.failure.get_mut().unwrap() = Some(reason.to_string());
        self
    }

    pub fn datums(&self) -> Vec<MetricDatum> {
        self.datums.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl MetricSink for RecordingMetricSink {
    async fn put_metric(&self, datum: &MetricDatum) -> PortResult<()> {
        *self.attempts.lock().unwrap() += 1;
        if let Some(reason) = self.failure.lock().unwrap().clone() {
            return Err(PortError::MetricEmission {
                namespace: datum.namespace.clone(),
                metric_name: datum.metric_name.clone(),
                reason,
            });
        }
        self.datums.lock().unwrap().push(datum.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryItemStore
// ---------------------------------------------------------------------------

/// In-memory table store backed by `HashMap<table, items>`.
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    queries: Mutex<Vec<ItemQuery>>,
    failure: Mutex<Option<String>>,
}

fn project(item: &Value, projection: &[String]) -> Value {
    if projection.is_empty() {
        return item.clone();
    }
    let projected = projection
        .iter()
        .filter_map(|attr| item.get(attr).map(|v| (attr.clone(), v.clone())))
        .collect::<serde_json::Map<String, Value>>();
    Value::Object(projected)
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(mut self, table: &str, items: Vec<Value>) -> Self {
        self.tables
            .get_mut()
            .unwrap()
            .insert(table.to_string(), items);
        self
    }

    pub fn failing(mut self, reason: &str) -> Self {
        *self.failure.get_mut().unwrap() = Some(reason.to_string());
        self
    }

    pub fn queries(&self) -> Vec<ItemQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn query(&self, query: &ItemQuery) -> PortResult<Vec<Value>> {
        self.queries.lock().unwrap().push(query.clone());
        if let Some(reason) = self.failure.lock().unwrap().clone() {
            return Err(PortError::ItemQuery {
                table: query.table.clone(),
                reason,
            });
        }
        let tables = self.tables.lock().unwrap();
        let items = tables.get(&query.table).ok_or_else(|| PortError::ItemQuery {
            table: query.table.clone(),
            reason: "requested resource not found".to_string(),
        })?;
        Ok(items
            .iter()
            .filter(|item| query.key.matches(item))
            .filter(|item| query.filter.as_ref().map_or(true, |f| f.matches(item)))
            .map(|item| project(item, &query.projection))
            .collect())
    }
}
