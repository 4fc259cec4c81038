//! Trait contract tests for the capability fakes.
//!
//! The gate's own tests lean on these fakes, so their paging, filtering and
//! failure behaviour is pinned down here.

use cloud_ports::fakes::{
    MemoryComplianceEvaluations, MemoryItemStore, MemoryStackResources, RecordingHookReporter,
    RecordingMetricSink, ScriptedInvoker,
};
use cloud_ports::*;
use serde_json::json;

fn lambda(id: &str) -> StackResource {
    StackResource::new("AWS::Lambda::Function", id)
}

// ===========================================================================
// StackResources
// ===========================================================================

#[tokio::test]
async fn stack_pages_chain_through_issued_tokens() {
    let lister = MemoryStackResources::new()
        .with_pages("stack-a", vec![vec![lambda("f1"), lambda("f2")], vec![lambda("f3")]]);

    let first = lister.list_stack_resources("stack-a", None).await.unwrap();
    assert_eq!(first.items.len(), 2);
    let token = first.continuation().expect("first page has a continuation");

    let second = lister
        .list_stack_resources("stack-a", Some(token))
        .await
        .unwrap();
    assert_eq!(second.items, vec![lambda("f3")]);
    assert!(second.continuation().is_none());
    assert_eq!(lister.call_count(), 2);
}

#[tokio::test]
async fn unknown_stack_is_rejected() {
    let lister = MemoryStackResources::new();
    let err = lister
        .list_stack_resources("missing", None)
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::ListResources { .. }));
}

#[tokio::test]
async fn stack_failure_plan_starts_at_requested_call() {
    let lister = MemoryStackResources::new()
        .with_pages("s", vec![vec![lambda("f1")], vec![lambda("f2")]])
        .fail_on_call(1, "throttled");

    let first = lister.list_stack_resources("s", None).await.unwrap();
    let err = lister
        .list_stack_resources("s", first.continuation())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("throttled"));
}

// ===========================================================================
// FunctionInvoker
// ===========================================================================

#[tokio::test]
async fn invoker_returns_scripted_response_and_records_payload() {
    let invoker = ScriptedInvoker::new().with_response(
        "fn:live",
        InvocationResponse::new(200, Some("{}".to_string())),
    );
    let resp = invoker.invoke("fn:live", "\"test\"").await.unwrap();
    assert_eq!(resp.status_code, 200);

    let calls = invoker.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].payload, "\"test\"");
}

#[tokio::test]
async fn invoker_rejects_unknown_function() {
    let invoker = ScriptedInvoker::new();
    let err = invoker.invoke("nope", "\"test\"").await.unwrap_err();
    assert!(matches!(err, PortError::Invoke { .. }));
}

// ===========================================================================
// ComplianceEvaluations
// ===========================================================================

#[tokio::test]
async fn compliance_filter_is_applied_per_page() {
    let evals = MemoryComplianceEvaluations::new().with_pages(
        "AWS::Lambda::Function",
        "f1",
        vec![
            vec![
                EvaluationResult::new("r1", ComplianceType::Compliant),
                EvaluationResult::new("r2", ComplianceType::NonCompliant),
            ],
            vec![EvaluationResult::new("r3", ComplianceType::NonCompliant)],
        ],
    );
    let query = ComplianceQuery::compliant_only("AWS::Lambda::Function", "f1");

    let first = evals.compliance_details(&query, None).await.unwrap();
    assert_eq!(first.items.len(), 1);
    assert_eq!(first.items[0].rule_name, "r1");

    let second = evals
        .compliance_details(&query, first.continuation())
        .await
        .unwrap();
    assert!(second.items.is_empty());
    assert!(second.continuation().is_none());
}

#[tokio::test]
async fn unknown_resource_has_no_evaluations() {
    let evals = MemoryComplianceEvaluations::new();
    let query = ComplianceQuery::compliant_only("AWS::S3::Bucket", "b");
    let page = evals.compliance_details(&query, None).await.unwrap();
    assert!(page.items.is_empty());
    assert!(page.next_token.is_none());
}

// ===========================================================================
// LifecycleHookReporter / MetricSink
// ===========================================================================

#[tokio::test]
async fn failing_reporter_counts_attempt_but_keeps_no_decision() {
    let reporter = RecordingHookReporter::new().failing("deployment expired");
    let decision = GateDecision {
        deployment_id: "d-1".to_string(),
        hook_execution_id: Some("h-1".to_string()),
        status: HookStatus::Succeeded,
    };
    let err = reporter.put_hook_status(&decision).await.unwrap_err();
    assert!(matches!(err, PortError::Reporting { .. }));
    assert_eq!(reporter.call_count(), 1);
    assert!(reporter.decisions().is_empty());
}

#[tokio::test]
async fn metric_sink_keeps_accepted_datums() {
    let sink = RecordingMetricSink::new();
    let datum = MetricDatum {
        namespace: "Deployments".to_string(),
        metric_name: "Fitness".to_string(),
        value: 2.0,
        timestamp: chrono::Utc::now(),
    };
    sink.put_metric(&datum).await.unwrap();
    assert_eq!(sink.datums(), vec![datum]);
}

// ===========================================================================
// ItemStore
// ===========================================================================

#[tokio::test]
async fn item_store_applies_key_filter_and_projection() {
    let store = MemoryItemStore::new().with_items(
        "alarms",
        vec![
            json!({ "siteId": "s1", "state": 2, "code": "02" }),
            json!({ "siteId": "s1", "state": 1, "code": "03" }),
            json!({ "siteId": "s2", "state": 2, "code": "04" }),
        ],
    );
    let query = ItemQuery::new("alarms", Condition::eq("siteId", "s1"))
        .with_filter(Condition::eq("state", 2))
        .with_projection(["code"]);

    let items = store.query(&query).await.unwrap();
    assert_eq!(items, vec![json!({ "code": "02" })]);
    assert_eq!(store.queries(), vec![query]);
}

#[tokio::test]
async fn item_store_unknown_table_is_rejected() {
    let store = MemoryItemStore::new();
    let query = ItemQuery::new("missing", Condition::eq("k", "v"));
    let err = store.query(&query).await.unwrap_err();
    assert!(matches!(err, PortError::ItemQuery { .. }));
}
