//! Handler behaviour against the in-memory item store.

use std::sync::Arc;

use cloud_ports::fakes::MemoryItemStore;
use pretraffic_handlers::{
    AlarmsHandler, ApiHandler, ApiRequest, HandlerConfig, InvocationContext, UserSettingsHandler,
};
use pretraffic_handlers::config::{DEFAULT_ALARMS_TABLE, DEFAULT_USER_TABLE};
use serde_json::{json, Value};

const SITE: &str = "af775156-a3b5-4cb8-b610-0f326dcb7385";

fn alarm(code: &str, number: &str, state: i64, activated: &str) -> Value {
    json!({
        "alarmCode": code,
        "alarmCurrentstate": state,
        "alarmNumber": number,
        "alarmTimestampActivated": activated,
        "deviceName": "MQA_Ruitenberg",
        "siteId": SITE,
    })
}

fn alarm_store() -> MemoryItemStore {
    MemoryItemStore::new().with_items(
        "dev_isr_mqa_alarm",
        vec![
            alarm("02", "0", 2, "2019-09-23T12:02:23.000Z"),
            alarm("02", "1", 2, "2019-09-25T11:19:59.000Z"),
            alarm("13", "2", 2, "2019-10-08T13:04:53.000Z"),
            alarm("13", "3", 1, "2019-10-09T00:00:00.000Z"),
            json!({ "alarmCode": "02", "alarmCurrentstate": 2, "siteId": "other-site" }),
        ],
    )
}

fn user_store() -> MemoryItemStore {
    MemoryItemStore::new().with_items(
        "dev_isr_user_info",
        vec![json!({
            "userId": "ops@example.com",
            "firstName": "Sam",
            "lastName": "Jansen",
            "tempFormat": "C",
            "role": "admin",
            "passwordHash": "never returned",
        })],
    )
}

fn ctx() -> InvocationContext {
    InvocationContext::new("req-123")
}

fn alarms(store: &Arc<MemoryItemStore>) -> AlarmsHandler {
    AlarmsHandler::new(store.clone(), "dev_isr_mqa_alarm")
}

fn settings(store: &Arc<MemoryItemStore>) -> UserSettingsHandler {
    UserSettingsHandler::new(store.clone(), "dev_isr_user_info")
}

fn error_body(reason: &str) -> Value {
    json!({ "error": reason, "reference": "req-123" })
}

#[tokio::test]
async fn alarms_returns_latest_active_alarm_per_code() {
    let store = Arc::new(alarm_store());
    let request = ApiRequest::default().with_site_id(SITE).with_email("ops@example.com");

    let response = alarms(&store).handle(&request, &ctx()).await;

    assert_eq!(response.status_code, 200);
    let body = response.body_json().unwrap();
    assert_eq!(body["siteId"], json!(SITE));
    let numbers: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["alarmNumber"].as_str().unwrap())
        .collect();
    assert_eq!(numbers, vec!["1", "2"]);

    let queries = store.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].key.attribute, "siteId");
    assert_eq!(queries[0].filter.as_ref().unwrap().value, json!(2));
}

#[tokio::test]
async fn alarms_without_authorizer_is_rejected_before_querying() {
    let store = Arc::new(alarm_store());
    let request = ApiRequest::default().with_site_id(SITE);

    let response = alarms(&store).handle(&request, &ctx()).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(response.body_json().unwrap(), error_body("authorization not configured"));
    assert!(store.queries().is_empty());
}

#[tokio::test]
async fn alarms_site_id_validation() {
    let store = Arc::new(alarm_store());
    let handler = alarms(&store);

    let no_params = ApiRequest::default().authorized();
    let response = handler.handle(&no_params, &ctx()).await;
    assert_eq!(response.body_json().unwrap(), error_body("site Id not provided"));

    let no_site: ApiRequest = serde_json::from_value(json!({
        "pathParameters": { "other": "x" },
        "requestContext": { "authorizer": {} }
    }))
    .unwrap();
    let response = handler.handle(&no_site, &ctx()).await;
    assert_eq!(response.body_json().unwrap(), error_body("siteId is invalid"));

    assert!(store.queries().is_empty());
}

#[tokio::test]
async fn alarms_store_failure_becomes_error_envelope() {
    let store = Arc::new(MemoryItemStore::new().failing("provisioned throughput exceeded"));
    let request = ApiRequest::default().with_site_id(SITE).authorized();

    let response = alarms(&store).handle(&request, &ctx()).await;

    assert_eq!(response.status_code, 500);
    let body = response.body_json().unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("provisioned throughput exceeded"));
    assert_eq!(body["reference"], json!("req-123"));
}

#[tokio::test]
async fn user_settings_returns_projected_first_item() {
    let store = Arc::new(user_store());
    let request = ApiRequest::default().with_email("ops@example.com");

    let response = settings(&store).handle(&request, &ctx()).await;

    assert!(response.is_success());
    let body = response.body_json().unwrap();
    assert_eq!(body["firstName"], json!("Sam"));
    assert_eq!(body["role"], json!("admin"));
    assert!(body.get("passwordHash").is_none());
    assert_eq!(store.queries()[0].projection.len(), 11);
}

#[tokio::test]
async fn user_settings_unknown_user_returns_null_body() {
    let store = Arc::new(user_store());
    let request = ApiRequest::default().with_email("nobody@example.com");

    let response = settings(&store).handle(&request, &ctx()).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, "null");
}

#[tokio::test]
async fn user_settings_requires_email_claim() {
    let store = Arc::new(user_store());
    let handler = settings(&store);

    let response = handler.handle(&ApiRequest::default(), &ctx()).await;
    assert_eq!(response.body_json().unwrap(), error_body("authorization not configured"));

    let response = handler.handle(&ApiRequest::default().authorized(), &ctx()).await;
    assert_eq!(
        response.body_json().unwrap(),
        error_body("user id is either empty or invalid")
    );
    assert!(store.queries().is_empty());
}

#[test]
fn handler_config_builders_override_defaults() {
    let config = HandlerConfig::new(DEFAULT_ALARMS_TABLE, DEFAULT_USER_TABLE)
        .with_alarms_table("prod_isr_mqa_alarm");
    assert_eq!(config.alarms_table, "prod_isr_mqa_alarm");
    assert_eq!(config.user_table, "dev_isr_user_info");
}
