//! Active alarms for one site, latest occurrence per alarm code.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use cloud_ports::{Condition, ItemQuery, ItemStore};
use serde_json::{json, Value};
use tracing::info;

use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::handler::{respond, ApiHandler};
use crate::request::{ApiRequest, InvocationContext};

/// `alarmCurrentstate` value of an active alarm.
pub const ACTIVE_STATE: i64 = 2;

fn activated_at(alarm: &Value) -> Option<DateTime<FixedOffset>> {
    alarm
        .get("alarmTimestampActivated")
        .and_then(Value::as_str)
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
}

/// Keep the most recently activated alarm of each `alarmCode`.
///
/// An alarm replaces the kept one when its activation time is later or
/// equal; when either timestamp is missing or unparseable the kept alarm
/// stays. Codes keep the order in which they were first seen.
pub fn latest_per_code(alarms: Vec<Value>) -> Vec<Value> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut latest: Vec<Value> = Vec::new();

    for alarm in alarms {
        let code = alarm.get("alarmCode").cloned().unwrap_or(Value::Null).to_string();
        match slots.get(&code) {
            Some(&slot) => {
                let replace = match (activated_at(&latest[slot]), activated_at(&alarm)) {
                    (Some(kept), Some(new)) => kept <= new,
                    _ => false,
                };
                if replace {
                    latest[slot] = alarm;
                }
            }
            None => {
                slots.insert(code, latest.len());
                latest.push(alarm);
            }
        }
    }

    latest
}

/// `GET /sites/{siteId}/alarms/active`
pub struct AlarmsHandler {
    store: Arc<dyn ItemStore>,
    table: String,
}

impl AlarmsHandler {
    pub fn new(store: Arc<dyn ItemStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    async fn fetch(&self, request: &ApiRequest) -> Result<Value> {
        request.authorizer()?;
        let site_id = request.site_id()?;

        let query = ItemQuery::new(&self.table, Condition::eq("siteId", site_id))
            .with_filter(Condition::eq("alarmCurrentstate", ACTIVE_STATE));
        let alarms = self.store.query(&query).await?;
        let fetched = alarms.len();
        let items = latest_per_code(alarms);
        info!(site_id = %site_id, fetched, kept = items.len(), "active alarms fetched");

        Ok(json!({ "siteId": site_id, "items": items }))
    }
}

#[async_trait]
impl ApiHandler for AlarmsHandler {
    fn name(&self) -> &'static str {
        "alarms"
    }

    async fn handle(&self, request: &ApiRequest, ctx: &InvocationContext) -> ApiResponse {
        respond(self.name(), self.fetch(request).await, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alarm(code: &str, number: &str, activated: &str) -> Value {
        json!({
            "alarmCode": code,
            "alarmNumber": number,
            "alarmTimestampActivated": activated,
        })
    }

    fn numbers(alarms: &[Value]) -> Vec<&str> {
        alarms
            .iter()
            .map(|a| a["alarmNumber"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_later_alarm_replaces_in_first_seen_slot() {
        let kept = latest_per_code(vec![
            alarm("02", "0", "2019-09-23T12:02:23.000Z"),
            alarm("13", "1", "2019-10-08T13:04:53.000Z"),
            alarm("02", "2", "2019-09-25T11:19:59.000Z"),
        ]);
        assert_eq!(numbers(&kept), vec!["2", "1"]);
    }

    #[test]
    fn test_earlier_alarm_does_not_replace() {
        let kept = latest_per_code(vec![
            alarm("02", "0", "2019-09-25T00:00:00Z"),
            alarm("02", "1", "2019-09-24T00:00:00Z"),
        ]);
        assert_eq!(numbers(&kept), vec!["0"]);
    }

    #[test]
    fn test_equal_timestamp_replaces() {
        let kept = latest_per_code(vec![
            alarm("02", "0", "2019-09-25T00:00:00Z"),
            alarm("02", "1", "2019-09-25T00:00:00Z"),
        ]);
        assert_eq!(numbers(&kept), vec!["1"]);
    }

    #[test]
    fn test_unparseable_timestamp_never_replaces() {
        let kept = latest_per_code(vec![
            alarm("02", "0", "not a date"),
            alarm("02", "1", "2019-09-25T00:00:00Z"),
            alarm("07", "2", "2019-09-25T00:00:00Z"),
            alarm("07", "3", "yesterday"),
        ]);
        assert_eq!(numbers(&kept), vec!["0", "2"]);
    }

    #[test]
    fn test_string_and_numeric_codes_are_distinct() {
        let kept = latest_per_code(vec![
            json!({ "alarmCode": "2", "alarmNumber": "0" }),
            json!({ "alarmCode": 2, "alarmNumber": "1" }),
        ]);
        assert_eq!(kept.len(), 2);
    }
}
