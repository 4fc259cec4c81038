//! Smoke-test invocation of the function under deployment.
//!
//! The function is invoked with a fixed synthetic payload and scored:
//! - 2xx status: one point
//! - 2xx status and a response `body` whose `message` starts with
//!   [`GREETING_PREFIX`]: one more point
//! - any other status: no points and a forced `Failed` gate status
//!
//! A bad status is a scoring outcome, not an error; only a rejected invoke
//! call is an error.

use cloud_ports::{FunctionInvoker, InvocationResponse, PortResult};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::CheckOutcome;

/// Payload sent to the function under test: the JSON string `"test"`.
pub const SMOKE_TEST_PAYLOAD: &str = "\"test\"";

/// Prefix a function's `message` must start with to earn the bonus point.
pub const GREETING_PREFIX: &str = "Hello";

/// Scoring input derived from an invoke response.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationResult {
    pub status_code: u16,
    /// 2xx status
    pub succeeded: bool,
    /// The response `body`, decoded when it is JSON
    pub parsed_body: Option<Value>,
}

impl InvocationResult {
    pub fn from_response(response: &InvocationResponse) -> Self {
        Self {
            status_code: response.status_code,
            succeeded: response.is_success(),
            parsed_body: parse_body(response.payload.as_deref()),
        }
    }

    fn greets(&self) -> bool {
        self.parsed_body
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .is_some_and(|message| message.starts_with(GREETING_PREFIX))
    }
}

/// Decode the `body` of a proxy-style payload.
///
/// `body` is normally a JSON-encoded string; an inline object is accepted too.
fn parse_body(payload: Option<&str>) -> Option<Value> {
    let envelope: Value = match serde_json::from_str(payload?) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "invocation payload is not JSON");
            return None;
        }
    };
    match envelope.get("body")? {
        Value::String(raw) => serde_json::from_str(raw).ok(),
        body @ Value::Object(_) => Some(body.clone()),
        _ => None,
    }
}

/// Score an invocation result. Each point is worth `weight`.
pub fn score_invocation(result: &InvocationResult, weight: u64) -> CheckOutcome {
    if !result.succeeded {
        return CheckOutcome::forced_failure();
    }
    let points: u64 = if result.greets() { 2 } else { 1 };
    CheckOutcome::scored(points.saturating_mul(weight))
}

/// Invoke `function` with the smoke-test payload and score the response.
pub async fn test_function(
    invoker: &dyn FunctionInvoker,
    function: &str,
    weight: u64,
) -> PortResult<CheckOutcome> {
    info!(function = %function, "invoking function under test");
    let response = invoker.invoke(function, SMOKE_TEST_PAYLOAD).await?;
    let result = InvocationResult::from_response(&response);
    let outcome = score_invocation(&result, weight);
    if outcome.forced_failure {
        warn!(
            function = %function,
            status_code = result.status_code,
            "function under test returned a non-2xx status"
        );
    } else {
        info!(
            function = %function,
            status_code = result.status_code,
            score = outcome.score_delta,
            "function under test responded"
        );
    }
    Ok(outcome)
}
