//! HTTP response envelope shared by every handler.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const CONTENT_TYPE: &str = "application/json";
pub const ALLOW_ORIGIN: &str = "*";

/// Proxy-integration response: status, JSON-encoded body and CORS headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    /// JSON document encoded as a string
    pub body: String,
    pub headers: BTreeMap<String, String>,
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
        ("Access-Control-Allow-Origin".to_string(), ALLOW_ORIGIN.to_string()),
    ])
}

impl ApiResponse {
    /// 200 with `data` as the body.
    pub fn success(data: &Value) -> Self {
        Self {
            status_code: 200,
            body: data.to_string(),
            headers: default_headers(),
        }
    }

    /// 500 with `{"error": message, "reference": request_id}` as the body.
    pub fn error(message: &str, reference: &str) -> Self {
        Self {
            status_code: 500,
            body: json!({ "error": message, "reference": reference }).to_string(),
            headers: default_headers(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    /// Decode the body back into JSON.
    pub fn body_json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_shape() {
        let response = ApiResponse::error("siteId is invalid", "req-42");
        assert_eq!(response.status_code, 500);
        assert_eq!(
            response.body_json().unwrap(),
            json!({ "error": "siteId is invalid", "reference": "req-42" })
        );
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(response.headers["Content-Type"], "application/json");
    }

    #[test]
    fn test_success_envelope_serializes_camel_case() {
        let response = ApiResponse::success(&json!({ "siteId": "s" }));
        let doc = serde_json::to_value(&response).unwrap();
        assert_eq!(doc["statusCode"], json!(200));
        assert_eq!(doc["body"], json!("{\"siteId\":\"s\"}"));
    }
}
