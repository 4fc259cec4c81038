//! Common handler contract.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, warn};

use crate::envelope::ApiResponse;
use crate::error::{HandlerError, Result};
use crate::request::{ApiRequest, InvocationContext};

/// A request handler answering with an [`ApiResponse`].
///
/// Handlers never fail: every problem becomes an error envelope.
#[async_trait]
pub trait ApiHandler: Send + Sync {
    /// Stable name used in logs and CLI dispatch.
    fn name(&self) -> &'static str;

    async fn handle(&self, request: &ApiRequest, ctx: &InvocationContext) -> ApiResponse;
}

/// Turn a handler result into its envelope, logging the failure if any.
pub(crate) fn respond(handler: &str, result: Result<Value>, ctx: &InvocationContext) -> ApiResponse {
    match result {
        Ok(data) => ApiResponse::success(&data),
        Err(err) => {
            match &err {
                HandlerError::Store(port) => error!(
                    handler = handler,
                    request_id = %ctx.aws_request_id,
                    capability = port.capability(),
                    error = %port,
                    "item store query failed"
                ),
                other => warn!(
                    handler = handler,
                    request_id = %ctx.aws_request_id,
                    error = %other,
                    "request rejected"
                ),
            }
            ApiResponse::error(&err.to_string(), &ctx.aws_request_id)
        }
    }
}
