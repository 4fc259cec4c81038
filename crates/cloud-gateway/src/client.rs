//! Gateway client
//!
//! One `reqwest::Client` serves every capability. Each trait method maps to a
//! single `POST {endpoint}/{service}/{operation}` call; failures are folded
//! into the matching `PortError` variant at the trait boundary.

use std::time::Duration;

use async_trait::async_trait;
use cloud_ports::{
    ComplianceEvaluations, ComplianceQuery, EvaluationResult, FunctionInvoker, GateDecision,
    InvocationResponse, ItemQuery, ItemStore, LifecycleHookReporter, MetricDatum, MetricSink,
    Page, PortError, PortResult, StackResource, StackResources,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::wire::{
    ComplianceDetailsRequest, ComplianceDetailsResponse, InvokeRequest, InvokeResponse,
    ListStackResourcesRequest, ListStackResourcesResponse, Operation, PutHookStatusRequest,
    PutMetricDataRequest, QueryRequest, QueryResponse,
};

const USER_AGENT: &str = concat!("pretraffic-cloud-gateway/", env!("CARGO_PKG_VERSION"));

/// Convert a gateway failure into the capability error the gate expects.
///
/// Connection-level failures become `PortError::Transport`; anything the
/// gateway actually answered is reported against the capability.
fn port_error(err: GatewayError, capability: impl FnOnce(String) -> PortError) -> PortError {
    if err.is_transport() {
        PortError::Transport(err.to_string())
    } else {
        capability(err.to_string())
    }
}

/// HTTP client for the cloud gateway
#[derive(Debug)]
pub struct GatewayClient {
    config: GatewayConfig,
    http_client: reqwest::Client,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        if !config.endpoint.starts_with("http://") && !config.endpoint.starts_with("https://") {
            return Err(GatewayError::InvalidConfig(format!(
                "endpoint must be an http(s) URL, got {:?}",
                config.endpoint
            )));
        }

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder
            .build()
            .map_err(|e| GatewayError::InvalidConfig(e.to_string()))?;

        Ok(GatewayClient {
            config,
            http_client,
        })
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GatewayConfig::from_env())
    }

    /// Post `body` to `operation` and return the raw response text.
    async fn post<B: Serialize + ?Sized>(&self, operation: Operation, body: &B) -> Result<String> {
        let url = self
            .config
            .operation_url(operation.service(), operation.name());
        debug!(operation = operation.path(), url = %url, "calling gateway");

        let mut request = self.http_client.post(&url).json(body);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                operation: operation.path(),
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }

    /// Post `body` and decode the JSON response.
    async fn call<B, R>(&self, operation: Operation, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let text = self.post(operation, body).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl StackResources for GatewayClient {
    async fn list_stack_resources(
        &self,
        stack_id: &str,
        next_token: Option<&str>,
    ) -> PortResult<Page<StackResource>> {
        let request = ListStackResourcesRequest {
            stack_name: stack_id,
            next_token,
        };
        let response: ListStackResourcesResponse = self
            .call(Operation::ListStackResources, &request)
            .await
            .map_err(|e| {
                port_error(e, |reason| PortError::ListResources {
                    stack: stack_id.to_string(),
                    reason,
                })
            })?;
        Ok(response.into())
    }
}

#[async_trait]
impl FunctionInvoker for GatewayClient {
    async fn invoke(&self, function: &str, payload: &str) -> PortResult<InvocationResponse> {
        let request = InvokeRequest {
            function_name: function,
            payload,
        };
        let response: InvokeResponse = self
            .call(Operation::Invoke, &request)
            .await
            .map_err(|e| {
                port_error(e, |reason| PortError::Invoke {
                    function: function.to_string(),
                    reason,
                })
            })?;
        Ok(response.into())
    }
}

#[async_trait]
impl ComplianceEvaluations for GatewayClient {
    async fn compliance_details(
        &self,
        query: &ComplianceQuery,
        next_token: Option<&str>,
    ) -> PortResult<Page<EvaluationResult>> {
        let request = ComplianceDetailsRequest::new(query, next_token);
        let response: ComplianceDetailsResponse = self
            .call(Operation::GetComplianceDetails, &request)
            .await
            .map_err(|e| {
                port_error(e, |reason| PortError::ComplianceQuery {
                    resource_type: query.resource_type.clone(),
                    resource_id: query.resource_id.clone(),
                    reason,
                })
            })?;
        Ok(response.into())
    }
}

#[async_trait]
impl LifecycleHookReporter for GatewayClient {
    async fn put_hook_status(&self, decision: &GateDecision) -> PortResult<()> {
        self.post(Operation::PutHookStatus, &PutHookStatusRequest::from(decision))
            .await
            .map_err(|e| {
                port_error(e, |reason| PortError::Reporting {
                    deployment_id: decision.deployment_id.clone(),
                    reason,
                })
            })?;
        Ok(())
    }
}

#[async_trait]
impl MetricSink for GatewayClient {
    async fn put_metric(&self, datum: &MetricDatum) -> PortResult<()> {
        self.post(Operation::PutMetricData, &PutMetricDataRequest::from(datum))
            .await
            .map_err(|e| {
                port_error(e, |reason| PortError::MetricEmission {
                    namespace: datum.namespace.clone(),
                    metric_name: datum.metric_name.clone(),
                    reason,
                })
            })?;
        Ok(())
    }
}

#[async_trait]
impl ItemStore for GatewayClient {
    async fn query(&self, query: &ItemQuery) -> PortResult<Vec<Value>> {
        let response: QueryResponse = self
            .call(Operation::Query, &QueryRequest::from(query))
            .await
            .map_err(|e| {
                port_error(e, |reason| PortError::ItemQuery {
                    table: query.table.clone(),
                    reason,
                })
            })?;
        Ok(response.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_endpoint() {
        assert!(matches!(
            GatewayClient::new(GatewayConfig::new("gateway.internal")),
            Err(GatewayError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_status_errors_map_to_capability() {
        let err = port_error(
            GatewayError::Status {
                operation: "cloudwatch/put-metric-data",
                status: 400,
                body: "bad namespace".to_string(),
            },
            |reason| PortError::MetricEmission {
                namespace: "ns".to_string(),
                metric_name: "m".to_string(),
                reason,
            },
        );
        assert_eq!(err.capability(), "put_metric");
        assert!(err.to_string().contains("bad namespace"));
    }

    #[test]
    fn test_http_errors_map_to_transport() {
        let err = port_error(GatewayError::Http("connection refused".to_string()), |reason| {
            PortError::Invoke {
                function: "fn".to_string(),
                reason,
            }
        });
        assert!(matches!(err, PortError::Transport(_)));
    }
}
