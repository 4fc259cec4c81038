//! API-gateway proxy request shapes.
//!
//! Only the fields the handlers read are modelled; everything else in the
//! proxy event is ignored.

use serde::{Deserialize, Serialize};

use crate::error::{HandlerError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathParameters {
    #[serde(default)]
    pub site_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorizer {
    #[serde(default)]
    pub claims: Option<Claims>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub authorizer: Option<Authorizer>,
}

/// An incoming API request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    #[serde(default)]
    pub path_parameters: Option<PathParameters>,
    #[serde(default)]
    pub request_context: RequestContext,
}

impl ApiRequest {
    pub fn with_site_id(mut self, site_id: &str) -> Self {
        self.path_parameters = Some(PathParameters {
            site_id: Some(site_id.to_string()),
        });
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.request_context.authorizer = Some(Authorizer {
            claims: Some(Claims {
                email: Some(email.to_string()),
            }),
        });
        self
    }

    /// Attach an authorizer without claims.
    pub fn authorized(mut self) -> Self {
        if self.request_context.authorizer.is_none() {
            self.request_context.authorizer = Some(Authorizer::default());
        }
        self
    }

    pub fn authorizer(&self) -> Result<&Authorizer> {
        self.request_context
            .authorizer
            .as_ref()
            .ok_or(HandlerError::AuthorizationNotConfigured)
    }

    /// The `siteId` path parameter.
    pub fn site_id(&self) -> Result<&str> {
        self.path_parameters
            .as_ref()
            .ok_or(HandlerError::SiteIdNotProvided)?
            .site_id
            .as_deref()
            .ok_or(HandlerError::SiteIdInvalid)
    }

    /// The caller's email claim, used as the user id.
    pub fn user_email(&self) -> Result<&str> {
        self.authorizer()?
            .claims
            .as_ref()
            .and_then(|c| c.email.as_deref())
            .ok_or(HandlerError::InvalidUserId)
    }
}

/// Runtime metadata of one handler invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationContext {
    /// Echoed back as `reference` in error envelopes
    pub aws_request_id: String,
    #[serde(default)]
    pub function_name: String,
}

impl InvocationContext {
    pub fn new(aws_request_id: impl Into<String>) -> Self {
        Self {
            aws_request_id: aws_request_id.into(),
            function_name: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_proxy_event_parses_with_extra_fields() {
        let request: ApiRequest = serde_json::from_value(json!({
            "path": "/dev/user/mqa/alarms/active",
            "httpMethod": "GET",
            "pathParameters": { "siteId": "site-1" },
            "requestContext": {
                "authorizer": { "claims": { "email": "ops@example.com", "sub": "x" } },
                "stage": "dev"
            }
        }))
        .unwrap();
        assert_eq!(request.site_id().unwrap(), "site-1");
        assert_eq!(request.user_email().unwrap(), "ops@example.com");
    }

    #[test]
    fn test_null_blocks_are_absent() {
        let request: ApiRequest = serde_json::from_value(json!({
            "pathParameters": null,
            "requestContext": { "authorizer": null }
        }))
        .unwrap();
        assert!(matches!(
            request.authorizer(),
            Err(HandlerError::AuthorizationNotConfigured)
        ));
        assert!(matches!(request.site_id(), Err(HandlerError::SiteIdNotProvided)));
    }

    #[test]
    fn test_missing_site_id_is_invalid() {
        let request: ApiRequest =
            serde_json::from_value(json!({ "pathParameters": { "siteId": null } })).unwrap();
        assert!(matches!(request.site_id(), Err(HandlerError::SiteIdInvalid)));
    }

    #[test]
    fn test_authorizer_without_claims_has_no_user() {
        let request = ApiRequest::default().authorized();
        assert!(request.authorizer().is_ok());
        assert!(matches!(request.user_email(), Err(HandlerError::InvalidUserId)));
    }
}
