//! Display settings of the calling user.

use std::sync::Arc;

use async_trait::async_trait;
use cloud_ports::{Condition, ItemQuery, ItemStore};
use serde_json::Value;
use tracing::info;

use crate::envelope::ApiResponse;
use crate::error::Result;
use crate::handler::{respond, ApiHandler};
use crate::request::{ApiRequest, InvocationContext};

/// Attributes returned for a user.
pub const USER_SETTINGS_PROJECTION: [&str; 11] = [
    "userId",
    "firstName",
    "lastName",
    "loggedIn",
    "mobileNumber",
    "tempFormat",
    "timeFormat",
    "dateFormat",
    "userLanguage",
    "vaccumFormat",
    "role",
];

/// `GET /user/settings`
pub struct UserSettingsHandler {
    store: Arc<dyn ItemStore>,
    table: String,
}

impl UserSettingsHandler {
    pub fn new(store: Arc<dyn ItemStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    async fn fetch(&self, request: &ApiRequest) -> Result<Value> {
        let user_id = request.user_email()?;

        let query = ItemQuery::new(&self.table, Condition::eq("userId", user_id))
            .with_projection(USER_SETTINGS_PROJECTION);
        let items = self.store.query(&query).await?;
        info!(found = !items.is_empty(), "user settings fetched");

        // No row is not an error: the body is `null`.
        Ok(items.into_iter().next().unwrap_or(Value::Null))
    }
}

#[async_trait]
impl ApiHandler for UserSettingsHandler {
    fn name(&self) -> &'static str {
        "user-settings"
    }

    async fn handle(&self, request: &ApiRequest, ctx: &InvocationContext) -> ApiResponse {
        respond(self.name(), self.fetch(request).await, ctx)
    }
}
