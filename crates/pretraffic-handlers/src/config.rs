//! Table names used by the handlers.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ALARMS_TABLE: &str = "dev_isr_mqa_alarm";
pub const DEFAULT_USER_TABLE: &str = "dev_isr_user_info";

/// Handler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerConfig {
    pub alarms_table: String,
    pub user_table: String,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        HandlerConfig {
            alarms_table: std::env::var("ALARMS_TABLE")
                .unwrap_or_else(|_| DEFAULT_ALARMS_TABLE.to_string()),
            user_table: std::env::var("USER_TABLE")
                .unwrap_or_else(|_| DEFAULT_USER_TABLE.to_string()),
        }
    }
}

impl HandlerConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn new(alarms_table: &str, user_table: &str) -> Self {
        HandlerConfig {
            alarms_table: alarms_table.to_string(),
            user_table: user_table.to_string(),
        }
    }

    pub fn with_alarms_table(mut self, table: &str) -> Self {
        self.alarms_table = table.to_string();
        self
    }

    pub fn with_user_table(mut self, table: &str) -> Self {
        self.user_table = table.to_string();
        self
    }
}
