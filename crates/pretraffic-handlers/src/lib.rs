//! Data-access handlers shipped alongside the gated functions
//!
//! Two small API handlers backed by the `ItemStore` capability:
//!
//! - [`AlarmsHandler`]: active alarms for a site, reduced to the latest
//!   occurrence of each alarm code
//! - [`UserSettingsHandler`]: the caller's stored display settings
//!
//! Both answer with the same [`ApiResponse`] envelope and never fail: input
//! and store problems become a 500 envelope carrying the request id.

pub mod alarms;
pub mod config;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod request;
pub mod user_settings;

pub use alarms::{latest_per_code, AlarmsHandler};
pub use config::HandlerConfig;
pub use envelope::ApiResponse;
pub use error::{HandlerError, Result};
pub use handler::ApiHandler;
pub use request::{ApiRequest, Authorizer, Claims, InvocationContext, PathParameters, RequestContext};
pub use user_settings::{UserSettingsHandler, USER_SETTINGS_PROJECTION};
