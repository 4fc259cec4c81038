//! Error types for the data-access handlers

use cloud_ports::PortError;
use thiserror::Error;

/// Reasons a handler answers with an error envelope.
///
/// The display strings are the `error` field clients receive, so they are
/// part of the API.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The request carries no authorizer block
    #[error("authorization not configured")]
    AuthorizationNotConfigured,

    /// No path parameters at all
    #[error("site Id not provided")]
    SiteIdNotProvided,

    /// Path parameters present but without a site id
    #[error("siteId is invalid")]
    SiteIdInvalid,

    /// No usable email claim
    #[error("user id is either empty or invalid")]
    InvalidUserId,

    /// The item store rejected the query
    #[error("{0}")]
    Store(#[from] PortError),
}

/// Result type for handler operations
pub type Result<T> = std::result::Result<T, HandlerError>;
