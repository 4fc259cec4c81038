//! Cloud-Gateway: HTTP adapter for the gate's capabilities
//!
//! Implements every `cloud-ports` trait on one [`GatewayClient`] that speaks
//! a small JSON contract: each call is a `POST` to
//! `{endpoint}/{service}/{operation}` with a body mirroring the cloud
//! provider's field names. Point the endpoint at a provider-compatible
//! gateway or a local emulator.
//!
//! ## Key Components
//!
//! - `GatewayConfig`: endpoint, bearer token and timeout, read from
//!   `CLOUD_GATEWAY_ENDPOINT` / `CLOUD_GATEWAY_TOKEN`
//! - `GatewayClient`: the `reqwest`-backed implementation
//! - `wire`: request/response bodies of the contract

pub mod client;
pub mod config;
pub mod error;
pub mod wire;

pub use client::GatewayClient;
pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use wire::Operation;
