//! Domain models for the pre-traffic gate.
//!
//! Canonical definitions for the core entities:
//! - `HookEvent` / `DeploymentEvent`: the classified triggering event
//! - `FitnessReport`: accumulated score and pass/fail status
//! - `GateError`: everything that aborts an invocation

pub mod error;
pub mod event;
pub mod fitness;

pub use error::{GateError, Result};
pub use event::{DeploymentEvent, HookEvent, SENTINEL_ACK, SENTINEL_EVENT};
pub use fitness::{CheckOutcome, CheckRecord, FitnessReport};
