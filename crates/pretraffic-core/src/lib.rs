//! Pre-traffic deployment gate
//!
//! Before a new function version receives traffic, the deployment
//! orchestrator invokes the gate with a lifecycle hook event. The gate runs
//! a battery of fitness checks against the new version, reports
//! `Succeeded`/`Failed` back to the orchestrator and publishes the fitness
//! score as a metric.
//!
//! The gate only talks to the outside world through the capability traits
//! of `cloud-ports`, so every flow can be exercised with in-memory fakes.

pub mod aggregator;
pub mod check;
pub mod compliance;
pub mod config;
pub mod context;
pub mod controller;
pub mod domain;
pub mod invocation;
pub mod obs;
pub mod pagination;
pub mod reporter;
pub mod resources;
pub mod telemetry;

pub use aggregator::FitnessAggregator;
pub use check::{ComplianceCheck, FitnessCheck, InvocationCheck};
pub use config::GateConfig;
pub use context::{GateContext, GatePorts};
pub use controller::{GateController, GateOutcome, HookResponse};
pub use domain::{
    CheckOutcome, CheckRecord, DeploymentEvent, FitnessReport, GateError, HookEvent, Result,
    SENTINEL_ACK, SENTINEL_EVENT,
};
pub use pagination::fetch_all_pages;
pub use reporter::{GateReporter, ReportOutcome};

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
