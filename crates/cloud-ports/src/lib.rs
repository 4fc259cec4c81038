//! Cloud-Ports: capability boundary for the pre-traffic gate
//!
//! This crate defines every external system the gate and the data handlers
//! depend on as an async trait, together with the plain data types that
//! cross that boundary. Nothing here talks to a network.
//!
//! ## Layer 0 - Capabilities
//!
//! Focus: a backend-agnostic contract that the gate is written against and
//! that concrete adapters (see the `cloud-gateway` crate) implement.
//!
//! ## Key Components
//!
//! - `StackResources`, `FunctionInvoker`, `ComplianceEvaluations`: inputs to
//!   the fitness checks
//! - `LifecycleHookReporter`, `MetricSink`: outputs of the gate
//! - `ItemStore`: table queries for the data handlers
//! - `fakes`: recording in-memory implementations for tests

mod error;
pub mod capability_traits;
pub mod fakes;

pub use capability_traits::{
    ComplianceEvaluations, ComplianceQuery, ComplianceType, Condition, EvaluationResult,
    FunctionInvoker, GateDecision, HookStatus, InvocationResponse, ItemQuery, ItemStore,
    LifecycleHookReporter, MetricDatum, MetricSink, Page, PortResult, StackResource,
    StackResources,
};
pub use error::PortError;
