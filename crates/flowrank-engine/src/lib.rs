//! Flow computation engine.
//!
//! Scores every node of a dependency graph for Energy and Priority,
//! normalizes both across the set, combines them into a Flow Index and
//! buckets each node into a flow tier.
//!
//! # Pipeline
//!
//! ```text
//! DependencyGraph::load -> cycles -> { energy, priority } -> normalize
//!     -> priority guardrails -> classify -> writer
//! ```
//!
//! [`FlowEngine`] runs the whole pipeline; the phase modules are public so
//! each step can be used and tested on its own.
//!
//! # Modules
//!
//! - [`cycles`]: cycle detection and cycle membership
//! - [`energy`]: raw Energy per node
//! - [`priority`]: raw Priority per node plus floor and ancestor guardrails
//! - [`normalize`]: min-max rescaling to 0..=100
//! - [`classify`]: Flow Index and tier bands
//! - [`writer`]: applies scores onto records
//! - [`rank`]: orders scored records
//! - [`report`]: run diagnostics

pub mod classify;
pub mod cycles;
pub mod energy;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod priority;
pub mod rank;
pub mod report;
pub mod writer;

pub use engine::{FlowEngine, FlowRun, NodeScore};
pub use error::EngineError;
pub use report::FlowReport;
