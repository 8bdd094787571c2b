//! Engine error types.
//!
//! The engine only fails at its input boundary: invalid configuration or
//! records that break an input invariant. Cycles, dangling references and a
//! relaxation that hits its cap are diagnostics, not errors.

use flowrank_core::CoreError;
use thiserror::Error;

/// Errors produced by a flow computation run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Records or configuration were rejected before computation started.
    #[error(transparent)]
    Input(#[from] CoreError),
}
