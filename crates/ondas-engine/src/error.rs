//! Engine error types.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the orchestration layer.
///
/// The audio path itself is infallible (all arithmetic saturates and bad
/// indices are no-ops); errors only come from the collaborators around it.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine context did not park or resume within the deadline.
    #[error("companion context did not settle within {0:?}")]
    CompanionTimeout(Duration),

    /// A codec control-port write failed.
    #[error("codec control: {0}")]
    Codec(String),

    /// Committing the tag store failed.
    #[error("tag store commit: {0}")]
    Store(String),
}
