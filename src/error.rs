//! Error types for the attack pipeline

use thiserror::Error;

/// Errors surfaced by the attack pipeline.
///
/// `InvalidParameters` is a user-input error rejected before the pipeline
/// starts. `Inconsistency` indicates a builder or deletion-mask bug (a
/// division that should be exact left a remainder); it aborts the attack
/// rather than silently corrupting the result. Cancellation and exhaustion
/// are *not* errors: they are the `Canceled` and `Failed` terminal states
/// of [`crate::AttackStatus`].
#[derive(Error, Debug)]
pub enum AttackError {
    #[error("invalid attack parameters: {0}")]
    InvalidParameters(String),

    #[error("internal consistency error: {0}")]
    Inconsistency(String),

    #[error("degenerate resultant input: {0}")]
    DegenerateResultant(String),
}

pub type Result<T> = std::result::Result<T, AttackError>;
