//! Error types for blade swap procedures.

use thiserror::Error;

use swappr_common::error::ApiError;

/// The single recoverable error kind a procedure surfaces.
///
/// Anything else escaping a stage is a programming error and is allowed to
/// panic; the runner never downgrades a panic into a `SwapError`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SwapError(pub String);

impl SwapError {
    pub fn new(message: impl Into<String>) -> Self {
        SwapError(message.into())
    }
}

/// What a stage operation may fail with.
///
/// The stage runner passes [`SwapError`] through unchanged and rewraps
/// [`ApiError`] with an explanatory prefix; no other error type is
/// representable here.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Swap(#[from] SwapError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
