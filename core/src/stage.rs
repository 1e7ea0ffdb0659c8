//! # Procedure Stages
//!
//! A stage is a named unit of work inside a procedure. Running an operation
//! through [`stage`] gives every stage the same observable behavior: an
//! announcement at info level, domain errors passed through untouched, and
//! upstream API errors uniformly translated into the domain error type.
//!
//! Programming errors are a different animal: they panic, and nothing in
//! this module catches a panic. A defect crashes the process with a full
//! backtrace instead of masquerading as an operational failure.

use std::future::Future;
use std::process::ExitCode;

use async_trait::async_trait;
use swappr_common::{error, info, success};

use crate::error::{StageError, SwapError};

/// Renders an imperative stage label in the present progressive, e.g.
/// `Perform a test` becomes `Performing a test`.
pub fn in_progress(label: &str) -> String {
    match label.split_once(' ') {
        Some((verb, rest)) => format!("{verb}ing {rest}"),
        None => format!("{label}ing"),
    }
}

/// Runs one named stage.
///
/// Announces the stage, then awaits the operation. A [`SwapError`] is
/// re-raised unchanged; an [`ApiError`](swappr_common::error::ApiError) is
/// translated into a [`SwapError`] carrying the upstream message.
pub async fn stage<T, F>(label: &str, operation: F) -> Result<T, SwapError>
where
    F: Future<Output = Result<T, StageError>> + Send,
{
    info!("{}", in_progress(label));
    match operation.await {
        Ok(value) => Ok(value),
        Err(StageError::Swap(err)) => Err(err),
        Err(StageError::Api(err)) => {
            Err(SwapError::new(format!("Error accessing API: {err}")))
        }
    }
}

/// An ordered sequence of stages with fail-fast semantics.
///
/// Concrete procedures implement [`Procedure::procedure`] as explicit
/// sequential `stage(...)` calls; the ordering is the source order of those
/// calls. [`Procedure::run`] is the outermost error boundary: it logs a
/// domain failure and turns it into a failing exit code for `main` to
/// return, and lets anything else unwind.
#[async_trait]
pub trait Procedure: Send {
    /// Short human-readable name, used in completion messages.
    fn title(&self) -> &'static str;

    async fn procedure(&mut self) -> Result<(), SwapError>;

    async fn run(&mut self) -> ExitCode {
        match self.procedure().await {
            Ok(()) => {
                success!("{} completed successfully", self.title());
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!("{err}");
                ExitCode::FAILURE
            }
        }
    }
}
