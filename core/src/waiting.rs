//! # Group Wait Engine
//!
//! A polling loop that waits for a set of independently-probed members to
//! reach a condition before a deadline.
//!
//! The central correctness property is per-member fault isolation: a probe
//! failure against one member is logged and counts as "not yet complete"
//! for that member only. A flaky board controller must never abort the wait
//! for the controllers that *are* converging; the flaky one simply keeps
//! being retried until the deadline.

use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// The terminal state of a group wait.
///
/// A wait never fails with an error: members that did not reach the
/// condition by the deadline are reported in `failed`, and the caller
/// decides whether that is fatal.
#[derive(Debug)]
pub struct WaitOutcome<M> {
    pub completed: Vec<M>,
    pub failed: Vec<M>,
}

impl<M> WaitOutcome<M> {
    pub fn succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

fn join_members<M: Display>(members: &[M]) -> String {
    members
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A bounded wait for every member of a group to satisfy a condition.
///
/// Implementors supply the member set, the condition, and the per-member
/// probe; [`GroupWaiter::wait_for_completion`] supplies the loop.
#[async_trait]
pub trait GroupWaiter: Send {
    type Member: Display + Clone + Send + Sync;

    fn members(&self) -> Vec<Self::Member>;

    /// Human-readable name of the awaited condition, for log messages.
    fn condition_name(&self) -> String;

    fn timeout(&self) -> Duration;

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(1)
    }

    /// Runs exactly once, before the first polling pass.
    async fn pre_wait_action(&mut self) {}

    /// Probe one member. An `Err` means the probe itself failed; the engine
    /// logs it and treats the member as not yet complete.
    async fn member_has_completed(&mut self, member: &Self::Member) -> anyhow::Result<bool>;

    /// Polls every pending member until all complete or the deadline
    /// elapses, whichever comes first.
    async fn wait_for_completion(&mut self) -> WaitOutcome<Self::Member> {
        self.pre_wait_action().await;

        let deadline = Instant::now() + self.timeout();
        let mut pending = self.members();
        let mut completed = Vec::with_capacity(pending.len());

        info!(
            "Waiting up to {}s for: {}",
            self.timeout().as_secs(),
            self.condition_name()
        );

        while !pending.is_empty() && Instant::now() < deadline {
            let mut still_pending = Vec::new();

            for member in pending {
                match self.member_has_completed(&member).await {
                    Ok(true) => {
                        debug!("{member} reached condition: {}", self.condition_name());
                        completed.push(member);
                    }
                    Ok(false) => still_pending.push(member),
                    Err(err) => {
                        warn!(
                            "Failed to check whether {member} reached condition '{}': {err:#}",
                            self.condition_name()
                        );
                        still_pending.push(member);
                    }
                }
            }

            pending = still_pending;
            if !pending.is_empty() {
                tokio::time::sleep(self.poll_interval()).await;
            }
        }

        if !pending.is_empty() {
            error!(
                "Timed out after {}s waiting for '{}'; incomplete members: {}",
                self.timeout().as_secs(),
                self.condition_name(),
                join_members(&pending)
            );
        }

        WaitOutcome {
            completed,
            failed: pending,
        }
    }
}
