//! # Discovery Schedule Contract
//!
//! The cron job that periodically rediscovers hardware. It must be
//! suspended while a blade is out (so half-removed hardware is not
//! re-registered) and resumed once the replacement is in.

use std::time::SystemTime;

use async_trait::async_trait;
use thiserror::Error;

/// A failure manipulating or inspecting the discovery schedule.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("failed to update the discovery cron job: {0}")]
    Update(String),
    #[error("failed to read the discovery schedule: {0}")]
    Query(String),
}

#[async_trait]
pub trait DiscoverySchedule: Send + Sync {
    /// Suspend or resume the periodic discovery trigger.
    async fn set_suspended(&self, suspended: bool) -> Result<(), ScheduleError>;

    /// Completion time of the most recent discovery cycle, if any cycle has
    /// ever completed.
    async fn last_cycle_completed(&self) -> Result<Option<SystemTime>, ScheduleError>;
}
