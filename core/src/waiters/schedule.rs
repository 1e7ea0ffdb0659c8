//! Waiter for the next scheduled hardware-discovery cycle.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;

use swappr_common::discovery::DiscoverySchedule;

use crate::waiting::GroupWaiter;

/// Waits for a discovery cycle to complete at or after a reference instant,
/// typically the moment the discovery cron job was resumed.
pub struct ScheduledDiscoveryWaiter {
    schedule: Arc<dyn DiscoverySchedule>,
    since: SystemTime,
    timeout: Duration,
}

impl ScheduledDiscoveryWaiter {
    pub fn new(schedule: Arc<dyn DiscoverySchedule>, since: SystemTime, timeout: Duration) -> Self {
        ScheduledDiscoveryWaiter {
            schedule,
            since,
            timeout,
        }
    }
}

#[async_trait]
impl GroupWaiter for ScheduledDiscoveryWaiter {
    type Member = String;

    fn members(&self) -> Vec<String> {
        vec!["hardware discovery".to_string()]
    }

    fn condition_name(&self) -> String {
        "a hardware discovery cycle to complete".to_string()
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(10)
    }

    async fn member_has_completed(&mut self, _member: &String) -> anyhow::Result<bool> {
        let completed = self.schedule.last_cycle_completed().await?;
        Ok(completed.is_some_and(|instant| instant >= self.since))
    }
}
