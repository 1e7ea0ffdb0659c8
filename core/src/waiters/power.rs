//! Waiter for out-of-band chassis power states.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info};

use swappr_common::power::{BmcPower, PowerState};

use crate::waiting::GroupWaiter;

/// Waits for every BMC host in the group to report the desired chassis
/// power state.
///
/// With `send_command`, the corresponding power transition is issued to
/// every member once before polling begins. A send failure against one
/// member is logged and does not keep the command from going to the rest;
/// the member that missed its command simply shows up in the failed set at
/// the deadline.
pub struct IpmiPowerStateWaiter {
    members: Vec<String>,
    power_state: PowerState,
    timeout: Duration,
    send_command: bool,
    bmc: Arc<dyn BmcPower>,
}

impl IpmiPowerStateWaiter {
    pub fn new(
        members: Vec<String>,
        power_state: PowerState,
        timeout: Duration,
        bmc: Arc<dyn BmcPower>,
        send_command: bool,
    ) -> Self {
        IpmiPowerStateWaiter {
            members,
            power_state,
            timeout,
            send_command,
            bmc,
        }
    }
}

#[async_trait]
impl GroupWaiter for IpmiPowerStateWaiter {
    type Member = String;

    fn members(&self) -> Vec<String> {
        self.members.clone()
    }

    fn condition_name(&self) -> String {
        format!("IPMI power {}", self.power_state)
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn pre_wait_action(&mut self) {
        if !self.send_command {
            return;
        }
        for member in &self.members {
            info!(
                "Sending IPMI power {} command to host {member}",
                self.power_state
            );
            if let Err(err) = self
                .bmc
                .chassis_power_transition(member, self.power_state)
                .await
            {
                error!(
                    "Failed to send power {} command to {member}: {err:#}",
                    self.power_state
                );
            }
        }
    }

    async fn member_has_completed(&mut self, member: &String) -> anyhow::Result<bool> {
        let status = self.bmc.chassis_power_status(member).await?;
        Ok(status.contains(self.power_state.as_str()))
    }
}
