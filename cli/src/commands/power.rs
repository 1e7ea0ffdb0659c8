//! The `swappr power` command: out-of-band power transitions with a
//! bounded convergence wait.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use swappr_clients::bmc::IpmiPower;
use swappr_common::config::Config;
use swappr_common::power::PowerState;
use swappr_common::{error, success};
use swappr_core::waiters::IpmiPowerStateWaiter;
use swappr_core::waiting::GroupWaiter;

use super::PowerTarget;

impl From<PowerTarget> for PowerState {
    fn from(target: PowerTarget) -> Self {
        match target {
            PowerTarget::On => PowerState::On,
            PowerTarget::Off => PowerState::Off,
        }
    }
}

pub async fn run(
    hosts: Vec<String>,
    state: PowerTarget,
    wait_only: bool,
    timeout: u64,
    cfg: &Config,
) -> ExitCode {
    let bmc = Arc::new(IpmiPower::new(
        cfg.bmc_username.clone(),
        cfg.bmc_password.clone(),
    ));

    let mut waiter = IpmiPowerStateWaiter::new(
        hosts,
        state.into(),
        Duration::from_secs(timeout),
        bmc,
        !wait_only,
    );

    let outcome = waiter.wait_for_completion().await;
    if outcome.succeeded() {
        success!("All hosts reached power {}", PowerState::from(state));
        ExitCode::SUCCESS
    } else {
        error!(
            "Hosts did not reach power {} within {timeout}s: {}",
            PowerState::from(state),
            outcome
                .failed
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
        ExitCode::FAILURE
    }
}
