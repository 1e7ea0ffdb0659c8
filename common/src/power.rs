//! # Power Control Contracts
//!
//! Two independent power paths exist: the in-band power-control service,
//! which understands xnames and hierarchy, and the out-of-band IPMI path,
//! which talks straight to a BMC host and works even when the in-band
//! services are down.

use std::fmt;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::xname::XName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    /// The token the power tools use, and the substring expected in a
    /// chassis power status line.
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerState::On => "on",
            PowerState::Off => "off",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The in-band power-control service.
#[async_trait]
pub trait PowerControl: Send + Sync {
    /// Set the power state of the given components; `recursive` extends the
    /// transition to all descendants.
    async fn set_power_state(
        &self,
        xnames: &[XName],
        state: PowerState,
        recursive: bool,
    ) -> Result<(), ApiError>;
}

/// Out-of-band chassis power, one BMC host at a time.
///
/// Probe-path methods return `anyhow::Result` because callers (waiters)
/// swallow individual failures rather than classify them.
#[async_trait]
pub trait BmcPower: Send + Sync {
    /// The raw textual chassis power status, e.g. `Chassis Power is on`.
    async fn chassis_power_status(&self, host: &str) -> anyhow::Result<String>;

    /// Issue a chassis power transition command.
    async fn chassis_power_transition(&self, host: &str, state: PowerState)
    -> anyhow::Result<()>;
}
