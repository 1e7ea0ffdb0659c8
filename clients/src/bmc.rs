//! Out-of-band BMC power via a spawned `ipmitool`.
//!
//! This path works even when the in-band services are down, which is
//! exactly when it is needed. Hosts are addressed by their management
//! interface, `<host>-mgmt`.

use anyhow::bail;
use async_trait::async_trait;
use tokio::process::Command;

use swappr_common::power::{BmcPower, PowerState};

pub struct IpmiPower {
    username: String,
    password: String,
}

impl IpmiPower {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        IpmiPower {
            username: username.into(),
            password: password.into(),
        }
    }

    async fn run(&self, host: &str, subcommand: &[&str]) -> anyhow::Result<String> {
        let output = Command::new("ipmitool")
            .args(["-I", "lanplus", "-U", &self.username, "-P", &self.password])
            .args(["-H", &format!("{host}-mgmt")])
            .args(subcommand)
            .output()
            .await?;

        if !output.status.success() {
            bail!(
                "ipmitool exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl BmcPower for IpmiPower {
    async fn chassis_power_status(&self, host: &str) -> anyhow::Result<String> {
        self.run(host, &["chassis", "power", "status"]).await
    }

    async fn chassis_power_transition(
        &self,
        host: &str,
        state: PowerState,
    ) -> anyhow::Result<()> {
        self.run(host, &["chassis", "power", state.as_str()]).await?;
        Ok(())
    }
}
