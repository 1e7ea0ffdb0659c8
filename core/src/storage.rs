//! # Storage Service Restart
//!
//! Restarts the distributed storage daemons across the storage hosts, one
//! host at a time, then waits for the cluster to report healthy again.
//!
//! The restart pass is strictly fail-fast: the first host that cannot be
//! reached or whose restart command fails aborts the remaining hosts. A
//! storage cluster in an unknown state is worse than one with a restart
//! pass left unstarted.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use swappr_common::info;
use swappr_common::remote::RemoteShell;

use crate::error::{StageError, SwapError};
use crate::stage::{Procedure, stage};
use crate::waiters::StorageHealthWaiter;
use crate::waiting::GroupWaiter;

/// Service units restarted on every storage host, in order.
pub const STORAGE_SERVICES: [&str; 3] =
    ["ceph-mon.target", "ceph-mgr.target", "ceph-mds.target"];

/// How long the cluster gets to report healthy after the restart pass.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(600);

/// Exit status ssh uses for its own failures, as opposed to the command's.
const SSH_FAILURE_STATUS: i32 = 255;

/// Restarts every storage service on every host, strictly in order,
/// aborting on the first failure.
pub async fn restart_storage_services(
    shell: &dyn RemoteShell,
    hosts: &[String],
) -> Result<(), SwapError> {
    for host in hosts {
        for service in STORAGE_SERVICES {
            let command = format!("systemctl restart {service}");
            info!("Restarting {service} on {host}");

            let output = shell.exec(host, &command).await.map_err(|err| {
                SwapError::new(format!(
                    "Command \"{command}\" failed. Host: {host}. Error: {err:#}"
                ))
            })?;

            if output.status == SSH_FAILURE_STATUS {
                return Err(SwapError::new(format!(
                    "Connecting to {host} failed. Error: {}",
                    output.stderr.trim()
                )));
            }
            if !output.success() {
                return Err(SwapError::new(format!(
                    "Command \"{command}\" failed. Host: {host}. Stderr: {}",
                    output.stderr.trim()
                )));
            }
        }
    }
    Ok(())
}

/// The full restart flow: the fail-fast restart pass, then a bounded wait
/// for cluster health, probed through the first host.
pub struct RestartStorageProcedure {
    hosts: Vec<String>,
    shell: Arc<dyn RemoteShell>,
}

impl RestartStorageProcedure {
    pub fn new(hosts: Vec<String>, shell: Arc<dyn RemoteShell>) -> Self {
        RestartStorageProcedure { hosts, shell }
    }

    async fn restart_services(&self) -> Result<(), StageError> {
        if self.hosts.is_empty() {
            return Err(SwapError::new("No storage hosts were given").into());
        }
        restart_storage_services(self.shell.as_ref(), &self.hosts).await?;
        Ok(())
    }

    async fn wait_for_health(&self) -> Result<(), StageError> {
        let admin_host = self.hosts[0].clone();
        let mut waiter =
            StorageHealthWaiter::new(admin_host, HEALTH_TIMEOUT, self.shell.clone());
        if !waiter.wait_for_completion().await.succeeded() {
            return Err(SwapError::new(format!(
                "Storage cluster did not report healthy within {}s",
                HEALTH_TIMEOUT.as_secs()
            ))
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl Procedure for RestartStorageProcedure {
    fn title(&self) -> &'static str {
        "Storage service restart"
    }

    async fn procedure(&mut self) -> Result<(), SwapError> {
        stage("Restart the storage services", self.restart_services()).await?;
        stage(
            "Wait for the storage cluster to report healthy",
            self.wait_for_health(),
        )
        .await?;
        Ok(())
    }
}
