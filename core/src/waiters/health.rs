//! Waiter for the distributed storage cluster to report healthy.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use swappr_common::remote::RemoteShell;

use crate::waiting::GroupWaiter;

/// Command reporting cluster status as JSON on the storage admin host.
const STATUS_COMMAND: &str = "ceph -s --format=json";
/// The only status value accepted as converged.
const HEALTH_OK: &str = "HEALTH_OK";

/// Waits for the storage cluster, probed through one admin host, to report
/// fully healthy.
///
/// The probe never fails the wait: an unreachable host, a failing command,
/// malformed JSON, or an unexpected payload shape all just mean "not
/// healthy yet".
pub struct StorageHealthWaiter {
    host: String,
    timeout: Duration,
    shell: Arc<dyn RemoteShell>,
}

impl StorageHealthWaiter {
    pub fn new(host: String, timeout: Duration, shell: Arc<dyn RemoteShell>) -> Self {
        StorageHealthWaiter {
            host,
            timeout,
            shell,
        }
    }
}

#[async_trait]
impl GroupWaiter for StorageHealthWaiter {
    type Member = String;

    fn members(&self) -> Vec<String> {
        vec![self.host.clone()]
    }

    fn condition_name(&self) -> String {
        format!("storage cluster health {HEALTH_OK}")
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(5)
    }

    async fn member_has_completed(&mut self, member: &String) -> anyhow::Result<bool> {
        let output = match self.shell.exec(member, STATUS_COMMAND).await {
            Ok(output) => output,
            Err(err) => {
                debug!("Could not reach {member} for a status check: {err:#}");
                return Ok(false);
            }
        };
        if !output.success() {
            debug!(
                "Status command exited with {} on {member}: {}",
                output.status,
                output.stderr.trim()
            );
            return Ok(false);
        }

        let payload: serde_json::Value = match serde_json::from_str(&output.stdout) {
            Ok(payload) => payload,
            Err(err) => {
                debug!("Unparseable status payload from {member}: {err}");
                return Ok(false);
            }
        };

        let status = payload
            .get("health")
            .and_then(|health| health.get("status"))
            .and_then(|status| status.as_str());
        Ok(status == Some(HEALTH_OK))
    }
}
