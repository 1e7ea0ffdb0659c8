//! Remote command execution via a spawned `ssh` in batch mode.

use async_trait::async_trait;
use tokio::process::Command;

use swappr_common::remote::{ExecOutput, RemoteShell};

pub struct SshShell {
    user: String,
}

impl SshShell {
    pub fn new(user: impl Into<String>) -> Self {
        SshShell { user: user.into() }
    }
}

#[async_trait]
impl RemoteShell for SshShell {
    async fn exec(&self, host: &str, command: &str) -> anyhow::Result<ExecOutput> {
        let output = Command::new("ssh")
            .args(["-o", "BatchMode=yes"])
            .args(["-o", "StrictHostKeyChecking=accept-new"])
            .arg(format!("{}@{host}", self.user))
            .arg(command)
            .output()
            .await?;

        Ok(ExecOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            // A killed ssh has no exit code; report it as a failure status.
            status: output.status.code().unwrap_or(-1),
        })
    }
}
