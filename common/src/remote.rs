//! # Remote Shell Contract
//!
//! Command execution on managed hosts over a secure shell.

use async_trait::async_trait;

/// The result of a remote command that actually ran.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: i32,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

#[async_trait]
pub trait RemoteShell: Send + Sync {
    /// Run `command` on `host`, returning its output and exit status.
    ///
    /// An `Err` means the command could not be run at all (session setup or
    /// transport failure); a command that ran and failed comes back as
    /// `Ok` with a non-zero status.
    async fn exec(&self, host: &str, command: &str) -> anyhow::Result<ExecOutput>;
}
