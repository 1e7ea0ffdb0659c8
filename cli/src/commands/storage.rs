//! The `swappr restart-storage` command.

use std::process::ExitCode;
use std::sync::Arc;

use swappr_clients::shell::SshShell;
use swappr_common::config::Config;
use swappr_core::stage::Procedure;
use swappr_core::storage::RestartStorageProcedure;

use crate::terminal::spinner;

pub async fn run(hosts: Vec<String>, cfg: &Config) -> ExitCode {
    let shell = Arc::new(SshShell::new(cfg.ssh_user.clone()));

    let spinner = spinner::start("restarting storage services");
    let code = RestartStorageProcedure::new(hosts, shell).run().await;
    spinner.finish_and_clear();

    code
}
