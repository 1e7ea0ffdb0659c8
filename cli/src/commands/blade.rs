//! The `swappr blade` command: wires the real collaborator clients into the
//! swap procedures.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::error;

use swappr_clients::dhcp::KeaDhcp;
use swappr_clients::inventory::InventoryClient;
use swappr_clients::kube::KubeClient;
use swappr_clients::power::PowerClient;
use swappr_common::config::Config;
use swappr_common::xname::XName;
use swappr_core::blade::{BladeServices, SwapInProcedure, SwapOutProcedure};
use swappr_core::stage::Procedure;

use super::BladeAction;
use crate::terminal::prompt::TerminalPrompter;

const SERVICE_ACCOUNT_TOKEN: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";

fn service_account_token() -> Option<String> {
    fs::read_to_string(SERVICE_ACCOUNT_TOKEN)
        .ok()
        .map(|token| token.trim().to_string())
}

pub async fn run(
    xname: &str,
    action: BladeAction,
    src_mapping: PathBuf,
    dst_mapping: Option<PathBuf>,
    cfg: &Config,
) -> ExitCode {
    let xname: XName = match xname.parse() {
        Ok(xname) => xname,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let kube = Arc::new(KubeClient::new(&cfg.kube_url, service_account_token()));
    let services = BladeServices {
        inventory: Arc::new(InventoryClient::new(&cfg.inventory_url)),
        power: Arc::new(PowerClient::new(&cfg.power_url)),
        schedule: kube.clone(),
        pods: kube,
        dhcp: Arc::new(KeaDhcp::new(&cfg.kea_url)),
        prompter: Arc::new(TerminalPrompter),
    };

    match action {
        BladeAction::Disable => {
            SwapOutProcedure::new(xname, src_mapping, services).run().await
        }
        BladeAction::Enable => {
            SwapInProcedure::new(xname, src_mapping, dst_mapping, services)
                .run()
                .await
        }
    }
}
