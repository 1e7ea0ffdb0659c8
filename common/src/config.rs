//! Runtime configuration for the cluster services swappr drives.

use std::env;

/// Endpoints and credentials, assembled by the binary and passed down.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hardware inventory service.
    pub inventory_url: String,
    /// Base URL of the power-control service.
    pub power_url: String,
    /// Base URL of the cluster orchestration API.
    pub kube_url: String,
    /// Base URL of the DHCP server's control agent.
    pub kea_url: String,
    /// Credentials for out-of-band BMC power commands.
    pub bmc_username: String,
    pub bmc_password: String,
    /// User for SSH sessions to managed hosts.
    pub ssh_user: String,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Builds a config from `SWAPPR_*` environment variables, falling back
    /// to the in-cluster service addresses.
    pub fn from_env() -> Self {
        Config {
            inventory_url: env_or(
                "SWAPPR_INVENTORY_URL",
                "https://api.cluster.local/inventory/v2",
            ),
            power_url: env_or("SWAPPR_POWER_URL", "https://api.cluster.local/power/v1"),
            kube_url: env_or("SWAPPR_KUBE_URL", "https://kubernetes.default.svc"),
            kea_url: env_or("SWAPPR_KEA_URL", "https://api.cluster.local/dhcp-kea"),
            bmc_username: env_or("SWAPPR_BMC_USERNAME", "root"),
            bmc_password: env_or("SWAPPR_BMC_PASSWORD", ""),
            ssh_user: env_or("SWAPPR_SSH_USER", "root"),
        }
    }
}
