pub mod blade;
pub mod power;
pub mod storage;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "swappr")]
#[command(about = "Administers blade swaps and dependent cluster services.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PowerTarget {
    On,
    Off,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BladeAction {
    /// Bring an inserted blade back into service
    Enable,
    /// Prepare a blade for physical removal
    Disable,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Swap a compute blade out of, or back into, the cluster
    #[command(alias = "b")]
    Blade {
        /// The slot holding the blade, e.g. x1000c0s1
        xname: String,
        #[arg(long, value_enum)]
        action: BladeAction,
        /// File the IP/MAC mapping is written to on removal and read
        /// from on insertion
        #[arg(long, default_value = "ethernet-interface-mappings.json")]
        src_mapping: PathBuf,
        /// Pre-captured destination mapping; queried fresh when omitted
        #[arg(long)]
        dst_mapping: Option<PathBuf>,
    },
    /// Transition hosts out of band and wait for the power state to settle
    #[command(alias = "p")]
    Power {
        /// BMC hosts to drive, addressed as <host>-mgmt
        #[arg(long, value_delimiter = ',', required = true)]
        hosts: Vec<String>,
        #[arg(long, value_enum)]
        state: PowerTarget,
        /// Only wait for the state; do not send the transition command
        #[arg(long)]
        wait_only: bool,
        /// Seconds to wait for every host to reach the state
        #[arg(long, default_value_t = 600)]
        timeout: u64,
    },
    /// Restart the storage services and wait for the cluster to recover
    #[command(alias = "rs")]
    RestartStorage {
        /// Storage hosts in restart order; the first doubles as the
        /// admin host for health checks
        #[arg(long, value_delimiter = ',', required = true)]
        hosts: Vec<String>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
