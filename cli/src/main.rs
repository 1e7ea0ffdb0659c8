mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, blade, power, storage};
use swappr_common::config::Config;
use terminal::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init();
    let cfg = Config::from_env();

    match commands.command {
        Commands::Blade {
            xname,
            action,
            src_mapping,
            dst_mapping,
        } => blade::run(&xname, action, src_mapping, dst_mapping, &cfg).await,
        Commands::Power {
            hosts,
            state,
            wait_only,
            timeout,
        } => power::run(hosts, state, wait_only, timeout, &cfg).await,
        Commands::RestartStorage { hosts } => storage::run(hosts, &cfg).await,
    }
}
