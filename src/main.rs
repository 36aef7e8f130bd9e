//! TriggerGate - token-authorized remote triggers for a job queue.
//!
//! Main entry point for the TriggerGate CLI and server.

mod check;
mod cli;
mod jobs;
mod server;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::server::{init_tracing, load_config, run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Check) => check::run_check(&config),
        Some(Commands::Run { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            init_tracing(&config.logging)?;
            run_server(config).await
        }
        None => {
            init_tracing(&config.logging)?;
            run_server(config).await
        }
    }
}
