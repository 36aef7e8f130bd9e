//! CLI definitions for TriggerGate.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// TriggerGate CLI.
#[derive(Parser)]
#[command(name = "triggergate")]
#[command(about = "Token-authorized remote trigger gateway")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "TRIGGERGATE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the server in foreground (default)
    Run {
        /// Override the configured host
        #[arg(long)]
        host: Option<String>,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate the configuration and print the job table
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["triggergate"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_run_overrides() {
        let cli = Cli::try_parse_from([
            "triggergate",
            "run",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--config",
            "/etc/triggergate.toml",
        ])
        .unwrap();
        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("/etc/triggergate.toml"))
        );
        match cli.command {
            Some(Commands::Run { host, port }) => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["triggergate", "check"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Check)));
    }
}
