use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "messx", about = "Terminal group chat over a shared message store")]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the store credentials JSON (overrides [store] credentials)
    #[arg(long, global = true)]
    pub credentials: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start the chat client
    Run,
    /// Host a shared in-memory store for remote clients
    Serve {
        /// Listen address (default: [server] bind from config)
        #[arg(long)]
        bind: Option<String>,
    },
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn defaults_to_run_when_command_is_missing() {
        let cli = Cli::parse_from(["messx"]);

        assert!(matches!(cli.command_or_default(), Command::Run));
    }

    #[test]
    fn parses_explicit_run_command_with_paths() {
        let cli = Cli::parse_from([
            "messx",
            "run",
            "--config",
            "custom.toml",
            "--credentials",
            "creds.json",
        ]);

        assert!(matches!(cli.command_or_default(), Command::Run));
        assert_eq!(
            cli.config
                .as_deref()
                .map(|p| p.to_string_lossy().to_string()),
            Some("custom.toml".to_owned())
        );
        assert_eq!(
            cli.credentials
                .as_deref()
                .map(|p| p.to_string_lossy().to_string()),
            Some("creds.json".to_owned())
        );
    }

    #[test]
    fn parses_serve_with_bind_override() {
        let cli = Cli::parse_from(["messx", "serve", "--bind", "127.0.0.1:7000"]);

        match cli.command_or_default() {
            Command::Serve { bind } => assert_eq!(bind.as_deref(), Some("127.0.0.1:7000")),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
