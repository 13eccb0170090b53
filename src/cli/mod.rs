//! Command-line interface.

use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TaskLift personal task, project and note manager
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Address to bind (overrides config)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start the web server (default if no subcommand given)
    Serve,

    /// Delete expired sessions and exit
    PurgeSessions,
}

impl Cli {
    /// The subcommand to run, defaulting to `serve`.
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }

    /// Apply command-line overrides on top of loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(ref db) = self.database {
            config.server.db_path = PathBuf::from(db);
        }
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::parse_from(["tasklift"]);
        assert_eq!(cli.command(), Command::Serve);
        assert_eq!(cli.log, "2");
    }

    #[test]
    fn overrides_replace_config_values() {
        let cli = Cli::parse_from([
            "tasklift",
            "--database",
            "/tmp/x.db",
            "--port",
            "6000",
            "purge-sessions",
        ]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(cli.command(), Command::PurgeSessions);
        assert_eq!(config.server.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.server.port, 6000);
        assert_eq!(config.server.host, "127.0.0.1");
    }
}
