//! TaskLift server binary.

use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Arc;
use tasklift::cli::{Cli, Command};
use tasklift::config::{Config, ConfigLoader, ConfigPaths};
use tasklift::db::Database;
use tasklift::web::{AppState, start_server};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {}
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

/// Load tiered config; `--config` takes the place of `TASKLIFT_CONFIG_PATH`.
fn load_config(cli: &Cli) -> Result<Config> {
    let explicit = cli.config.clone();
    let loader = ConfigLoader::load_with(ConfigPaths::discover(), |key| {
        if key == "TASKLIFT_CONFIG_PATH" && explicit.is_some() {
            return explicit.clone();
        }
        std::env::var(key).ok()
    })?;
    if let Some(path) = loader.config_path() {
        info!("Using config file {}", path.display());
    }

    let mut config = loader.into_config();
    cli.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

fn open_database(config: &Config) -> Result<Arc<Database>> {
    config.ensure_db_dir()?;
    let db = Database::open(&config.server.db_path)?;
    info!("Database ready at {}", config.server.db_path.display());
    Ok(Arc::new(db))
}

async fn run_server(config: Config) -> Result<()> {
    let db = open_database(&config)?;
    let state = AppState::new(db, &config);
    if let Err(e) = state.auth().purge_expired() {
        warn!("Could not purge expired sessions: {}", e);
    }

    let handle = start_server(state, &config.server.host, config.server.port).await?;
    tokio::signal::ctrl_c().await?;
    info!("Interrupt received");
    handle.shutdown().await;
    Ok(())
}

fn purge_sessions(config: Config) -> Result<()> {
    let db = open_database(&config)?;
    let state = AppState::new(db, &config);
    let removed = state.auth().purge_expired()?;
    println!("Removed {} expired session(s)", removed);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    let config = load_config(&cli)?;

    match cli.command() {
        Command::Serve => run_server(config).await?,
        Command::PurgeSessions => purge_sessions(config)?,
    }
    Ok(())
}
