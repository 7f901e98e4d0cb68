//! docflow - document collaboration service
//!
//! Loads configuration (file, then environment), installs logging and runs
//! the HTTP server until Ctrl+C or SIGTERM.

#![allow(missing_docs)]

use anyhow::Context;
use clap::Parser;
use docflow::Config;
use docflow::server;
use docflow::utils::logging::init_logging;
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_CONFIG_PATH: &str = "config/docflow.yaml";

#[derive(Debug, Parser)]
#[command(name = "docflow", version, about = "Document collaboration service")]
struct Cli {
    /// YAML configuration file; without one, DOCFLOW_* variables are used
    #[arg(short, long, env = "DOCFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

async fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let path = cli
        .config
        .clone()
        .or_else(|| Some(PathBuf::from(DEFAULT_CONFIG_PATH)).filter(|p| p.exists()));

    let mut config = match path {
        Some(path) => Config::from_file(&path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::from_env().context("reading DOCFLOW_* environment")?,
    };

    if let Some(host) = &cli.host {
        config.app.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.app.server.port = port;
    }
    config.validate().context("invalid configuration")?;

    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli).await?;
    init_logging(config.logging())?;
    server::run_server(config).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
