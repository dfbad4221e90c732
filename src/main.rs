//! Indicator signal and strategy simulation CLI.

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use logging::setup_logging;
use std::path::Path;
use stockex_config::{load_config, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::ValidateConfig = cli.command {
        return cli::commands::validate::run(&cli.config).await;
    }

    let config = load_app_config(&cli.config)?;

    // Setup logging
    let log_level = match cli.log_level {
        Some(cli::LogLevel::Trace) => "trace",
        Some(cli::LogLevel::Debug) => "debug",
        Some(cli::LogLevel::Info) => "info",
        Some(cli::LogLevel::Warn) => "warn",
        Some(cli::LogLevel::Error) => "error",
        None => config.logging.level.as_str(),
    };
    let json = cli.json_logs || config.logging.format.eq_ignore_ascii_case("json");
    let _guard = setup_logging(log_level, json, config.logging.file.as_deref().map(Path::new))?;

    // Execute command
    match cli.command {
        Commands::Simulate(args) => cli::commands::simulate::run(args, &config).await,
        Commands::Signals(args) => cli::commands::signals::run(args, &config).await,
        Commands::Indicators(args) => cli::commands::indicators::run(args, &config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}

/// Load the configuration file, or defaults when it does not exist.
fn load_app_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    load_config(path).with_context(|| format!("Failed to load configuration from {:?}", path))
}
