//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use stockex_config::load_config;
use stockex_indicators::IndicatorRegistry;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    let registry = IndicatorRegistry::new();
    let mut invalid = 0;
    for settings in &config.strategies {
        let checked = settings
            .to_definition()
            .and_then(|strategy| strategy.validate(&registry));
        if let Err(e) = checked {
            println!("Strategy '{}': {}", settings.name, e);
            invalid += 1;
        }
    }
    if invalid > 0 {
        anyhow::bail!("{} invalid strategies", invalid);
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Data directory: {}", config.data.directory);
    println!("Default budget: {}", config.simulation.default_budget);
    println!("Strategies: {}", config.strategy_names().join(", "));
    println!();
    println!("Effective configuration:");
    println!("{}", config.to_toml()?);

    Ok(())
}
