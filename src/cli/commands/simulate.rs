//! Simulate command implementation.

use anyhow::{Context, Result};
use stockex_backtest::{SimulationConfig, SimulationEngine};
use stockex_config::AppConfig;
use stockex_indicators::IndicatorRegistry;
use tracing::info;

use super::{instrument_codes, load_store, resolve_instruments};
use crate::cli::{OutputFormat, SimulateArgs};

pub async fn run(args: SimulateArgs, config: &AppConfig) -> Result<()> {
    info!("Starting simulation for strategy: {}", args.strategy);

    let strategy = config
        .strategy(&args.strategy)
        .context("Failed to load strategy")?;
    strategy
        .validate(&IndicatorRegistry::new())
        .context("Invalid strategy")?;

    let store = load_store(&args.data, config).await?;
    let instruments = resolve_instruments(&store, &args.data.instruments).await?;

    let mut sim_config = SimulationConfig::new(
        args.start,
        args.end,
        args.budget.unwrap_or(config.simulation.default_budget),
    )
    .with_instruments(instruments);
    if let Some(limit) = args.transaction_limit.or(config.simulation.transaction_limit) {
        sim_config = sim_config.with_transaction_limit(limit);
    }

    let engine = SimulationEngine::new(store.clone(), store.clone())
        .with_concurrency(config.simulation.max_concurrent_instruments);
    let result = engine
        .run(&sim_config, &strategy)
        .await
        .context("Simulation failed")?;

    // Output results
    match args.output {
        OutputFormat::Json => println!("{}", result.to_json()?),
        OutputFormat::Csv => print!("{}", result.transactions_to_csv()),
        OutputFormat::Text => {
            println!("{}", result.summary());

            let codes = instrument_codes(&store).await?;
            if !result.current_holdings.is_empty() {
                println!("Open positions:");
                for (id, quantity) in &result.current_holdings {
                    let code = codes.get(id).map(String::as_str).unwrap_or("?");
                    println!("  {:<10} {}", code, quantity);
                }
            }
        }
    }

    // Save if requested
    if let Some(save_path) = &args.save {
        let json = result.to_json()?;
        std::fs::write(save_path, json)?;
        info!("Results saved to {:?}", save_path);
    }

    Ok(())
}
