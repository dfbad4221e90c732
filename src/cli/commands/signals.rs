//! Signals command implementation.

use anyhow::{Context, Result};
use chrono::Days;
use stockex_config::AppConfig;
use stockex_core::types::{InstrumentId, SignalEvent};
use stockex_strategies::SignalAggregator;
use std::collections::{BTreeSet, HashMap};

use super::{instrument_codes, load_store, resolve_instruments};
use crate::cli::SignalsArgs;

pub async fn run(args: SignalsArgs, config: &AppConfig) -> Result<()> {
    let strategy = config
        .strategy(&args.strategy)
        .context("Failed to load strategy")?;

    let store = load_store(&args.data, config).await?;
    let instruments = resolve_instruments(&store, &args.data.instruments).await?;

    let aggregator = SignalAggregator::new(store.clone())
        .with_concurrency(config.simulation.max_concurrent_instruments);

    let (start, end, events) = match args.on {
        Some(date) => {
            let event = aggregator
                .signals_on(date, &instruments, &strategy.indicators, strategy.mode)
                .await
                .context("Failed to generate signals")?;
            (date, date, event.into_iter().collect::<Vec<_>>())
        }
        None => {
            let latest = store.date_range().map(|(_, last)| last);
            let end = args.end.or(latest).context("No price data loaded")?;
            let start = match args.start {
                Some(start) => start,
                None => end
                    .checked_sub_days(Days::new(args.days))
                    .context("Lookback reaches before the earliest supported date")?,
            };
            let events = aggregator
                .get_strategy_signals(start, end, &instruments, &strategy)
                .await
                .context("Failed to generate signals")?;
            (start, end, events)
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    println!(
        "Signals for '{}' ({}) from {} to {}",
        strategy.name, strategy.mode, start, end
    );
    println!("═══════════════════════════════════════════════════════════");

    if events.is_empty() {
        println!("  No signals.");
        return Ok(());
    }

    let codes = instrument_codes(&store).await?;
    for event in &events {
        print_event(event, &codes);
    }

    Ok(())
}

fn print_event(event: &SignalEvent, codes: &HashMap<InstrumentId, String>) {
    let names = |ids: &BTreeSet<InstrumentId>| {
        ids.iter()
            .map(|id| codes.get(id).cloned().unwrap_or_else(|| id.to_string()))
            .collect::<Vec<_>>()
            .join(", ")
    };

    println!("  {}", event.date);
    if !event.to_buy.is_empty() {
        println!("    BUY:  {}", names(&event.to_buy));
    }
    if !event.to_sell.is_empty() {
        println!("    SELL: {}", names(&event.to_sell));
    }
}
