//! Indicators command implementation.

use anyhow::{Context, Result};
use stockex_config::AppConfig;
use stockex_core::types::{IndicatorReading, ParameterizedIndicator};
use stockex_indicators::{IndicatorInfo, IndicatorRegistry};
use stockex_strategies::compute_indicator_values;

use super::{instrument_codes, load_store, resolve_instruments};
use crate::cli::IndicatorsArgs;

pub async fn run(args: IndicatorsArgs, config: &AppConfig) -> Result<()> {
    let registry = IndicatorRegistry::new();

    let Some(name) = &args.name else {
        println!("Available Indicators");
        println!("═══════════════════════════════════════════════════════════");
        println!();
        for info in registry.list() {
            print_info(info);
        }
        println!("Use `indicators <name> --compute` to compute values.");
        return Ok(());
    };

    let indicator_type = registry.from_name(name)?;
    if !args.compute {
        if let Some(info) = registry.get(indicator_type) {
            print_info(info);
        }
        return Ok(());
    }

    let mut parameterized = ParameterizedIndicator::new(indicator_type);
    for param in &args.params {
        let (key, value) = param
            .split_once('=')
            .with_context(|| format!("Parameter '{}' must look like Name=Value", param))?;
        let value: i64 = value
            .trim()
            .parse()
            .with_context(|| format!("Parameter '{}' needs an integer value", key))?;
        parameterized = parameterized.with_property(key.trim(), value);
    }
    let indicator = registry
        .create(&parameterized)
        .context("Failed to create indicator")?;

    let store = load_store(&args.data, config).await?;
    let instruments = resolve_instruments(&store, &args.data.instruments).await?;
    let codes = instrument_codes(&store).await?;

    let results = compute_indicator_values(store.as_ref(), indicator.as_ref(), &instruments).await?;
    for result in &results {
        let code = codes
            .get(&result.instrument_id)
            .cloned()
            .unwrap_or_else(|| result.instrument_id.to_string());
        println!("{} {}", code, result.indicator_type);
        println!("───────────────────────────────────────────────────────");

        let skip = result.values.len().saturating_sub(args.last);
        for value in &result.values[skip..] {
            match value.reading {
                IndicatorReading::Single(v) => println!("  {}  {:>12.4}", value.date, v),
                IndicatorReading::Dual { value: v, second_line } => {
                    println!("  {}  {:>12.4}  {:>12.4}", value.date, v, second_line)
                }
            }
        }
        println!();
    }

    Ok(())
}

fn print_info(info: &IndicatorInfo) {
    println!("  {} ", info.name);
    println!("  ───────────────────────────────────────────────────────");
    println!("  {}", info.description);
    for param in info.parameters {
        println!(
            "    {:<12} default {:<4} range {}..={}",
            param.name, param.default, param.min, param.max
        );
    }
    println!();
}
