//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, Combination, DataSettings, LoggingConfig, SimulationSettings,
    StrategySettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// Environment variables use the `STOCKEX` prefix with `__` between
/// levels, e.g. `STOCKEX__SIMULATION__DEFAULT_BUDGET=5000`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("STOCKEX")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use rust_decimal_macros::dec;
    use stockex_core::error::StockexError;
    use stockex_core::types::IndicatorType;
    use stockex_strategies::CombinationMode;

    const SAMPLE: &str = r#"
[app]
name = "stockex"
environment = "test"

[simulation]
default_budget = 5000
transaction_limit = 1500
max_concurrent_instruments = 8

[[strategies]]
name = "Trend"
combination = "and"
days_limit_to_and = 3

[[strategies.indicators]]
type = "atr"
properties = [{ name = "Term", value = 10 }]

[[strategies.indicators]]
type = "macd"

[[strategies]]
name = "broken"
combination = "and"
"#;

    fn parse(source: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("");
        assert_eq!(config.app.name, "stockex");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.data.directory, "data");
        assert_eq!(config.simulation.default_budget, dec!(10000));
        assert_eq!(config.simulation.max_concurrent_instruments, 4);
        assert!(config.strategies.is_empty());
    }

    #[test]
    fn test_strategy_definition() {
        let config = parse(SAMPLE);
        assert_eq!(config.simulation.default_budget, dec!(5000));
        assert_eq!(config.simulation.transaction_limit, Some(dec!(1500)));
        assert_eq!(config.strategy_names(), vec!["Trend", "broken"]);

        let strategy = config.strategy("trend").unwrap();
        assert_eq!(strategy.mode, CombinationMode::And { days_limit: 3 });
        assert_eq!(strategy.indicators.len(), 2);
        assert_eq!(strategy.indicators[0].indicator_type, IndicatorType::Atr);
        assert_eq!(strategy.indicators[0].properties[0].value, 10);
        assert!(strategy.indicators[1].properties.is_empty());
    }

    #[test]
    fn test_invalid_strategies() {
        let config = parse(SAMPLE);
        // AND without a window
        assert!(matches!(
            config.strategy("broken"),
            Err(StockexError::Validation(_))
        ));
        assert!(matches!(
            config.strategy("missing"),
            Err(StockexError::Config(_))
        ));
    }

    #[test]
    fn test_toml_output_round_trips() {
        let config = parse(SAMPLE);
        let rendered = config.to_toml().unwrap();
        let reparsed = parse(&rendered);

        assert_eq!(reparsed.strategies.len(), 2);
        assert_eq!(reparsed.simulation.transaction_limit, Some(dec!(1500)));
    }
}
