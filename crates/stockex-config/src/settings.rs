//! Configuration structures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockex_core::error::{StockexError, StockexResult};
use stockex_core::types::ParameterizedIndicator;
use stockex_strategies::{CombinationMode, StrategyDefinition, DEFAULT_MAX_CONCURRENT_INSTRUMENTS};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub strategies: Vec<StrategySettings>,
}

impl AppConfig {
    /// Build the strategy definition with the given name (case-insensitive).
    pub fn strategy(&self, name: &str) -> StockexResult<StrategyDefinition> {
        let settings = self
            .strategies
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| StockexError::Config(format!("unknown strategy '{}'", name)))?;
        settings.to_definition()
    }

    /// Names of all configured strategies.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name.as_str()).collect()
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> StockexResult<String> {
        toml::to_string_pretty(self).map_err(|e| StockexError::Config(e.to_string()))
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "stockex".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Price data location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    /// Directory of per-instrument CSV files
    pub directory: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            directory: "data".to_string(),
        }
    }
}

/// Simulation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    pub default_budget: Decimal,
    #[serde(default)]
    pub transaction_limit: Option<Decimal>,
    pub max_concurrent_instruments: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        use rust_decimal_macros::dec;
        Self {
            default_budget: dec!(10000),
            transaction_limit: None,
            max_concurrent_instruments: DEFAULT_MAX_CONCURRENT_INSTRUMENTS,
        }
    }
}

/// How a configured strategy combines its indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combination {
    #[default]
    Or,
    And,
}

/// A configured strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySettings {
    pub name: String,
    #[serde(default)]
    pub combination: Combination,
    /// Agreement window in days for AND combination
    #[serde(default)]
    pub days_limit_to_and: u32,
    #[serde(default)]
    pub indicators: Vec<ParameterizedIndicator>,
}

impl StrategySettings {
    /// Convert to a strategy definition, validating the combination mode.
    pub fn to_definition(&self) -> StockexResult<StrategyDefinition> {
        let mode = match self.combination {
            Combination::Or => CombinationMode::Or,
            Combination::And => CombinationMode::And {
                days_limit: self.days_limit_to_and,
            },
        };
        mode.validate()?;

        Ok(StrategyDefinition {
            name: self.name.clone(),
            indicators: self.indicators.clone(),
            mode,
        })
    }
}
