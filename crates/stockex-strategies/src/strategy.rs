//! Strategy definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use stockex_core::error::{StockexError, StockexResult};
use stockex_core::types::ParameterizedIndicator;
use stockex_indicators::IndicatorRegistry;

/// How signals from several indicators are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CombinationMode {
    /// Any indicator's signal counts
    #[default]
    Or,
    /// Every indicator must agree within a trailing window of `days_limit` days
    And { days_limit: u32 },
}

impl CombinationMode {
    /// Check the mode is usable.
    pub fn validate(&self) -> StockexResult<()> {
        match self {
            CombinationMode::And { days_limit: 0 } => Err(StockexError::Validation(
                "AND combination needs a window of at least one day".into(),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for CombinationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombinationMode::Or => write!(f, "OR"),
            CombinationMode::And { days_limit } => write!(f, "AND ({} days)", days_limit),
        }
    }
}

/// A named set of parameterized indicators and how to combine them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDefinition {
    pub name: String,
    pub indicators: Vec<ParameterizedIndicator>,
    #[serde(default)]
    pub mode: CombinationMode,
}

impl StrategyDefinition {
    /// Create a strategy without indicators.
    pub fn new(name: impl Into<String>, mode: CombinationMode) -> Self {
        Self {
            name: name.into(),
            indicators: Vec::new(),
            mode,
        }
    }

    /// Add an indicator.
    pub fn with_indicator(mut self, indicator: ParameterizedIndicator) -> Self {
        self.indicators.push(indicator);
        self
    }

    /// Validate the combination mode and that every indicator can be built.
    pub fn validate(&self, registry: &IndicatorRegistry) -> StockexResult<()> {
        if self.indicators.is_empty() {
            return Err(StockexError::Validation(format!(
                "strategy '{}' has no indicators",
                self.name
            )));
        }
        self.mode.validate()?;
        for indicator in &self.indicators {
            registry.create(indicator)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockex_core::types::IndicatorType;

    #[test]
    fn test_mode_validation() {
        assert!(CombinationMode::Or.validate().is_ok());
        assert!(CombinationMode::And { days_limit: 1 }.validate().is_ok());
        assert!(matches!(
            CombinationMode::And { days_limit: 0 }.validate(),
            Err(StockexError::Validation(_))
        ));
        assert_eq!(CombinationMode::And { days_limit: 3 }.to_string(), "AND (3 days)");
    }

    #[test]
    fn test_strategy_validation() {
        let registry = IndicatorRegistry::new();

        let empty = StrategyDefinition::new("empty", CombinationMode::Or);
        assert!(empty.validate(&registry).is_err());

        let valid = StrategyDefinition::new("trend", CombinationMode::And { days_limit: 5 })
            .with_indicator(ParameterizedIndicator::new(IndicatorType::Atr))
            .with_indicator(ParameterizedIndicator::new(IndicatorType::Macd));
        assert!(valid.validate(&registry).is_ok());

        let invalid = StrategyDefinition::new("bad", CombinationMode::Or).with_indicator(
            ParameterizedIndicator::new(IndicatorType::Atr).with_property("Term", 0),
        );
        assert!(matches!(
            invalid.validate(&registry),
            Err(StockexError::Indicator(_))
        ));
    }
}
