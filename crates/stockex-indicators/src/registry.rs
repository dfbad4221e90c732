//! Indicator registry for building configured indicators.

use serde::Serialize;
use std::collections::BTreeMap;
use stockex_core::error::IndicatorError;
use stockex_core::traits::Indicator;
use stockex_core::types::{IndicatorType, ParameterSpec, ParameterizedIndicator};

use crate::momentum::{Macd, DEFAULT_LONG_TERM, DEFAULT_SHORT_TERM, DEFAULT_SIGNAL_TERM};
use crate::volatility::{Atr, DEFAULT_ATR_TERM};

const ATR_PARAMETERS: &[ParameterSpec] = &[ParameterSpec {
    name: "Term",
    default: DEFAULT_ATR_TERM as u32,
    min: 2,
    max: 200,
}];

const MACD_PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec {
        name: "LongTerm",
        default: DEFAULT_LONG_TERM as u32,
        min: 2,
        max: 200,
    },
    ParameterSpec {
        name: "ShortTerm",
        default: DEFAULT_SHORT_TERM as u32,
        min: 1,
        max: 199,
    },
    ParameterSpec {
        name: "SignalTerm",
        default: DEFAULT_SIGNAL_TERM as u32,
        min: 1,
        max: 200,
    },
];

/// Information about a registered indicator.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorInfo {
    pub indicator_type: IndicatorType,
    /// Indicator name
    pub name: &'static str,
    /// Indicator description
    pub description: &'static str,
    /// Configurable parameters with defaults and valid ranges
    pub parameters: &'static [ParameterSpec],
}

/// Registry of the available indicators and their parameter schemas.
#[derive(Debug, Clone)]
pub struct IndicatorRegistry {
    indicators: BTreeMap<IndicatorType, IndicatorInfo>,
}

impl IndicatorRegistry {
    /// Create a new registry with all built-in indicators.
    pub fn new() -> Self {
        let mut indicators = BTreeMap::new();

        indicators.insert(
            IndicatorType::Atr,
            IndicatorInfo {
                indicator_type: IndicatorType::Atr,
                name: "ATR",
                description: "Average True Range: signals when volatility and the price trend move together",
                parameters: ATR_PARAMETERS,
            },
        );

        indicators.insert(
            IndicatorType::Macd,
            IndicatorInfo {
                indicator_type: IndicatorType::Macd,
                name: "MACD",
                description: "Moving Average Convergence Divergence: signals on MACD and signal line crossovers",
                parameters: MACD_PARAMETERS,
            },
        );

        Self { indicators }
    }

    /// List all available indicators.
    pub fn list(&self) -> Vec<&IndicatorInfo> {
        self.indicators.values().collect()
    }

    /// Get indicator info by type.
    pub fn get(&self, indicator_type: IndicatorType) -> Option<&IndicatorInfo> {
        self.indicators.get(&indicator_type)
    }

    /// Get all registered indicator types.
    pub fn types(&self) -> Vec<IndicatorType> {
        self.indicators.keys().copied().collect()
    }

    /// Resolve an indicator type from its name.
    pub fn from_name(&self, name: &str) -> Result<IndicatorType, IndicatorError> {
        let indicator_type: IndicatorType = name.parse()?;
        if !self.indicators.contains_key(&indicator_type) {
            return Err(IndicatorError::UnknownIndicator(name.to_string()));
        }
        Ok(indicator_type)
    }

    /// Human readable description of an indicator.
    pub fn description(&self, indicator_type: IndicatorType) -> Option<&'static str> {
        self.get(indicator_type).map(|info| info.description)
    }

    /// Parameter schema of an indicator.
    pub fn parameters(&self, indicator_type: IndicatorType) -> &'static [ParameterSpec] {
        self.get(indicator_type)
            .map(|info| info.parameters)
            .unwrap_or(&[])
    }

    /// Resolve every schema parameter against the supplied values.
    ///
    /// Returned values follow schema order.
    fn resolve(
        &self,
        config: &ParameterizedIndicator,
    ) -> Result<Vec<usize>, IndicatorError> {
        let schema = self.parameters(config.indicator_type);

        for property in &config.properties {
            let spec = schema
                .iter()
                .find(|spec| spec.name.eq_ignore_ascii_case(&property.name))
                .ok_or_else(|| {
                    IndicatorError::InvalidParameter(format!(
                        "{} has no parameter named '{}'",
                        config.indicator_type, property.name
                    ))
                })?;

            if !spec.accepts(property.value) {
                return Err(IndicatorError::InvalidParameter(format!(
                    "{} {} must be between {} and {}, got {}",
                    config.indicator_type, spec.name, spec.min, spec.max, property.value
                )));
            }
        }

        Ok(schema
            .iter()
            .map(|spec| {
                config
                    .properties
                    .iter()
                    .rev()
                    .find(|p| spec.name.eq_ignore_ascii_case(&p.name))
                    .map(|p| p.value as usize)
                    .unwrap_or(spec.default as usize)
            })
            .collect())
    }

    /// Create an indicator instance from its configuration.
    ///
    /// Missing parameters take their defaults.
    pub fn create(
        &self,
        config: &ParameterizedIndicator,
    ) -> Result<Box<dyn Indicator>, IndicatorError> {
        if !self.indicators.contains_key(&config.indicator_type) {
            return Err(IndicatorError::UnknownIndicator(
                config.indicator_type.to_string(),
            ));
        }

        let values = self.resolve(config)?;
        match (config.indicator_type, values.as_slice()) {
            (IndicatorType::Atr, &[term]) => Ok(Box::new(Atr::new(term)?)),
            (IndicatorType::Macd, &[long, short, signal]) => {
                Ok(Box::new(Macd::with_terms(long, short, signal)?))
            }
            (indicator_type, _) => Err(IndicatorError::InvalidParameter(format!(
                "parameter schema mismatch for {}",
                indicator_type
            ))),
        }
    }

    /// Create an indicator with default parameters.
    pub fn create_default(
        &self,
        indicator_type: IndicatorType,
    ) -> Result<Box<dyn Indicator>, IndicatorError> {
        self.create(&ParameterizedIndicator::new(indicator_type))
    }
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
