//! Indicator identity, output values and parameter schema types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IndicatorError;

/// Indicator variants supported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorType {
    /// Average True Range with an EMA trend filter
    Atr,
    /// Moving Average Convergence Divergence
    Macd,
}

impl IndicatorType {
    /// Get all available indicator types.
    pub fn all() -> &'static [IndicatorType] {
        &[IndicatorType::Atr, IndicatorType::Macd]
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IndicatorType::Atr => "ATR",
            IndicatorType::Macd => "MACD",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for IndicatorType {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "atr" | "average true range" => Ok(IndicatorType::Atr),
            "macd" | "moving average convergence divergence" => Ok(IndicatorType::Macd),
            _ => Err(IndicatorError::UnknownIndicator(s.to_string())),
        }
    }
}

/// Shape of a single indicator output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndicatorReading {
    /// One line (e.g. ATR)
    Single(f64),
    /// A line plus a second line drawn against it (e.g. MACD and its signal line)
    Dual { value: f64, second_line: f64 },
}

/// One dated point of an indicator series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorValue {
    pub date: NaiveDate,
    pub reading: IndicatorReading,
}

impl IndicatorValue {
    /// Create a single-line value.
    pub fn single(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            reading: IndicatorReading::Single(value),
        }
    }

    /// Create a dual-line value.
    pub fn dual(date: NaiveDate, value: f64, second_line: f64) -> Self {
        Self {
            date,
            reading: IndicatorReading::Dual { value, second_line },
        }
    }

    /// The primary line value.
    #[inline]
    pub fn value(&self) -> f64 {
        match self.reading {
            IndicatorReading::Single(value) => value,
            IndicatorReading::Dual { value, .. } => value,
        }
    }

    /// The second line value, present only for dual-line indicators.
    #[inline]
    pub fn second_line_value(&self) -> Option<f64> {
        match self.reading {
            IndicatorReading::Single(_) => None,
            IndicatorReading::Dual { second_line, .. } => Some(second_line),
        }
    }
}

/// Schema entry describing one configurable indicator parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub default: u32,
    /// Inclusive lower bound
    pub min: u32,
    /// Inclusive upper bound
    pub max: u32,
}

impl ParameterSpec {
    /// Check whether a value lies in the valid range.
    pub fn accepts(&self, value: i64) -> bool {
        value >= self.min as i64 && value <= self.max as i64
    }
}

/// A named numeric parameter value supplied for an indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorProperty {
    pub name: String,
    pub value: i64,
}

impl IndicatorProperty {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// An indicator type together with its configured parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterizedIndicator {
    #[serde(rename = "type")]
    pub indicator_type: IndicatorType,
    #[serde(default)]
    pub properties: Vec<IndicatorProperty>,
}

impl ParameterizedIndicator {
    /// Indicator with default parameters.
    pub fn new(indicator_type: IndicatorType) -> Self {
        Self {
            indicator_type,
            properties: Vec::new(),
        }
    }

    /// Add a parameter value.
    pub fn with_property(mut self, name: impl Into<String>, value: i64) -> Self {
        self.properties.push(IndicatorProperty::new(name, value));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_type_parse() {
        assert_eq!(IndicatorType::from_str("atr").unwrap(), IndicatorType::Atr);
        assert_eq!(IndicatorType::from_str(" MACD ").unwrap(), IndicatorType::Macd);
        assert!(matches!(
            IndicatorType::from_str("rsi"),
            Err(IndicatorError::UnknownIndicator(_))
        ));
    }

    #[test]
    fn test_indicator_type_display() {
        assert_eq!(IndicatorType::Atr.to_string(), "ATR");
        assert_eq!(IndicatorType::Macd.to_string(), "MACD");
    }

    #[test]
    fn test_indicator_value_lines() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let single = IndicatorValue::single(date, 1.5);
        assert_eq!(single.value(), 1.5);
        assert_eq!(single.second_line_value(), None);

        let dual = IndicatorValue::dual(date, 0.4, 0.1);
        assert_eq!(dual.value(), 0.4);
        assert_eq!(dual.second_line_value(), Some(0.1));
    }

    #[test]
    fn test_parameterized_indicator_deserialize() {
        let json = r#"{"type": "macd", "properties": [{"name": "ShortTerm", "value": 5}]}"#;
        let parsed: ParameterizedIndicator = serde_json::from_str(json).unwrap();

        assert_eq!(
            parsed,
            ParameterizedIndicator::new(IndicatorType::Macd).with_property("ShortTerm", 5)
        );

        let bare: ParameterizedIndicator = serde_json::from_str(r#"{"type": "atr"}"#).unwrap();
        assert!(bare.properties.is_empty());
    }

    #[test]
    fn test_parameter_spec_range() {
        let spec = ParameterSpec {
            name: "Term",
            default: 14,
            min: 2,
            max: 200,
        };
        assert!(spec.accepts(2));
        assert!(spec.accepts(200));
        assert!(!spec.accepts(1));
        assert!(!spec.accepts(-5));
        assert!(!spec.accepts(201));
    }
}
