//! Indicator trait definition.

use crate::error::IndicatorError;
use crate::types::{IndicatorType, IndicatorValue, Price, Signal};

/// Trait for technical indicators.
///
/// Indicators process a per-instrument daily price series and produce
/// a derived value series plus buy/sell signals.
pub trait Indicator: Send + Sync {
    /// Which indicator variant this is.
    fn indicator_type(&self) -> IndicatorType;

    /// Number of leading price dates consumed before the first value.
    ///
    /// `calculate` returns `prices.len() - required_warmup()` values.
    fn required_warmup(&self) -> usize;

    /// Calculate indicator values for the given prices.
    ///
    /// # Arguments
    /// * `prices` - Price series ordered from oldest to newest
    ///
    /// # Returns
    /// One value per date after the warm-up window
    fn calculate(&self, prices: &[Price]) -> Result<Vec<IndicatorValue>, IndicatorError>;

    /// Generate dated buy/sell signals for the given prices.
    fn generate_signals(&self, prices: &[Price]) -> Result<Vec<Signal>, IndicatorError>;

    /// Validate that there's enough data to produce at least one value.
    fn validate_data(&self, prices: &[Price]) -> Result<(), IndicatorError> {
        let required = self.required_warmup() + 1;
        if prices.len() < required {
            return Err(IndicatorError::InsufficientData {
                required,
                available: prices.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SignalAction;
    use chrono::NaiveDate;

    struct TestIndicator {
        warmup: usize,
    }

    impl Indicator for TestIndicator {
        fn indicator_type(&self) -> IndicatorType {
            IndicatorType::Atr
        }

        fn required_warmup(&self) -> usize {
            self.warmup
        }

        fn calculate(&self, prices: &[Price]) -> Result<Vec<IndicatorValue>, IndicatorError> {
            self.validate_data(prices)?;
            // Running sum of closes over warmup + 1 days
            Ok(prices
                .windows(self.warmup + 1)
                .map(|w| IndicatorValue::single(w[w.len() - 1].date, w.iter().map(|p| p.close).sum()))
                .collect())
        }

        fn generate_signals(&self, prices: &[Price]) -> Result<Vec<Signal>, IndicatorError> {
            let values = self.calculate(prices)?;
            Ok(values
                .iter()
                .map(|v| Signal::new(v.date, SignalAction::Buy, self.indicator_type()))
                .collect())
        }
    }

    fn prices(n: u32) -> Vec<Price> {
        (1..=n)
            .map(|d| {
                let date = NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
                Price::new(1, date, 1.0, 1.0, 1.0, d as f64, 0.0)
            })
            .collect()
    }

    #[test]
    fn test_indicator_validation() {
        let indicator = TestIndicator { warmup: 4 };

        assert!(indicator.validate_data(&prices(3)).is_err());
        assert!(indicator.validate_data(&prices(5)).is_ok());
    }

    #[test]
    fn test_indicator_calculate_length() {
        let indicator = TestIndicator { warmup: 2 };
        let data = prices(5);
        let result = indicator.calculate(&data).unwrap();

        assert_eq!(result.len(), data.len() - indicator.required_warmup());
        assert!((result[0].value() - 6.0).abs() < 0.001); // 1+2+3
        assert!((result[2].value() - 12.0).abs() < 0.001); // 3+4+5
    }
}
