//! Momentum indicators.

use stockex_core::error::IndicatorError;
use stockex_core::traits::Indicator;
use stockex_core::types::{IndicatorType, IndicatorValue, Price, Signal, SignalAction};

use crate::crossover::{find_line_crossovers, CrossoverKind};
use crate::moving_average::{close_exponential_moving_average, exponential_moving_average};

pub const DEFAULT_LONG_TERM: usize = 26;
pub const DEFAULT_SHORT_TERM: usize = 12;
pub const DEFAULT_SIGNAL_TERM: usize = 9;

/// MACD indicator.
///
/// The MACD line is the short EMA minus the long EMA of closing prices;
/// the signal line is the EMA of the MACD line. Output values carry both
/// lines, and signals fire where they cross.
#[derive(Debug, Clone)]
pub struct Macd {
    long_term: usize,
    short_term: usize,
    signal_term: usize,
}

impl Macd {
    /// Create a new MACD with default terms (26, 12, 9).
    pub fn new() -> Self {
        Self {
            long_term: DEFAULT_LONG_TERM,
            short_term: DEFAULT_SHORT_TERM,
            signal_term: DEFAULT_SIGNAL_TERM,
        }
    }

    /// Create a MACD with custom terms.
    pub fn with_terms(
        long_term: usize,
        short_term: usize,
        signal_term: usize,
    ) -> Result<Self, IndicatorError> {
        if long_term == 0 || short_term == 0 || signal_term == 0 {
            return Err(IndicatorError::InvalidParameter(
                "MACD terms must be greater than 0".into(),
            ));
        }
        if short_term >= long_term {
            return Err(IndicatorError::InvalidParameter(format!(
                "MACD short term ({}) must be less than long term ({})",
                short_term, long_term
            )));
        }
        Ok(Self {
            long_term,
            short_term,
            signal_term,
        })
    }

    pub fn long_term(&self) -> usize {
        self.long_term
    }

    pub fn short_term(&self) -> usize {
        self.short_term
    }

    pub fn signal_term(&self) -> usize {
        self.signal_term
    }

    /// Short EMA minus long EMA, dated like the long EMA.
    fn macd_line(&self, prices: &[Price]) -> Result<Vec<IndicatorValue>, IndicatorError> {
        let long_ema = close_exponential_moving_average(prices, self.long_term)?;
        let short_ema = close_exponential_moving_average(prices, self.short_term)?;

        // Align the EMAs (short has more values)
        let offset = self.long_term - self.short_term;
        Ok(short_ema[offset..]
            .iter()
            .zip(long_ema.iter())
            .map(|(short, long)| IndicatorValue::single(long.date, short.value() - long.value()))
            .collect())
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Macd {
    fn indicator_type(&self) -> IndicatorType {
        IndicatorType::Macd
    }

    fn required_warmup(&self) -> usize {
        self.long_term + self.signal_term - 2
    }

    fn calculate(&self, prices: &[Price]) -> Result<Vec<IndicatorValue>, IndicatorError> {
        self.validate_data(prices)?;

        let macd_line = self.macd_line(prices)?;
        let signal_line = exponential_moving_average(&macd_line, self.signal_term)?;

        let offset = macd_line.len() - signal_line.len();
        Ok(macd_line[offset..]
            .iter()
            .zip(signal_line.iter())
            .map(|(macd, signal)| IndicatorValue::dual(macd.date, macd.value(), signal.value()))
            .collect())
    }

    fn generate_signals(&self, prices: &[Price]) -> Result<Vec<Signal>, IndicatorError> {
        let values = self.calculate(prices)?;

        Ok(find_line_crossovers(&values)
            .into_iter()
            .map(|crossover| {
                let action = match crossover.kind {
                    CrossoverKind::FirstAbove => SignalAction::Buy,
                    CrossoverKind::SecondAbove => SignalAction::Sell,
                };
                Signal::new(crossover.date, action, IndicatorType::Macd)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn prices_from(closes: impl Iterator<Item = f64>) -> Vec<Price> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        closes
            .enumerate()
            .map(|(i, c)| {
                Price::new(7, start + chrono::Days::new(i as u64), c, c + 1.0, c - 1.0, c, 1000.0)
            })
            .collect()
    }

    #[test]
    fn test_default_terms() {
        let macd = Macd::default();
        assert_eq!(macd.long_term(), 26);
        assert_eq!(macd.short_term(), 12);
        assert_eq!(macd.signal_term(), 9);
        assert_eq!(macd.required_warmup(), 33);
    }

    #[test]
    fn test_invalid_terms() {
        assert!(matches!(
            Macd::with_terms(12, 26, 9),
            Err(IndicatorError::InvalidParameter(_))
        ));
        assert!(Macd::with_terms(26, 26, 9).is_err());
        assert!(Macd::with_terms(26, 12, 0).is_err());
        assert!(Macd::with_terms(10, 5, 3).is_ok());
    }

    #[test]
    fn test_calculate_dual_line_output() {
        let macd = Macd::with_terms(5, 3, 2).unwrap();
        let prices = prices_from((0..20).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0));
        let values = macd.calculate(&prices).unwrap();

        assert_eq!(values.len(), prices.len() - macd.required_warmup());
        assert_eq!(values.last().unwrap().date, prices.last().unwrap().date);
        assert!(values.iter().all(|v| v.second_line_value().is_some()));
    }

    #[test]
    fn test_signal_line_is_ema_of_macd_line() {
        let macd = Macd::with_terms(3, 2, 2).unwrap();
        let prices = prices_from([1.0, 2.0, 4.0, 7.0, 11.0].into_iter());

        // short EMA(2): [1.5, 3.1667, 5.7222, 9.2407]
        // long EMA(3):  [2.3333, 4.6667, 7.8333]
        // macd line:    [0.8333, 1.0556, 1.4074]
        // signal EMA(2) of macd line: [0.9444, 1.2531]
        let values = macd.calculate(&prices).unwrap();
        assert_eq!(values.len(), 2);
        assert!((values[0].value() - 1.0556).abs() < 1e-3);
        assert!((values[0].second_line_value().unwrap() - 0.9444).abs() < 1e-3);
        assert!((values[1].value() - 1.4074).abs() < 1e-3);
        assert!((values[1].second_line_value().unwrap() - 1.2531).abs() < 1e-3);
    }

    #[test]
    fn test_insufficient_data() {
        let macd = Macd::new();
        let prices = prices_from((0..30).map(|i| i as f64));
        assert_eq!(
            macd.calculate(&prices).unwrap_err(),
            IndicatorError::InsufficientData {
                required: 34,
                available: 30
            }
        );
    }

    #[test]
    fn test_rising_series_never_sells() {
        let macd = Macd::new();
        let prices = prices_from((0..120).map(|i| 100.0 * 1.01_f64.powi(i)));
        let signals = macd.generate_signals(&prices).unwrap();

        assert!(signals.iter().all(|s| s.action != SignalAction::Sell));
        assert!(signals.iter().filter(|s| s.action == SignalAction::Buy).count() <= 1);
    }

    #[test]
    fn test_linear_rise_never_sells() {
        let macd = Macd::new();
        for slope in [0.5, 1.0, 3.0] {
            let prices = prices_from((0..200).map(|i| 50.0 + slope * i as f64));
            let signals = macd.generate_signals(&prices).unwrap();

            assert!(signals.iter().all(|s| s.action != SignalAction::Sell), "slope {}", slope);
            assert!(signals.iter().filter(|s| s.action == SignalAction::Buy).count() <= 1);
        }
    }

    #[test]
    fn test_oscillating_series_alternates() {
        let macd = Macd::new();
        let prices = prices_from((0..250).map(|i| 100.0 + (i as f64 * 0.15).sin() * 10.0));
        let signals = macd.generate_signals(&prices).unwrap();

        assert!(signals.len() >= 2);
        for pair in signals.windows(2) {
            assert_ne!(pair[0].action, pair[1].action);
            assert!(pair[0].date < pair[1].date);
        }
        assert!(signals.iter().all(|s| s.indicator_type == IndicatorType::Macd));
    }
}
