//! Volatility indicators.

use stockex_core::error::IndicatorError;
use stockex_core::traits::Indicator;
use stockex_core::types::{IndicatorType, IndicatorValue, Price, Signal, SignalAction};

use crate::moving_average::{close_exponential_moving_average, smoothed_moving_average};

/// Default ATR term.
pub const DEFAULT_ATR_TERM: usize = 14;

/// True range of every date; the first date has no previous close.
pub fn true_range_series(prices: &[Price]) -> Vec<IndicatorValue> {
    let mut prev_close = None;
    prices
        .iter()
        .map(|p| {
            let value = IndicatorValue::single(p.date, p.true_range(prev_close));
            prev_close = Some(p.close);
            value
        })
        .collect()
}

/// Average True Range (ATR).
///
/// Measures market volatility as the smoothed moving average of the
/// true range. Signals combine the ATR direction with an EMA trend line
/// of closing prices over the same term.
#[derive(Debug, Clone)]
pub struct Atr {
    term: usize,
}

impl Atr {
    /// Create a new ATR indicator.
    ///
    /// Common term is 14.
    pub fn new(term: usize) -> Result<Self, IndicatorError> {
        if term <= 1 {
            return Err(IndicatorError::InvalidParameter(format!(
                "ATR term must be greater than 1, got {}",
                term
            )));
        }
        Ok(Self { term })
    }

    pub fn term(&self) -> usize {
        self.term
    }

    /// EMA of closes over the ATR term, aligned with `calculate`'s output.
    pub fn trend(&self, prices: &[Price]) -> Result<Vec<IndicatorValue>, IndicatorError> {
        close_exponential_moving_average(prices, self.term)
    }
}

impl Default for Atr {
    fn default() -> Self {
        Self {
            term: DEFAULT_ATR_TERM,
        }
    }
}

impl Indicator for Atr {
    fn indicator_type(&self) -> IndicatorType {
        IndicatorType::Atr
    }

    fn required_warmup(&self) -> usize {
        self.term - 1
    }

    fn calculate(&self, prices: &[Price]) -> Result<Vec<IndicatorValue>, IndicatorError> {
        self.validate_data(prices)?;
        smoothed_moving_average(&true_range_series(prices), self.term)
    }

    /// Buy when volatility and trend rise together, sell when both fall.
    ///
    /// A signal repeats only after the opposite one has fired. The first
    /// `term` dates have nothing to compare against and the last date is
    /// never signalled.
    fn generate_signals(&self, prices: &[Price]) -> Result<Vec<Signal>, IndicatorError> {
        let values = self.calculate(prices)?;
        let trend = self.trend(prices)?;

        let mut signals = Vec::new();
        let mut last_action: Option<SignalAction> = None;

        for i in 1..values.len().saturating_sub(1) {
            let (prev_atr, atr) = (values[i - 1].value(), values[i].value());
            let (prev_trend, trend_now) = (trend[i - 1].value(), trend[i].value());

            let action = if prev_atr < atr && prev_trend < trend_now {
                SignalAction::Buy
            } else if prev_atr > atr && prev_trend > trend_now {
                SignalAction::Sell
            } else {
                continue;
            };

            if last_action == Some(action) {
                continue;
            }
            signals.push(Signal::new(values[i].date, action, IndicatorType::Atr));
            last_action = Some(action);
        }

        Ok(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(i: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64)
    }

    fn bar(i: usize, high: f64, low: f64, close: f64) -> Price {
        Price::new(1, date(i), close, high, low, close, 1000.0)
    }

    /// Ten days of rising closes with widening ranges, then ten days of
    /// falling closes with narrowing ranges.
    fn rise_then_fall() -> Vec<Price> {
        (0..20)
            .map(|i| {
                let (close, half_range) = if i < 10 {
                    (100.0 + 2.0 * i as f64, 1.0 + 0.5 * i as f64)
                } else {
                    (136.0 - 2.0 * i as f64, 1.0 + 0.5 * (19 - i) as f64)
                };
                bar(i, close + half_range, close - half_range, close)
            })
            .collect()
    }

    #[test]
    fn test_true_range_example() {
        let prices = vec![
            bar(0, 10.0, 8.0, 9.0),
            bar(1, 11.0, 9.0, 10.0),
            bar(2, 12.0, 10.0, 11.0),
        ];

        let tr = true_range_series(&prices);
        let values: Vec<f64> = tr.iter().map(|v| v.value()).collect();
        assert_eq!(values, vec![2.0, 2.0, 2.0]);

        let atr = Atr::new(2).unwrap();
        let result = atr.calculate(&prices).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].date, date(1));
        for value in &result {
            assert!((value.value() - 2.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_true_range_non_negative_and_first_is_range() {
        let prices = rise_then_fall();
        let tr = true_range_series(&prices);

        assert!((tr[0].value() - prices[0].range()).abs() < 1e-10);
        for value in &tr {
            assert!(value.value() >= 0.0);
        }
    }

    #[test]
    fn test_value_length_matches_warmup() {
        let prices = rise_then_fall();
        for term in [2, 5, 14] {
            let atr = Atr::new(term).unwrap();
            let values = atr.calculate(&prices).unwrap();
            assert_eq!(values.len(), prices.len() - atr.required_warmup());
            assert_eq!(atr.trend(&prices).unwrap().len(), values.len());
        }
    }

    #[test]
    fn test_invalid_term() {
        assert!(matches!(
            Atr::new(1),
            Err(IndicatorError::InvalidParameter(_))
        ));
        assert!(Atr::new(0).is_err());
        assert_eq!(Atr::default().term(), DEFAULT_ATR_TERM);
    }

    #[test]
    fn test_insufficient_data() {
        let atr = Atr::new(5).unwrap();
        let prices: Vec<Price> = rise_then_fall().into_iter().take(3).collect();

        assert_eq!(
            atr.generate_signals(&prices).unwrap_err(),
            IndicatorError::InsufficientData {
                required: 5,
                available: 3
            }
        );
    }

    #[test]
    fn test_signals_deduplicated_per_run() {
        let atr = Atr::new(2).unwrap();
        let prices = rise_then_fall();
        let signals = atr.generate_signals(&prices).unwrap();

        let actions: Vec<SignalAction> = signals.iter().map(|s| s.action).collect();
        assert_eq!(actions, vec![SignalAction::Buy, SignalAction::Sell]);

        // First comparable date is index `term`
        assert_eq!(signals[0].date, date(2));
        assert!(signals[1].date > date(9));
        assert!(signals[1].date < date(19));
        assert!(signals.iter().all(|s| s.indicator_type == IndicatorType::Atr));
    }

    #[test]
    fn test_final_date_never_signalled() {
        let atr = Atr::new(2).unwrap();
        // Rising for three days: only the final comparison would signal
        let prices = vec![
            bar(0, 10.0, 9.0, 9.5),
            bar(1, 10.0, 9.0, 9.5),
            bar(2, 13.0, 10.0, 12.0),
        ];
        assert!(atr.generate_signals(&prices).unwrap().is_empty());
    }
}
