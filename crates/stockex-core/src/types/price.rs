//! Daily price data types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Identifier of a tradable instrument.
pub type InstrumentId = u32;

/// A tradable instrument known to the instrument registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: InstrumentId,
    /// Short ticker-like code
    pub code: String,
    pub name: String,
}

impl Instrument {
    pub fn new(id: InstrumentId, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
        }
    }
}

/// One day of price history for an instrument.
///
/// Uses f64 for fast indicator calculations; the simulation converts
/// closing prices to `Decimal` when it books transactions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub instrument_id: InstrumentId,
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Price {
    /// Create a new price record.
    pub fn new(
        instrument_id: InstrumentId,
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            instrument_id,
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// The day's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Calculate the true range (used for ATR).
    ///
    /// Without a previous close this is just the day's range.
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.high - self.low,
        }
    }
}

/// Check that a per-instrument series is strictly increasing by date.
pub fn validate_series(prices: &[Price]) -> Result<(), DataError> {
    for pair in prices.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(DataError::Internal(format!(
                "price series for instrument {} is not strictly increasing at {}",
                pair[1].instrument_id, pair[1].date
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_price_true_range() {
        let price = Price::new(1, date(2), 100.0, 110.0, 95.0, 105.0, 1000000.0);

        // Without previous close
        assert!((price.true_range(None) - 15.0).abs() < 0.001);

        // With previous close that creates gap
        assert!((price.true_range(Some(90.0)) - 20.0).abs() < 0.001);
        assert!((price.true_range(Some(120.0)) - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_validate_series() {
        let a = Price::new(1, date(1), 1.0, 1.0, 1.0, 1.0, 0.0);
        let b = Price::new(1, date(2), 1.0, 1.0, 1.0, 1.0, 0.0);

        assert!(validate_series(&[a, b]).is_ok());
        assert!(validate_series(&[b, a]).is_err());
        assert!(validate_series(&[a, a]).is_err());
        assert!(validate_series(&[]).is_ok());
    }
}
