//! Closing price lookup by instrument and date.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use stockex_core::types::{InstrumentId, Price};

/// Closing prices converted to `Decimal`, indexed for date lookups.
#[derive(Debug, Default)]
pub(crate) struct PriceBook {
    closes: HashMap<InstrumentId, BTreeMap<NaiveDate, Decimal>>,
}

impl PriceBook {
    pub fn new(histories: &HashMap<InstrumentId, Vec<Price>>) -> Self {
        let closes = histories
            .iter()
            .map(|(id, prices)| {
                let by_date = prices
                    .iter()
                    .map(|p| (p.date, Decimal::try_from(p.close).unwrap_or_default()))
                    .collect();
                (*id, by_date)
            })
            .collect();
        Self { closes }
    }

    /// Close of an instrument on a date.
    pub fn close_on(&self, instrument: InstrumentId, date: NaiveDate) -> Option<Decimal> {
        self.closes.get(&instrument)?.get(&date).copied()
    }

    /// Latest known close of an instrument.
    pub fn last_close(&self, instrument: InstrumentId) -> Option<Decimal> {
        self.closes
            .get(&instrument)?
            .last_key_value()
            .map(|(_, close)| *close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_lookups() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let histories = HashMap::from([(
            5,
            vec![
                Price::new(5, d1, 10.0, 11.0, 9.0, 10.5, 0.0),
                Price::new(5, d2, 10.5, 12.0, 10.0, 11.25, 0.0),
            ],
        )]);

        let book = PriceBook::new(&histories);
        assert_eq!(book.close_on(5, d1), Some(dec!(10.5)));
        assert_eq!(book.close_on(5, d2 + chrono::Days::new(1)), None);
        assert_eq!(book.close_on(6, d1), None);
        assert_eq!(book.last_close(5), Some(dec!(11.25)));
    }
}
