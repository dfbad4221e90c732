//! Simulation ledger and extreme-value statistics.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stockex_core::types::{InstrumentId, SignalAction};

use crate::price_book::PriceBook;

/// Record of a single simulated transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationTransaction {
    pub date: NaiveDate,
    pub instrument_id: InstrumentId,
    pub price: Decimal,
    pub quantity: u64,
    pub action: SignalAction,
    /// Cash left after the transaction
    pub budget_after: Decimal,
}

impl SimulationTransaction {
    /// Price times quantity.
    pub fn value(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Biggest swing between two consecutive sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremeTransactionResult {
    pub date: NaiveDate,
    /// Budget after the previous sale (or the start budget)
    pub previous_value: Decimal,
    /// Budget after this sale
    pub current_value: Decimal,
}

impl ExtremeTransactionResult {
    /// Change from the previous value in percent, rounded to 2 dp.
    pub fn percentage(&self) -> Decimal {
        percentage_change(self.previous_value, self.current_value)
    }
}

/// Portfolio value on the day it reached a new high or low.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremeSimulationValue {
    pub date: NaiveDate,
    pub value: Decimal,
    pub start_budget: Decimal,
}

impl ExtremeSimulationValue {
    /// Change against the start budget in percent, rounded to 2 dp.
    pub fn percentage_change(&self) -> Decimal {
        percentage_change(self.start_budget, self.value)
    }
}

pub(crate) fn percentage_change(from: Decimal, to: Decimal) -> Decimal {
    if from.is_zero() {
        return Decimal::ZERO;
    }
    ((to - from) / from * dec!(100)).round_dp(2)
}

/// Running max gain / max loss between consecutive sales.
///
/// Only a positive swing can become the max gain and only a negative
/// swing the max loss.
#[derive(Debug, Clone)]
pub(crate) struct TransactionExtremes {
    last_sell_value: Decimal,
    max_diff: Decimal,
    min_diff: Decimal,
    pub max_gain: Option<ExtremeTransactionResult>,
    pub max_loss: Option<ExtremeTransactionResult>,
}

impl TransactionExtremes {
    pub fn new(start_budget: Decimal) -> Self {
        Self {
            last_sell_value: start_budget,
            max_diff: Decimal::ZERO,
            min_diff: Decimal::ZERO,
            max_gain: None,
            max_loss: None,
        }
    }

    /// Record the budget after a sale.
    pub fn record_sale(&mut self, date: NaiveDate, sell_value: Decimal) {
        if !self.last_sell_value.is_zero() {
            let diff = (sell_value - self.last_sell_value) / self.last_sell_value;
            let result = ExtremeTransactionResult {
                date,
                previous_value: self.last_sell_value,
                current_value: sell_value,
            };

            if diff > self.max_diff {
                self.max_diff = diff;
                self.max_gain = Some(result.clone());
            }
            if diff < self.min_diff {
                self.min_diff = diff;
                self.max_loss = Some(result);
            }
        }
        self.last_sell_value = sell_value;
    }
}

/// Apply one transaction to a holdings map.
///
/// Holdings never go negative and empty positions are removed.
pub fn apply_transaction(
    holdings: &mut BTreeMap<InstrumentId, u64>,
    transaction: &SimulationTransaction,
) {
    match transaction.action {
        SignalAction::Buy => {
            *holdings.entry(transaction.instrument_id).or_insert(0) += transaction.quantity;
        }
        SignalAction::Sell => {
            if let Some(quantity) = holdings.get_mut(&transaction.instrument_id) {
                *quantity = quantity.saturating_sub(transaction.quantity);
                if *quantity == 0 {
                    holdings.remove(&transaction.instrument_id);
                }
            }
        }
        SignalAction::NoSignal => {}
    }
}

/// Rebuild holdings from a ledger.
pub fn replay_holdings(ledger: &[SimulationTransaction]) -> BTreeMap<InstrumentId, u64> {
    let mut holdings = BTreeMap::new();
    for transaction in ledger {
        apply_transaction(&mut holdings, transaction);
    }
    holdings
}

/// Highest and lowest portfolio value over every calendar day of the range.
///
/// The ledger is replayed day by day. A day's value is the cash after that
/// day's transactions plus every priced instrument's close times the held
/// quantity; days where none of the instruments has a price are skipped.
/// Only values strictly beyond the start budget are recorded.
pub(crate) fn value_extremes(
    start: NaiveDate,
    end: NaiveDate,
    start_budget: Decimal,
    instruments: &[InstrumentId],
    ledger: &[SimulationTransaction],
    book: &PriceBook,
) -> (Option<ExtremeSimulationValue>, Option<ExtremeSimulationValue>) {
    let mut holdings = BTreeMap::new();
    let mut budget = start_budget;
    let mut max_value = start_budget;
    let mut min_value = start_budget;
    let mut max = None;
    let mut min = None;
    let mut next = 0;

    for day in start.iter_days().take_while(|d| *d <= end) {
        // Transactions dated before the range count from its first day
        while next < ledger.len() && ledger[next].date <= day {
            apply_transaction(&mut holdings, &ledger[next]);
            budget = ledger[next].budget_after;
            next += 1;
        }

        let mut priced = false;
        let mut value = budget;
        for id in instruments {
            if let Some(close) = book.close_on(*id, day) {
                priced = true;
                value += close * Decimal::from(holdings.get(id).copied().unwrap_or(0));
            }
        }
        if !priced {
            continue;
        }

        if value > max_value {
            max_value = value;
            max = Some(ExtremeSimulationValue {
                date: day,
                value,
                start_budget,
            });
        }
        if value < min_value {
            min_value = value;
            min = Some(ExtremeSimulationValue {
                date: day,
                value,
                start_budget,
            });
        }
    }

    (max, min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use stockex_core::types::Price;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn tx(
        d: u32,
        instrument_id: InstrumentId,
        action: SignalAction,
        quantity: u64,
        price: Decimal,
        budget_after: Decimal,
    ) -> SimulationTransaction {
        SimulationTransaction {
            date: date(d),
            instrument_id,
            price,
            quantity,
            action,
            budget_after,
        }
    }

    #[test]
    fn test_transaction_extremes() {
        let mut extremes = TransactionExtremes::new(dec!(1000));

        extremes.record_sale(date(2), dec!(1200));
        extremes.record_sale(date(5), dec!(900));
        extremes.record_sale(date(9), dec!(990));

        let gain = extremes.max_gain.unwrap();
        assert_eq!(gain.date, date(2));
        assert_eq!(gain.previous_value, dec!(1000));
        assert_eq!(gain.percentage(), dec!(20.00));

        let loss = extremes.max_loss.unwrap();
        assert_eq!(loss.date, date(5));
        assert_eq!(loss.current_value, dec!(900));
        assert_eq!(loss.percentage(), dec!(-25.00));
    }

    #[test]
    fn test_no_loss_without_negative_swing() {
        let mut extremes = TransactionExtremes::new(dec!(500));
        extremes.record_sale(date(1), dec!(500));
        extremes.record_sale(date(2), dec!(600));

        assert!(extremes.max_loss.is_none());
        assert_eq!(extremes.max_gain.map(|g| g.date), Some(date(2)));
    }

    #[test]
    fn test_replay_holdings() {
        let ledger = vec![
            tx(1, 1, SignalAction::Buy, 10, dec!(5), dec!(50)),
            tx(1, 2, SignalAction::Buy, 3, dec!(10), dec!(20)),
            tx(2, 1, SignalAction::Sell, 10, dec!(6), dec!(80)),
            tx(3, 1, SignalAction::Buy, 4, dec!(7), dec!(52)),
        ];

        let holdings = replay_holdings(&ledger);
        assert_eq!(holdings, BTreeMap::from([(1, 4), (2, 3)]));
        assert_eq!(ledger[1].value(), dec!(30));
    }

    #[test]
    fn test_value_extremes() {
        let histories = HashMap::from([(
            1,
            vec![
                Price::new(1, date(1), 50.0, 50.0, 50.0, 50.0, 0.0),
                Price::new(1, date(2), 45.0, 45.0, 45.0, 45.0, 0.0),
                // no price on the 3rd
                Price::new(1, date(4), 60.0, 60.0, 60.0, 60.0, 0.0),
            ],
        )]);
        let book = PriceBook::new(&histories);
        let ledger = vec![
            tx(1, 1, SignalAction::Buy, 20, dec!(50), dec!(0)),
            tx(4, 1, SignalAction::Sell, 20, dec!(60), dec!(1200)),
        ];

        let (max, min) = value_extremes(date(1), date(5), dec!(1000), &[1], &ledger, &book);

        let max = max.unwrap();
        assert_eq!(max.date, date(4));
        assert_eq!(max.value, dec!(1200));
        assert_eq!(max.percentage_change(), dec!(20.00));

        let min = min.unwrap();
        assert_eq!(min.date, date(2));
        assert_eq!(min.value, dec!(900));
        assert_eq!(min.percentage_change(), dec!(-10.00));
    }

    #[test]
    fn test_value_extremes_flat() {
        let histories = HashMap::from([(
            1,
            vec![Price::new(1, date(1), 50.0, 50.0, 50.0, 50.0, 0.0)],
        )]);
        let book = PriceBook::new(&histories);

        let (max, min) = value_extremes(date(1), date(3), dec!(1000), &[1], &[], &book);
        assert!(max.is_none());
        assert!(min.is_none());
    }
}
