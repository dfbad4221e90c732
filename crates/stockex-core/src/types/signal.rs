//! Trading signals and per-date signal events.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::{IndicatorType, InstrumentId};

/// What an indicator suggests doing on a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalAction {
    Buy,
    Sell,
    NoSignal,
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalAction::Buy => write!(f, "BUY"),
            SignalAction::Sell => write!(f, "SELL"),
            SignalAction::NoSignal => write!(f, "NONE"),
        }
    }
}

/// A signal emitted by one indicator for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub date: NaiveDate,
    pub action: SignalAction,
    pub indicator_type: IndicatorType,
}

impl Signal {
    pub fn new(date: NaiveDate, action: SignalAction, indicator_type: IndicatorType) -> Self {
        Self {
            date,
            action,
            indicator_type,
        }
    }
}

/// Instruments to buy and sell on a single date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub date: NaiveDate,
    pub to_buy: BTreeSet<InstrumentId>,
    pub to_sell: BTreeSet<InstrumentId>,
}

impl SignalEvent {
    /// Create an event with no instruments.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            to_buy: BTreeSet::new(),
            to_sell: BTreeSet::new(),
        }
    }

    /// Record an instrument under the given action.
    ///
    /// Returns false if the instrument was already recorded for that action
    /// or the action is `NoSignal`.
    pub fn add(&mut self, instrument: InstrumentId, action: SignalAction) -> bool {
        match action {
            SignalAction::Buy => self.to_buy.insert(instrument),
            SignalAction::Sell => self.to_sell.insert(instrument),
            SignalAction::NoSignal => false,
        }
    }

    /// Check whether an instrument is already recorded for the action.
    pub fn contains(&self, instrument: InstrumentId, action: SignalAction) -> bool {
        match action {
            SignalAction::Buy => self.to_buy.contains(&instrument),
            SignalAction::Sell => self.to_sell.contains(&instrument),
            SignalAction::NoSignal => false,
        }
    }

    /// True when neither set has any instrument.
    pub fn is_empty(&self) -> bool {
        self.to_buy.is_empty() && self.to_sell.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_event_set_semantics() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let mut event = SignalEvent::empty(date);
        assert!(event.is_empty());

        assert!(event.add(7, SignalAction::Buy));
        assert!(!event.add(7, SignalAction::Buy));
        assert!(event.add(7, SignalAction::Sell));
        assert!(!event.add(9, SignalAction::NoSignal));

        assert_eq!(event.to_buy.len(), 1);
        assert_eq!(event.to_sell.len(), 1);
        assert!(event.contains(7, SignalAction::Sell));
        assert!(!event.contains(9, SignalAction::Buy));
        assert!(!event.is_empty());
    }
}
