//! Multi-instrument signal aggregation.

use chrono::{Days, NaiveDate};
use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use stockex_core::error::{StockexError, StockexResult};
use stockex_core::traits::{Indicator, PriceProvider};
use stockex_core::types::{
    IndicatorType, InstrumentId, ParameterizedIndicator, Signal, SignalAction, SignalEvent,
};
use stockex_indicators::IndicatorRegistry;
use tracing::{debug, info, warn};

use crate::strategy::{CombinationMode, StrategyDefinition};

/// Default number of instruments evaluated at once.
pub const DEFAULT_MAX_CONCURRENT_INSTRUMENTS: usize = 4;

/// Reported date range and the last price date indicators may see.
#[derive(Debug, Clone, Copy)]
struct Window {
    start: NaiveDate,
    end: NaiveDate,
    history_end: NaiveDate,
}

/// Combines indicator signals across instruments into per-date events.
pub struct SignalAggregator {
    provider: Arc<dyn PriceProvider>,
    registry: IndicatorRegistry,
    max_concurrent: usize,
}

impl SignalAggregator {
    /// Create an aggregator over a price provider with the built-in indicators.
    pub fn new(provider: Arc<dyn PriceProvider>) -> Self {
        Self {
            provider,
            registry: IndicatorRegistry::new(),
            max_concurrent: DEFAULT_MAX_CONCURRENT_INSTRUMENTS,
        }
    }

    /// Limit how many instruments are fetched and evaluated at once.
    pub fn with_concurrency(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Generate the date-ordered buy/sell events for `[start, end]`.
    ///
    /// Each instrument's full history up to `end` is fetched so earlier
    /// prices feed the indicator warm-up. Failures of one instrument or one
    /// indicator are logged and contribute nothing. Dates without any
    /// instrument to buy or sell are omitted.
    pub async fn get_signals(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        instruments: &[InstrumentId],
        indicators: &[ParameterizedIndicator],
        mode: CombinationMode,
    ) -> StockexResult<Vec<SignalEvent>> {
        self.collect_events(
            Window {
                start,
                end,
                history_end: end,
            },
            instruments,
            indicators,
            mode,
        )
        .await
    }

    /// Generate events for a strategy definition.
    pub async fn get_strategy_signals(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        instruments: &[InstrumentId],
        strategy: &StrategyDefinition,
    ) -> StockexResult<Vec<SignalEvent>> {
        self.get_signals(start, end, instruments, &strategy.indicators, strategy.mode)
            .await
    }

    /// The event for a single date, if any instrument has a signal on it.
    ///
    /// Indicators see all available history, including prices after
    /// `date`, so the result matches the event `get_signals` reports for
    /// `date` over any longer range. Indicators that never signal the
    /// final price of their input have nothing to report for the latest
    /// date.
    pub async fn signals_on(
        &self,
        date: NaiveDate,
        instruments: &[InstrumentId],
        indicators: &[ParameterizedIndicator],
        mode: CombinationMode,
    ) -> StockexResult<Option<SignalEvent>> {
        let mut events = self
            .collect_events(
                Window {
                    start: date,
                    end: date,
                    history_end: NaiveDate::MAX,
                },
                instruments,
                indicators,
                mode,
            )
            .await?;
        Ok(events.pop())
    }

    async fn collect_events(
        &self,
        window: Window,
        instruments: &[InstrumentId],
        indicators: &[ParameterizedIndicator],
        mode: CombinationMode,
    ) -> StockexResult<Vec<SignalEvent>> {
        if window.start > window.end {
            return Err(StockexError::Validation(format!(
                "start date {} is after end date {}",
                window.start, window.end
            )));
        }
        mode.validate()?;

        let built = self.build_indicators(indicators);
        let required = indicators.len();

        let contributions: Vec<(InstrumentId, Vec<(NaiveDate, SignalAction)>)> =
            stream::iter(instruments.iter().copied())
                .map(|instrument| {
                    let built = &built;
                    async move {
                        let found = self
                            .instrument_contributions(instrument, window, built, mode, required)
                            .await;
                        (instrument, found)
                    }
                })
                .buffered(self.max_concurrent)
                .collect()
                .await;

        let mut events: BTreeMap<NaiveDate, SignalEvent> = BTreeMap::new();
        for (instrument, found) in contributions {
            for (date, action) in found {
                events
                    .entry(date)
                    .or_insert_with(|| SignalEvent::empty(date))
                    .add(instrument, action);
            }
        }

        let events: Vec<SignalEvent> = events.into_values().filter(|e| !e.is_empty()).collect();
        info!(
            instruments = instruments.len(),
            indicators = indicators.len(),
            mode = %mode,
            events = events.len(),
            "Signal aggregation complete"
        );
        Ok(events)
    }

    /// Build every configured indicator; ones that fail are logged and skipped.
    fn build_indicators(&self, indicators: &[ParameterizedIndicator]) -> Vec<Box<dyn Indicator>> {
        indicators
            .iter()
            .filter_map(|config| match self.registry.create(config) {
                Ok(indicator) => Some(indicator),
                Err(e) => {
                    warn!(
                        indicator = %config.indicator_type,
                        error = %e,
                        "Failed to build indicator"
                    );
                    None
                }
            })
            .collect()
    }

    async fn instrument_contributions(
        &self,
        instrument: InstrumentId,
        window: Window,
        indicators: &[Box<dyn Indicator>],
        mode: CombinationMode,
        required: usize,
    ) -> Vec<(NaiveDate, SignalAction)> {
        let prices = match self.provider.get_prices(instrument, window.history_end).await {
            Ok(prices) => prices,
            Err(e) => {
                warn!(instrument, error = %e, "Failed to fetch prices");
                return Vec::new();
            }
        };

        let mut signals = Vec::new();
        for indicator in indicators {
            match indicator.generate_signals(&prices) {
                Ok(generated) => {
                    signals.extend(generated.into_iter().filter(|s| s.date <= window.end))
                }
                Err(e) => warn!(
                    instrument,
                    indicator = %indicator.indicator_type(),
                    error = %e,
                    "Indicator failed"
                ),
            }
        }
        debug!(instrument, signals = signals.len(), "Generated signals");

        match mode {
            CombinationMode::Or => signals
                .iter()
                .filter(|s| s.date >= window.start && s.action != SignalAction::NoSignal)
                .map(|s| (s.date, s.action))
                .collect(),
            CombinationMode::And { days_limit } => {
                agreed_signals(&signals, window.start, days_limit, required)
            }
        }
    }
}

/// Dates and actions on which every indicator agrees.
///
/// Only signals on or after `start` take part. A (date, action) pair is
/// kept when the number of distinct indicator types that produced that
/// action within `[date - days_limit + 1, date]` equals `required`.
pub(crate) fn agreed_signals(
    signals: &[Signal],
    start: NaiveDate,
    days_limit: u32,
    required: usize,
) -> Vec<(NaiveDate, SignalAction)> {
    let candidates: Vec<&Signal> = signals
        .iter()
        .filter(|s| s.date >= start && s.action != SignalAction::NoSignal)
        .collect();

    let lookback = Days::new(u64::from(days_limit.saturating_sub(1)));
    let mut agreed = BTreeSet::new();

    for signal in &candidates {
        let window_start = signal.date.checked_sub_days(lookback).unwrap_or(NaiveDate::MIN);

        let sources: BTreeSet<IndicatorType> = candidates
            .iter()
            .filter(|other| {
                other.action == signal.action
                    && other.date >= window_start
                    && other.date <= signal.date
            })
            .map(|other| other.indicator_type)
            .collect();

        if sources.len() == required {
            agreed.insert((signal.date, signal.action));
        }
    }

    agreed.into_iter().collect()
}
