//! Simulation engine.

use chrono::NaiveDate;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use stockex_core::error::{StockexError, StockexResult};
use stockex_core::traits::{InstrumentRegistry, PriceProvider};
use stockex_core::types::{InstrumentId, Price, SignalAction, SignalEvent};
use stockex_strategies::{SignalAggregator, StrategyDefinition};
use tracing::{debug, info};

use crate::price_book::PriceBook;
use crate::report::SimulationResult;
use crate::statistics::{value_extremes, SimulationTransaction, TransactionExtremes};

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Initial cash
    pub start_budget: Decimal,
    /// Instruments to trade; every registered instrument when absent
    #[serde(default)]
    pub instrument_ids: Option<Vec<InstrumentId>>,
    /// Maximum spent on a single buy
    #[serde(default)]
    pub transaction_limit: Option<Decimal>,
}

impl SimulationConfig {
    /// Create a configuration trading every instrument without a transaction limit.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, start_budget: Decimal) -> Self {
        Self {
            start_date,
            end_date,
            start_budget,
            instrument_ids: None,
            transaction_limit: None,
        }
    }

    pub fn with_instruments(mut self, instrument_ids: Vec<InstrumentId>) -> Self {
        self.instrument_ids = Some(instrument_ids);
        self
    }

    pub fn with_transaction_limit(mut self, limit: Decimal) -> Self {
        self.transaction_limit = Some(limit);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> StockexResult<()> {
        if self.start_date > self.end_date {
            return Err(StockexError::Validation(format!(
                "start date {} is after end date {}",
                self.start_date, self.end_date
            )));
        }
        if self.start_budget <= Decimal::ZERO {
            return Err(StockexError::Validation(format!(
                "start budget must be positive, got {}",
                self.start_budget
            )));
        }
        if let Some(limit) = self.transaction_limit {
            if limit <= Decimal::ZERO {
                return Err(StockexError::Validation(format!(
                    "transaction limit must be positive, got {}",
                    limit
                )));
            }
        }
        Ok(())
    }
}

/// Runs a strategy's signals against price history under a budget.
pub struct SimulationEngine {
    aggregator: SignalAggregator,
    prices: Arc<dyn PriceProvider>,
    registry: Arc<dyn InstrumentRegistry>,
}

impl SimulationEngine {
    /// Create a new simulation engine.
    pub fn new(prices: Arc<dyn PriceProvider>, registry: Arc<dyn InstrumentRegistry>) -> Self {
        Self {
            aggregator: SignalAggregator::new(Arc::clone(&prices)),
            prices,
            registry,
        }
    }

    /// Limit how many instruments are evaluated at once during signal generation.
    pub fn with_concurrency(mut self, max_concurrent: usize) -> Self {
        self.aggregator = self.aggregator.with_concurrency(max_concurrent);
        self
    }

    /// Run a simulation.
    pub async fn run(
        &self,
        config: &SimulationConfig,
        strategy: &StrategyDefinition,
    ) -> StockexResult<SimulationResult> {
        config.validate()?;

        let instruments = match &config.instrument_ids {
            Some(ids) => ids.clone(),
            None => self.registry.instrument_ids().await?,
        };

        let events = self
            .aggregator
            .get_strategy_signals(config.start_date, config.end_date, &instruments, strategy)
            .await?;
        let histories = self.prices.get_prices_for(&instruments).await?;
        let current_prices = self.registry.current_prices(&instruments).await?;

        let mut result = simulate(config, &instruments, &events, &histories, &current_prices);
        result.strategy = strategy.name.clone();

        info!(
            strategy = %strategy.name,
            instruments = instruments.len(),
            events = events.len(),
            transactions = result.transactions.len(),
            profit_pct = %result.percentage_profit,
            "Simulation complete"
        );
        Ok(result)
    }
}

/// Replay signal events against price history.
///
/// Events are processed by ascending date, sells before buys. A sell
/// liquidates the whole holding of an instrument; a buy spends as much of
/// the budget (capped by the transaction limit) as whole shares allow.
/// Instruments without a close on the event date are skipped. Holdings
/// left at the end are valued at `current_prices`, falling back to the
/// latest close in `histories`.
///
/// `config` must already be validated.
pub(crate) fn simulate(
    config: &SimulationConfig,
    instruments: &[InstrumentId],
    events: &[SignalEvent],
    histories: &HashMap<InstrumentId, Vec<Price>>,
    current_prices: &HashMap<InstrumentId, Price>,
) -> SimulationResult {
    let book = PriceBook::new(histories);
    let mut budget = config.start_budget;
    let mut holdings: BTreeMap<InstrumentId, u64> = BTreeMap::new();
    let mut ledger = Vec::new();
    let mut extremes = TransactionExtremes::new(config.start_budget);

    let mut ordered: Vec<&SignalEvent> = events.iter().collect();
    ordered.sort_by_key(|e| e.date);

    for event in ordered {
        // Sells, highest price first
        let mut sells: Vec<(InstrumentId, Decimal)> = event
            .to_sell
            .iter()
            .filter(|id| holdings.contains_key(*id))
            .filter_map(|id| book.close_on(*id, event.date).map(|price| (*id, price)))
            .collect();
        sells.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        for (id, price) in sells {
            let Some(quantity) = holdings.remove(&id) else {
                continue;
            };
            budget += price * Decimal::from(quantity);

            let transaction = SimulationTransaction {
                date: event.date,
                instrument_id: id,
                price,
                quantity,
                action: SignalAction::Sell,
                budget_after: budget,
            };
            debug!(instrument = id, date = %event.date, quantity, price = %price, budget = %budget, "Sell");
            extremes.record_sale(event.date, budget);
            ledger.push(transaction);
        }

        // Buys in set order
        for id in &event.to_buy {
            let Some(price) = book.close_on(*id, event.date) else {
                continue;
            };

            let cap = match config.transaction_limit {
                Some(limit) => budget.min(limit),
                None => budget,
            };
            if price <= Decimal::ZERO || cap <= price {
                continue;
            }

            let quantity = (cap / price).floor().to_u64().unwrap_or(0);
            if quantity == 0 {
                continue;
            }
            budget -= price * Decimal::from(quantity);
            *holdings.entry(*id).or_insert(0) += quantity;

            debug!(instrument = *id, date = %event.date, quantity, price = %price, budget = %budget, "Buy");
            ledger.push(SimulationTransaction {
                date: event.date,
                instrument_id: *id,
                price,
                quantity,
                action: SignalAction::Buy,
                budget_after: budget,
            });
        }
    }

    let holdings_value: Decimal = holdings
        .iter()
        .map(|(id, quantity)| {
            let price = current_prices
                .get(id)
                .map(|p| Decimal::try_from(p.close).unwrap_or_default())
                .or_else(|| book.last_close(*id))
                .unwrap_or_default();
            price * Decimal::from(*quantity)
        })
        .sum();
    let total_value = holdings_value + budget;
    let percentage_profit =
        ((total_value - config.start_budget) / config.start_budget * dec!(100)).round_dp(2);

    let (max_simulation_value, min_simulation_value) = value_extremes(
        config.start_date,
        config.end_date,
        config.start_budget,
        instruments,
        &ledger,
        &book,
    );

    SimulationResult {
        strategy: String::new(),
        start_date: config.start_date,
        end_date: config.end_date,
        transactions: ledger,
        current_holdings: holdings,
        start_budget: config.start_budget,
        ending_budget: budget,
        total_value,
        percentage_profit,
        max_gain_on_transaction: extremes.max_gain,
        max_loss_on_transaction: extremes.max_loss,
        max_simulation_value,
        min_simulation_value,
    }
}
