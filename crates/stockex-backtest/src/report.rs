//! Simulation result reporting.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stockex_core::types::{InstrumentId, SignalAction};

use crate::statistics::{ExtremeSimulationValue, ExtremeTransactionResult, SimulationTransaction};

/// Complete simulation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Strategy that produced the signals
    pub strategy: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Ledger in execution order
    pub transactions: Vec<SimulationTransaction>,
    /// Quantity held per instrument at the end
    pub current_holdings: BTreeMap<InstrumentId, u64>,
    pub start_budget: Decimal,
    /// Cash left at the end
    pub ending_budget: Decimal,
    /// Holdings at current prices plus remaining cash
    pub total_value: Decimal,
    pub percentage_profit: Decimal,
    pub max_gain_on_transaction: Option<ExtremeTransactionResult>,
    pub max_loss_on_transaction: Option<ExtremeTransactionResult>,
    pub max_simulation_value: Option<ExtremeSimulationValue>,
    pub min_simulation_value: Option<ExtremeSimulationValue>,
}

impl SimulationResult {
    /// Number of buy transactions.
    pub fn buy_count(&self) -> usize {
        self.count(SignalAction::Buy)
    }

    /// Number of sell transactions.
    pub fn sell_count(&self) -> usize {
        self.count(SignalAction::Sell)
    }

    fn count(&self, action: SignalAction) -> usize {
        self.transactions.iter().filter(|t| t.action == action).count()
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                    SIMULATION REPORT                       \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Strategy:            {}\n", self.strategy));
        s.push_str(&format!(
            "  Period:              {} to {}\n",
            self.start_date, self.end_date
        ));
        s.push('\n');

        s.push_str("PERFORMANCE\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Start Budget:        {:.2}\n", self.start_budget));
        s.push_str(&format!("  Ending Budget:       {:.2}\n", self.ending_budget));
        s.push_str(&format!("  Total Value:         {:.2}\n", self.total_value));
        s.push_str(&format!(
            "  Profit:              {:.2}%\n",
            self.percentage_profit
        ));
        s.push('\n');

        s.push_str("EXTREMES\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        match &self.max_gain_on_transaction {
            Some(gain) => s.push_str(&format!(
                "  Max Gain:            {:.2}% on {}\n",
                gain.percentage(),
                gain.date
            )),
            None => s.push_str("  Max Gain:            -\n"),
        }
        match &self.max_loss_on_transaction {
            Some(loss) => s.push_str(&format!(
                "  Max Loss:            {:.2}% on {}\n",
                loss.percentage(),
                loss.date
            )),
            None => s.push_str("  Max Loss:            -\n"),
        }
        match &self.max_simulation_value {
            Some(max) => s.push_str(&format!(
                "  Highest Value:       {:.2} ({:.2}%) on {}\n",
                max.value,
                max.percentage_change(),
                max.date
            )),
            None => s.push_str("  Highest Value:       -\n"),
        }
        match &self.min_simulation_value {
            Some(min) => s.push_str(&format!(
                "  Lowest Value:        {:.2} ({:.2}%) on {}\n",
                min.value,
                min.percentage_change(),
                min.date
            )),
            None => s.push_str("  Lowest Value:        -\n"),
        }
        s.push('\n');

        s.push_str("TRANSACTIONS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Total:               {}\n", self.transactions.len()));
        s.push_str(&format!("  Buys:                {}\n", self.buy_count()));
        s.push_str(&format!("  Sells:               {}\n", self.sell_count()));
        s.push_str(&format!(
            "  Open Positions:      {}\n",
            self.current_holdings.len()
        ));
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export the ledger to CSV.
    pub fn transactions_to_csv(&self) -> String {
        let mut csv = String::from("date,instrument_id,action,quantity,price,budget_after\n");
        for t in &self.transactions {
            csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                t.date, t.instrument_id, t.action, t.quantity, t.price, t.budget_after
            ));
        }
        csv
    }
}
