//! Strategy simulation engine.

mod engine;
mod price_book;
mod report;
mod statistics;

pub use engine::{SimulationConfig, SimulationEngine};
pub use report::SimulationResult;
pub use statistics::{
    apply_transaction, replay_holdings, ExtremeSimulationValue, ExtremeTransactionResult,
    SimulationTransaction,
};
