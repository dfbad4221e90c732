//! Strategy definitions and signal aggregation.
//!
//! This crate turns configured indicators into per-date trading events:
//! - Strategy definitions (indicators plus an OR/AND combination mode)
//! - The signal aggregator that fans out over instruments
//! - Indicator value series for many instruments

mod aggregator;
mod strategy;
mod values;

pub use aggregator::{SignalAggregator, DEFAULT_MAX_CONCURRENT_INSTRUMENTS};
pub use strategy::{CombinationMode, StrategyDefinition};
pub use values::{compute_indicator_values, InstrumentIndicatorValues};
