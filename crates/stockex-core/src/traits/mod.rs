//! Core traits for the signal and simulation engine.

mod data_source;
mod indicator;

pub use data_source::{InstrumentRegistry, PriceProvider};
pub use indicator::Indicator;
