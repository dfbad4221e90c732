//! Core types and traits for the signal and simulation engine.
//!
//! This crate provides the foundational building blocks including:
//! - Daily price data (`Price`)
//! - Indicator output values, signals and per-date signal events
//! - The indicator parameter schema types
//! - Core traits for indicators and the price/instrument data sources

pub mod types;
pub mod traits;
pub mod error;

pub use error::{DataError, IndicatorError, StockexError, StockexResult};
pub use types::*;
pub use traits::*;
