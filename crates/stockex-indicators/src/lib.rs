//! Technical indicators.
//!
//! This crate provides the indicator building blocks:
//! - Moving averages (smoothed and exponential) over dated value series
//! - Crossover detection between two aligned lines
//! - Indicators: ATR with an EMA trend filter, MACD with its signal line
//! - A registry that describes every indicator's parameters and builds
//!   configured instances

pub mod crossover;
pub mod momentum;
pub mod moving_average;
pub mod registry;
pub mod volatility;

pub use crossover::{find_crossovers, find_line_crossovers, Crossover, CrossoverKind};
pub use momentum::Macd;
pub use moving_average::{
    close_exponential_moving_average, close_series, exponential_moving_average,
    smoothed_moving_average,
};
pub use registry::{IndicatorInfo, IndicatorRegistry};
pub use volatility::{true_range_series, Atr};
