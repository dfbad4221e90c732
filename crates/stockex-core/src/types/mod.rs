//! Core data types for the signal and simulation engine.

mod indicator;
mod price;
mod signal;

pub use indicator::{
    IndicatorProperty, IndicatorReading, IndicatorType, IndicatorValue, ParameterSpec,
    ParameterizedIndicator,
};
pub use price::{validate_series, Instrument, InstrumentId, Price};
pub use signal::{Signal, SignalAction, SignalEvent};
