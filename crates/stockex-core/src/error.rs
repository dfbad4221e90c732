//! Error types for the signal and simulation engine.

use thiserror::Error;

use crate::types::InstrumentId;

/// Top-level error.
#[derive(Error, Debug)]
pub enum StockexError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown indicator: {0}")]
    UnknownIndicator(String),
}

/// Price and instrument data source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Instrument not found: {0}")]
    InstrumentNotFound(InstrumentId),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Result type alias for engine operations.
pub type StockexResult<T> = Result<T, StockexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = IndicatorError::InsufficientData {
            required: 14,
            available: 3,
        };
        assert_eq!(err.to_string(), "Insufficient data: need 14 points, have 3");
    }

    #[test]
    fn test_indicator_error_converts_to_top_level() {
        let err: StockexError = IndicatorError::InvalidParameter("Term must be > 1".into()).into();
        assert!(matches!(err, StockexError::Indicator(_)));
        assert_eq!(
            err.to_string(),
            "Indicator error: Invalid parameter: Term must be > 1"
        );
    }
}
