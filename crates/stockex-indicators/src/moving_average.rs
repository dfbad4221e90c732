//! Moving average helpers.
//!
//! Both averages are seeded with the simple mean of the first `term`
//! values and emit one output per input from index `term - 1` onward,
//! so an input of length `n` yields `n - term + 1` outputs.

use stockex_core::error::IndicatorError;
use stockex_core::types::{IndicatorValue, Price};

fn check_length(available: usize, term: usize) -> Result<(), IndicatorError> {
    if available < term {
        return Err(IndicatorError::InsufficientData {
            required: term,
            available,
        });
    }
    Ok(())
}

/// Smoothed moving average over raw values.
///
/// `avg = prev + (value - prev) / term`
pub fn smma(data: &[f64], term: usize) -> Result<Vec<f64>, IndicatorError> {
    if term <= 1 {
        return Err(IndicatorError::InvalidParameter(format!(
            "smoothed moving average term must be greater than 1, got {}",
            term
        )));
    }
    check_length(data.len(), term)?;

    let term_f64 = term as f64;
    let mut result = Vec::with_capacity(data.len() - term + 1);

    // Initialize with SMA
    let mut avg: f64 = data[..term].iter().sum::<f64>() / term_f64;
    result.push(avg);

    for &value in &data[term..] {
        avg += (value - avg) / term_f64;
        result.push(avg);
    }

    Ok(result)
}

/// Exponential moving average over raw values.
///
/// `ema = value * k + prev * (1 - k)` with `k = 2 / (term + 1)`
pub fn ema(data: &[f64], term: usize) -> Result<Vec<f64>, IndicatorError> {
    if term == 0 {
        return Err(IndicatorError::InvalidParameter(
            "exponential moving average term must be greater than 0".into(),
        ));
    }
    check_length(data.len(), term)?;

    let multiplier = 2.0 / (term as f64 + 1.0);
    let one_minus_mult = 1.0 - multiplier;
    let mut result = Vec::with_capacity(data.len() - term + 1);

    // Initialize with SMA
    let mut avg: f64 = data[..term].iter().sum::<f64>() / term as f64;
    result.push(avg);

    for &value in &data[term..] {
        avg = value * multiplier + avg * one_minus_mult;
        result.push(avg);
    }

    Ok(result)
}

/// Re-attach dates to averaged values; the first output belongs to `series[term - 1]`.
fn dated(series: &[IndicatorValue], term: usize, averaged: Vec<f64>) -> Vec<IndicatorValue> {
    series[term - 1..]
        .iter()
        .zip(averaged)
        .map(|(point, value)| IndicatorValue::single(point.date, value))
        .collect()
}

fn primary_values(series: &[IndicatorValue]) -> Vec<f64> {
    series.iter().map(IndicatorValue::value).collect()
}

/// Smoothed moving average of a dated value series.
pub fn smoothed_moving_average(
    series: &[IndicatorValue],
    term: usize,
) -> Result<Vec<IndicatorValue>, IndicatorError> {
    let averaged = smma(&primary_values(series), term)?;
    Ok(dated(series, term, averaged))
}

/// Exponential moving average of a dated value series.
///
/// Accepts any indicator output so averages can be chained (e.g. the
/// MACD signal line is the EMA of the MACD line).
pub fn exponential_moving_average(
    series: &[IndicatorValue],
    term: usize,
) -> Result<Vec<IndicatorValue>, IndicatorError> {
    let averaged = ema(&primary_values(series), term)?;
    Ok(dated(series, term, averaged))
}

/// Closing prices as a dated value series.
pub fn close_series(prices: &[Price]) -> Vec<IndicatorValue> {
    prices
        .iter()
        .map(|p| IndicatorValue::single(p.date, p.close))
        .collect()
}

/// Exponential moving average of closing prices.
pub fn close_exponential_moving_average(
    prices: &[Price],
    term: usize,
) -> Result<Vec<IndicatorValue>, IndicatorError> {
    exponential_moving_average(&close_series(prices), term)
}
