//! Crossover detection between two aligned lines.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use stockex_core::types::IndicatorValue;

/// Which line ends up on top after a crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverKind {
    /// The first line moved above the second
    FirstAbove,
    /// The second line moved above the first
    SecondAbove,
}

/// A dated crossover of two lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crossover {
    pub date: NaiveDate,
    pub kind: CrossoverKind,
}

fn scan(points: impl Iterator<Item = (NaiveDate, f64, f64)>) -> Vec<Crossover> {
    let mut crossovers = Vec::new();
    // Side of the last date where the lines were apart; touching keeps it.
    let mut last_side: Option<Ordering> = None;

    for (date, first, second) in points {
        let side = match first.partial_cmp(&second) {
            Some(Ordering::Equal) | None => continue,
            Some(side) => side,
        };

        if let Some(prev) = last_side {
            if prev != side {
                let kind = if side == Ordering::Greater {
                    CrossoverKind::FirstAbove
                } else {
                    CrossoverKind::SecondAbove
                };
                crossovers.push(Crossover { date, kind });
            }
        }
        last_side = Some(side);
    }

    crossovers
}

/// Find the dates where two aligned series swap order.
///
/// Series are compared element by element; extra trailing elements of the
/// longer series are ignored. Each event is dated at the later of the two
/// compared dates, and lines that touch without crossing produce nothing.
pub fn find_crossovers(first: &[IndicatorValue], second: &[IndicatorValue]) -> Vec<Crossover> {
    scan(
        first
            .iter()
            .zip(second)
            .map(|(a, b)| (a.date, a.value(), b.value())),
    )
}

/// Find crossovers between the two lines of a dual-line series.
///
/// Single-line points carry nothing to compare and are skipped.
pub fn find_line_crossovers(values: &[IndicatorValue]) -> Vec<Crossover> {
    scan(
        values
            .iter()
            .filter_map(|v| v.second_line_value().map(|second| (v.date, v.value(), second))),
    )
}
