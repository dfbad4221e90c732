//! CSV data source.

use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use stockex_core::error::DataError;
use stockex_core::types::{Instrument, InstrumentId, Price};
use tracing::{debug, info};

use crate::memory::InMemoryPriceStore;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Directory of per-instrument CSV files (`<CODE>.csv`).
///
/// Instrument ids are assigned from 1 in file name order.
pub struct CsvDataSource {
    dir: PathBuf,
}

impl CsvDataSource {
    /// Create a new CSV data source.
    pub fn new(path: &str) -> Result<Self, DataError> {
        let dir = PathBuf::from(path);
        if !dir.is_dir() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(Self { dir })
    }

    /// CSV files in the directory, sorted by name.
    fn csv_files(&self) -> Result<Vec<PathBuf>, DataError> {
        let entries =
            std::fs::read_dir(&self.dir).map_err(|e| DataError::Internal(e.to_string()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| DataError::Internal(e.to_string()))?.path();
            let is_csv = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if is_csv {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Load every file in the directory into an in-memory store.
    pub async fn load_store(&self) -> Result<InMemoryPriceStore, DataError> {
        let files = self.csv_files()?;
        if files.is_empty() {
            return Err(DataError::NoDataAvailable);
        }

        tokio::task::spawn_blocking(move || load_files(&files))
            .await
            .map_err(|e| DataError::Internal(e.to_string()))?
    }
}

fn load_files(files: &[PathBuf]) -> Result<InMemoryPriceStore, DataError> {
    let mut store = InMemoryPriceStore::new();

    for (index, path) in files.iter().enumerate() {
        let id = index as InstrumentId + 1;
        let code = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| DataError::ParseError(format!("invalid file name: {}", path.display())))?;

        let prices = load_path(path, id)?;
        debug!(instrument = code, id, count = prices.len(), "Loaded price file");
        store.insert(Instrument::new(id, code.to_uppercase(), code), prices)?;
    }

    info!(instruments = store.len(), "Loaded CSV price directory");
    Ok(store)
}

fn load_path(path: &Path, instrument_id: InstrumentId) -> Result<Vec<Price>, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Internal(e.to_string()))?;
    read_prices(file, instrument_id)
}

/// Read daily prices from CSV with a header row.
pub(crate) fn read_prices<R: Read>(
    source: R,
    instrument_id: InstrumentId,
) -> Result<Vec<Price>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut prices = Vec::new();

    for result in reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;

        prices.push(Price::new(
            instrument_id,
            parse_date(&record.date)?,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        ));
    }

    // Sort by date
    prices.sort_by_key(|p| p.date);

    Ok(prices)
}

/// Parse various date formats.
fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y"];

    for format in formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}
