//! Price and instrument data sources.

mod csv_source;
mod memory;

pub use csv_source::CsvDataSource;
pub use memory::InMemoryPriceStore;

use stockex_core::error::DataError;

/// Load a directory of per-instrument CSV files into an in-memory store.
pub async fn load_csv_directory(path: &str) -> Result<InMemoryPriceStore, DataError> {
    let source = CsvDataSource::new(path)?;
    source.load_store().await
}
