//! CLI command implementations.

pub mod indicators;
pub mod signals;
pub mod simulate;
pub mod validate;

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use stockex_config::AppConfig;
use stockex_core::traits::InstrumentRegistry;
use stockex_core::types::InstrumentId;
use stockex_data::{load_csv_directory, InMemoryPriceStore};
use tracing::info;

use crate::cli::DataArgs;

/// Load the price store from the CLI or configured data directory.
pub(crate) async fn load_store(args: &DataArgs, config: &AppConfig) -> Result<Arc<InMemoryPriceStore>> {
    let dir = match &args.data {
        Some(path) => path.display().to_string(),
        None => config.data.directory.clone(),
    };

    let store = load_csv_directory(&dir).await.with_context(|| {
        format!(
            "Failed to load price data from '{}'. Provide a directory of <CODE>.csv files (e.g. --data ./data)",
            dir
        )
    })?;
    info!("Loaded {} instruments from {}", store.len(), dir);
    Ok(Arc::new(store))
}

/// Resolve instrument codes to ids; every instrument when no code is given.
pub(crate) async fn resolve_instruments(
    store: &InMemoryPriceStore,
    codes: &[String],
) -> Result<Vec<InstrumentId>> {
    if codes.is_empty() {
        return Ok(store.instrument_ids().await?);
    }

    codes
        .iter()
        .map(|code| {
            store
                .instrument_by_code(code)
                .map(|i| i.id)
                .with_context(|| format!("Unknown instrument '{}'", code))
        })
        .collect()
}

/// Instrument codes keyed by id, for display.
pub(crate) async fn instrument_codes(store: &InMemoryPriceStore) -> Result<HashMap<InstrumentId, String>> {
    Ok(store
        .instruments()
        .await?
        .into_iter()
        .map(|i| (i.id, i.code))
        .collect())
}
