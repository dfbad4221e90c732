//! Data source trait definitions.
//!
//! Prices and instruments are owned by external collaborators (databases,
//! caches, file loaders). The engine only reads through these traits.

use crate::error::DataError;
use crate::types::{Instrument, InstrumentId, Price};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Trait for historical price sources.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetch an instrument's full price history up to and including `end`.
    ///
    /// # Returns
    /// Prices ordered from oldest to newest
    async fn get_prices(
        &self,
        instrument: InstrumentId,
        end: NaiveDate,
    ) -> Result<Vec<Price>, DataError>;

    /// Fetch the full price history of several instruments.
    ///
    /// Instruments without any prices are absent from the map.
    async fn get_prices_for(
        &self,
        instruments: &[InstrumentId],
    ) -> Result<HashMap<InstrumentId, Vec<Price>>, DataError>;
}

/// Trait for the registry of tradable instruments.
#[async_trait]
pub trait InstrumentRegistry: Send + Sync {
    /// All instruments known to the registry.
    async fn instruments(&self) -> Result<Vec<Instrument>, DataError>;

    /// The most recent price of each requested instrument.
    async fn current_prices(
        &self,
        instruments: &[InstrumentId],
    ) -> Result<HashMap<InstrumentId, Price>, DataError>;

    /// Ids of every known instrument.
    async fn instrument_ids(&self) -> Result<Vec<InstrumentId>, DataError> {
        Ok(self.instruments().await?.into_iter().map(|i| i.id).collect())
    }
}
