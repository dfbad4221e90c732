//! In-memory price and instrument store.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use stockex_core::error::DataError;
use stockex_core::traits::{InstrumentRegistry, PriceProvider};
use stockex_core::types::{validate_series, Instrument, InstrumentId, Price};

/// Price histories and instruments held in memory.
///
/// Serves as both the price provider and the instrument registry for the
/// signal aggregator and the simulation engine.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPriceStore {
    instruments: BTreeMap<InstrumentId, Instrument>,
    prices: HashMap<InstrumentId, Vec<Price>>,
}

impl InMemoryPriceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instrument together with its price history.
    ///
    /// Prices are sorted by date and must then be strictly increasing and
    /// belong to the instrument.
    pub fn insert(&mut self, instrument: Instrument, mut prices: Vec<Price>) -> Result<(), DataError> {
        if let Some(foreign) = prices.iter().find(|p| p.instrument_id != instrument.id) {
            return Err(DataError::Internal(format!(
                "price for instrument {} supplied to instrument {}",
                foreign.instrument_id, instrument.id
            )));
        }

        prices.sort_by_key(|p| p.date);
        validate_series(&prices)?;

        self.prices.insert(instrument.id, prices);
        self.instruments.insert(instrument.id, instrument);
        Ok(())
    }

    /// Look up an instrument by its code (case-insensitive).
    pub fn instrument_by_code(&self, code: &str) -> Option<&Instrument> {
        self.instruments
            .values()
            .find(|i| i.code.eq_ignore_ascii_case(code))
    }

    /// Number of registered instruments.
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Check if no instrument is registered.
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Earliest and latest date across all stored prices.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.prices.values().filter_map(|p| p.first()).map(|p| p.date).min()?;
        let last = self.prices.values().filter_map(|p| p.last()).map(|p| p.date).max()?;
        Some((first, last))
    }
}

#[async_trait]
impl PriceProvider for InMemoryPriceStore {
    async fn get_prices(
        &self,
        instrument: InstrumentId,
        end: NaiveDate,
    ) -> Result<Vec<Price>, DataError> {
        let prices = self
            .prices
            .get(&instrument)
            .ok_or(DataError::InstrumentNotFound(instrument))?;

        Ok(prices.iter().take_while(|p| p.date <= end).copied().collect())
    }

    async fn get_prices_for(
        &self,
        instruments: &[InstrumentId],
    ) -> Result<HashMap<InstrumentId, Vec<Price>>, DataError> {
        Ok(instruments
            .iter()
            .filter_map(|id| {
                self.prices
                    .get(id)
                    .filter(|prices| !prices.is_empty())
                    .map(|prices| (*id, prices.clone()))
            })
            .collect())
    }
}

#[async_trait]
impl InstrumentRegistry for InMemoryPriceStore {
    async fn instruments(&self) -> Result<Vec<Instrument>, DataError> {
        Ok(self.instruments.values().cloned().collect())
    }

    async fn current_prices(
        &self,
        instruments: &[InstrumentId],
    ) -> Result<HashMap<InstrumentId, Price>, DataError> {
        Ok(instruments
            .iter()
            .filter_map(|id| {
                self.prices
                    .get(id)
                    .and_then(|prices| prices.last())
                    .map(|price| (*id, *price))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn price(id: InstrumentId, d: u32, close: f64) -> Price {
        Price::new(id, date(d), close, close, close, close, 100.0)
    }

    fn store() -> InMemoryPriceStore {
        let mut store = InMemoryPriceStore::new();
        store
            .insert(
                Instrument::new(1, "AAA", "Alpha"),
                vec![price(1, 3, 12.0), price(1, 1, 10.0), price(1, 2, 11.0)],
            )
            .unwrap();
        store
            .insert(Instrument::new(2, "BBB", "Beta"), vec![price(2, 2, 50.0)])
            .unwrap();
        store
            .insert(Instrument::new(3, "CCC", "Gamma"), Vec::new())
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_get_prices_up_to_end() {
        let store = store();

        let prices = store.get_prices(1, date(2)).await.unwrap();
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].date, date(1));
        assert_eq!(prices[1].close, 11.0);

        assert!(matches!(
            store.get_prices(9, date(2)).await,
            Err(DataError::InstrumentNotFound(9))
        ));
    }

    #[tokio::test]
    async fn test_get_prices_for_skips_empty() {
        let store = store();
        let map = store.get_prices_for(&[1, 2, 3, 4]).await.unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map[&1].len(), 3);
        assert!(!map.contains_key(&3));
    }

    #[tokio::test]
    async fn test_registry() {
        let store = store();

        assert_eq!(store.instrument_ids().await.unwrap(), vec![1, 2, 3]);
        let current = store.current_prices(&[1, 2, 3]).await.unwrap();
        assert_eq!(current[&1].close, 12.0);
        assert_eq!(current[&2].close, 50.0);
        assert!(!current.contains_key(&3));

        assert_eq!(store.instrument_by_code("bbb").map(|i| i.id), Some(2));
        assert_eq!(store.date_range(), Some((date(1), date(3))));
    }

    #[test]
    fn test_insert_rejects_bad_series() {
        let mut store = InMemoryPriceStore::new();

        let duplicate = vec![price(1, 1, 10.0), price(1, 1, 11.0)];
        assert!(store.insert(Instrument::new(1, "AAA", "Alpha"), duplicate).is_err());

        let foreign = vec![price(2, 1, 10.0)];
        assert!(store.insert(Instrument::new(1, "AAA", "Alpha"), foreign).is_err());
        assert!(store.is_empty());
    }
}
