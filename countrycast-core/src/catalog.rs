//! Country dataset held in memory, with an explicit loading state.
//!
//! The list is published once by [`CountryCatalog::load_from`]; lookups wait
//! for that publication instead of sleeping for a fixed time.

use std::{sync::Arc, time::Duration};
use tokio::sync::watch;

use crate::{
    error::LookupError,
    model::{CountryDetails, CountryRecord},
    provider::CountrySource,
};

#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Loaded(Arc<[CountryRecord]>),
}

#[derive(Debug, Clone)]
pub struct CountryCatalog {
    tx: Arc<watch::Sender<LoadState>>,
}

impl Default for CountryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CountryCatalog {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(LoadState::Loading);
        Self { tx: Arc::new(tx) }
    }

    /// A catalog that is already loaded with `records`.
    pub fn with_records(records: Vec<CountryRecord>) -> Self {
        let catalog = Self::new();
        catalog.publish(records);
        catalog
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.tx.borrow(), LoadState::Loaded(_))
    }

    /// Publish the list. Only the first call has any effect.
    pub fn publish(&self, records: Vec<CountryRecord>) -> bool {
        let count = records.len();

        let published = self.tx.send_if_modified(|state| {
            if !matches!(state, LoadState::Loading) {
                return false;
            }
            *state = LoadState::Loaded(records.into());
            true
        });

        if published {
            log::info!("Country dataset loaded: {count} countries");
        } else {
            log::warn!("Country dataset already loaded, ignoring second publish");
        }
        published
    }

    /// Fetch the dataset from `source` and publish it.
    ///
    /// A failed fetch is logged and publishes an empty list, so every later
    /// lookup ends in not-found rather than waiting forever.
    pub async fn load_from(&self, source: &dyn CountrySource) {
        match source.fetch_all().await {
            Ok(records) => {
                self.publish(records);
            }
            Err(e) => {
                log::error!("Failed to load country dataset: {e}");
                self.publish(Vec::new());
            }
        }
    }

    /// Wait until the list is published, at most `timeout`.
    pub async fn ready(&self, timeout: Duration) -> Result<Arc<[CountryRecord]>, LookupError> {
        let mut rx = self.tx.subscribe();

        let wait = rx.wait_for(|state| matches!(state, LoadState::Loaded(_)));
        let state = match tokio::time::timeout(timeout, wait).await {
            Ok(Ok(state)) => state.clone(),
            // The sender lives as long as `self`, so a closed channel cannot happen here.
            Ok(Err(_)) | Err(_) => return Err(LookupError::DatasetNotReady(timeout)),
        };

        match state {
            LoadState::Loaded(records) => Ok(records),
            LoadState::Loading => Err(LookupError::DatasetNotReady(timeout)),
        }
    }

    /// Case-insensitive lookup by common name, after waiting for the dataset.
    pub async fn resolve(
        &self,
        query: &str,
        timeout: Duration,
    ) -> Result<CountryDetails, LookupError> {
        let records = self.ready(timeout).await?;
        find_country(&records, query)
    }
}

/// Linear case-insensitive search over `records`.
pub fn find_country(records: &[CountryRecord], query: &str) -> Result<CountryDetails, LookupError> {
    let needle = query.trim().to_lowercase();

    records
        .iter()
        .find(|record| record.name.to_lowercase() == needle)
        .map(CountryDetails::from)
        .ok_or(LookupError::NotFound(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinate, Currency};
    use async_trait::async_trait;

    fn record(name: &str, lat: f64, lon: f64) -> CountryRecord {
        CountryRecord {
            name: name.to_string(),
            flag_url: format!("https://flagcdn.com/w320/{}.png", &name[..2].to_lowercase()),
            latitude: Coordinate::from_raw(Some(lat)),
            longitude: Coordinate::from_raw(Some(lon)),
            currencies: vec![Currency {
                code: "EUR".into(),
                name: Some("Euro".into()),
                symbol: Some("€".into()),
            }],
        }
    }

    #[derive(Debug)]
    struct FailingSource;

    #[async_trait]
    impl CountrySource for FailingSource {
        async fn fetch_all(&self) -> Result<Vec<CountryRecord>, LookupError> {
            Err(LookupError::DatasetLoad("connection refused".into()))
        }
    }

    #[test]
    fn find_is_case_insensitive() {
        let records = vec![record("Germany", 51.0, 9.0), record("France", 46.0, 2.0)];

        for query in ["France", "france", "FRANCE", "  fRaNcE "] {
            let details = find_country(&records, query).expect("France must resolve");
            assert_eq!(details.name, "France");
            assert_eq!(details.coordinates(), Some((46.0, 2.0)));
        }
    }

    #[test]
    fn find_unknown_is_not_found() {
        let records = vec![record("France", 46.0, 2.0)];
        let err = find_country(&records, "Atlantis").unwrap_err();

        assert!(matches!(err, LookupError::NotFound(ref n) if n == "atlantis"));
    }

    #[test]
    fn second_publish_is_ignored() {
        let catalog = CountryCatalog::new();
        assert!(!catalog.is_loaded());

        assert!(catalog.publish(vec![record("France", 46.0, 2.0)]));
        assert!(!catalog.publish(Vec::new()));
        assert!(catalog.is_loaded());
    }

    #[tokio::test]
    async fn resolve_waits_for_background_load() {
        let catalog = CountryCatalog::new();

        let loader = catalog.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            loader.publish(vec![record("France", 46.0, 2.0)]);
        });

        let details = catalog
            .resolve("france", Duration::from_secs(5))
            .await
            .expect("resolve after load");
        assert_eq!(details.name, "France");
    }

    #[tokio::test]
    async fn preloaded_catalog_resolves_without_waiting() {
        let catalog = CountryCatalog::with_records(vec![record("France", 46.0, 2.0)]);
        assert!(catalog.is_loaded());

        let details = catalog
            .resolve("FRANCE", Duration::from_millis(1))
            .await
            .expect("already loaded");
        assert_eq!(details.flag, "https://flagcdn.com/w320/fr.png");
    }

    #[tokio::test]
    async fn resolve_times_out_when_never_loaded() {
        let catalog = CountryCatalog::new();
        let err = catalog.resolve("france", Duration::from_millis(10)).await.unwrap_err();

        assert!(matches!(err, LookupError::DatasetNotReady(_)));
    }

    #[tokio::test]
    async fn failed_load_leaves_empty_list() {
        let catalog = CountryCatalog::new();
        catalog.load_from(&FailingSource).await;

        assert!(catalog.is_loaded());
        let err = catalog.resolve("France", Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, LookupError::NotFound(_)));
    }
}
