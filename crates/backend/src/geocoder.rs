use async_trait::async_trait;
use spotlight_shared::error::GeocodeError;
use spotlight_shared::geocode::{nominatim_url, parse_nominatim, Geocoder};
use spotlight_shared::models::Coordinate;
use std::sync::Arc;

use crate::config::Config;
use crate::storage::Storage;

/// Nominatim search over HTTP.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: &Config) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(config.geocoder_user_agent.clone())
            .timeout(config.geocoder_timeout)
            .build()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;
        Ok(NominatimGeocoder {
            client,
            base_url: config.geocoder_url.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn lookup(&self, place: &str) -> Result<Coordinate, GeocodeError> {
        let url = nominatim_url(&self.base_url, place)?;
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(GeocodeError::Status(resp.status().as_u16()));
        }
        let body = resp
            .text()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;
        parse_nominatim(&body)
    }
}

/// Wraps another geocoder with the redb cache so each place name is fetched once.
/// Transport and status failures are not cached.
pub struct CachedGeocoder {
    inner: Arc<dyn Geocoder>,
    storage: Arc<Storage>,
}

impl CachedGeocoder {
    pub fn new(inner: Arc<dyn Geocoder>, storage: Arc<Storage>) -> Self {
        CachedGeocoder { inner, storage }
    }

    fn remember(&self, place: &str, result: Option<Coordinate>) {
        if let Err(err) = self.storage.store_geocode(place, result) {
            tracing::warn!(%place, %err, "failed to cache geocode result");
        }
    }
}

#[async_trait]
impl Geocoder for CachedGeocoder {
    async fn lookup(&self, place: &str) -> Result<Coordinate, GeocodeError> {
        match self.storage.cached_geocode(place) {
            Ok(Some(Some(coord))) => return Ok(coord),
            Ok(Some(None)) => return Err(GeocodeError::NoMatch),
            Ok(None) => {}
            Err(err) => tracing::warn!(%place, %err, "geocode cache unreadable"),
        }

        let result = self.inner.lookup(place).await;
        match &result {
            Ok(coord) => self.remember(place, Some(*coord)),
            Err(GeocodeError::NoMatch) => self.remember(place, None),
            Err(_) => {}
        }
        tracing::debug!(%place, hit = result.is_ok(), "geocode lookup");
        result
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers from a fixed table and counts outbound calls.
    pub(crate) struct TableGeocoder {
        pub places: HashMap<String, Coordinate>,
        pub calls: AtomicUsize,
        pub fail_transport: bool,
    }

    impl TableGeocoder {
        pub(crate) fn new(places: &[(&str, Coordinate)]) -> Self {
            TableGeocoder {
                places: places
                    .iter()
                    .map(|(p, c)| (p.to_lowercase(), *c))
                    .collect(),
                calls: AtomicUsize::new(0),
                fail_transport: false,
            }
        }
    }

    #[async_trait]
    impl Geocoder for TableGeocoder {
        async fn lookup(&self, place: &str) -> Result<Coordinate, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_transport {
                return Err(GeocodeError::Transport("connection refused".to_string()));
            }
            self.places
                .get(&place.trim().to_lowercase())
                .copied()
                .ok_or(GeocodeError::NoMatch)
        }
    }

    fn temp_storage() -> (tempfile::TempDir, Arc<Storage>) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(&dir.path().join("geo.redb")).unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn test_each_place_fetched_once() {
        let (_dir, storage) = temp_storage();
        let boise = Coordinate::new(43.615, -116.2023);
        let inner = Arc::new(TableGeocoder::new(&[("Boise", boise)]));
        let cached = CachedGeocoder::new(inner.clone(), storage);

        assert_eq!(cached.resolve("Boise").await, Some(boise));
        assert_eq!(cached.resolve(" boise ").await, Some(boise));
        assert_eq!(cached.resolve("Atlantis").await, None);
        assert_eq!(cached.resolve("atlantis").await, None);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_transport_failures_are_retried_later() {
        let (_dir, storage) = temp_storage();
        let mut flaky = TableGeocoder::new(&[]);
        flaky.fail_transport = true;
        let inner = Arc::new(flaky);
        let cached = CachedGeocoder::new(inner.clone(), storage.clone());

        assert_eq!(cached.resolve("Tulsa").await, None);
        assert_eq!(cached.resolve("Tulsa").await, None);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(storage.count_geocodes().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_nominatim_is_a_miss() {
        let config = Config {
            geocoder_url: "http://127.0.0.1:1/search".to_string(),
            geocoder_timeout: std::time::Duration::from_secs(2),
            ..Config::default()
        };
        let geocoder = NominatimGeocoder::new(&config).unwrap();
        assert_eq!(geocoder.resolve("Boise").await, None);
    }
}
