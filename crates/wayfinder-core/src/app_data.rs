//! Cached seed data.
//!
//! The full `GET /locations` response is kept in the [`KeyValueStore`] under
//! [`APP_DATA_KEY`] so the client keeps working when it cannot or may not
//! reach the network.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info};

use wayfinder_types::{AllLocationsResponse, ServiceType};

use crate::error::Result;
use crate::storage::{APP_DATA_KEY, load_json_lenient, save_json};
use crate::traits::{KeyValueStore, LocationSource};

/// Seed data together with when it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppData {
    pub data: AllLocationsResponse,
    #[serde(with = "time::serde::rfc3339")]
    pub fetched_at: OffsetDateTime,
}

impl AppData {
    pub fn new(data: AllLocationsResponse) -> Self {
        Self {
            data,
            fetched_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Keeps the cached seed data in step with a [`LocationSource`].
#[derive(Debug)]
pub struct AppDataCache<K, S> {
    store: K,
    source: S,
}

impl<K: KeyValueStore, S: LocationSource> AppDataCache<K, S> {
    pub fn new(store: K, source: S) -> Self {
        Self { store, source }
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    /// The cached seed data, if any.
    pub fn cached(&self) -> Result<Option<AppData>> {
        load_json_lenient(&self.store, APP_DATA_KEY)
    }

    /// Fetch fresh seed data when `can_fetch` is set, otherwise keep the cache.
    ///
    /// Returns the seed data now in effect.
    pub async fn reseed(&self, can_fetch: bool) -> Result<Option<AppData>> {
        if !can_fetch {
            debug!("Offline, keeping cached app data");
            return self.cached();
        }

        let data = self.source.all_locations().await?;
        let app_data = AppData::new(data);
        save_json(&self.store, APP_DATA_KEY, &app_data)?;

        info!(
            "Fetched {} Service BC and {} Health BC locations",
            app_data.data.service_bc_locations.len(),
            app_data.data.health_bc_locations.len()
        );
        Ok(Some(app_data))
    }

    /// Replace one service type's locations and services with a fresh
    /// filter-by-criteria result, leaving the other type untouched.
    pub async fn refresh_service_type(&self, service_type: ServiceType) -> Result<AppData> {
        let group = self.source.locations_by_criteria(service_type).await?;
        let count = group.location_data.len();

        let mut app_data = match self.cached()? {
            Some(app_data) => app_data,
            None => AppData::new(AllLocationsResponse::default()),
        };
        app_data.data.replace_group(service_type, group);
        app_data.fetched_at = OffsetDateTime::now_utc();
        save_json(&self.store, APP_DATA_KEY, &app_data)?;

        info!("Refreshed {} {} locations", count, service_type);
        Ok(app_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MemoryStore, MockLocationSource};
    use wayfinder_types::Location;

    fn office(website: &str) -> Location {
        Location::new(website, ServiceType::ServiceBC, "Victoria", 48.4, -123.4)
            .with_services(["Driver Licensing"])
    }

    fn clinic(website: &str) -> Location {
        Location::new(website, ServiceType::HealthBC, "Hope", 49.4, -121.4)
            .with_services(["Lab"])
    }

    #[tokio::test]
    async fn test_reseed_online_stores_data() {
        let cache = AppDataCache::new(
            MemoryStore::new(),
            MockLocationSource::new(vec![office("a"), clinic("b")]),
        );

        let app_data = cache.reseed(true).await.unwrap().unwrap();
        assert_eq!(app_data.data.service_bc_locations.len(), 1);
        assert_eq!(app_data.data.health_bc_services, vec!["Lab"]);
        assert_eq!(cache.cached().unwrap().unwrap().data, app_data.data);
    }

    #[tokio::test]
    async fn test_reseed_offline_keeps_cache_and_skips_source() {
        let source = MockLocationSource::new(vec![office("a")]);
        let cache = AppDataCache::new(MemoryStore::new(), &source);

        assert!(cache.reseed(false).await.unwrap().is_none());
        assert_eq!(source.request_count(), 0);

        cache.reseed(true).await.unwrap();
        source.set_locations(vec![office("a"), office("b")]);

        let kept = cache.reseed(false).await.unwrap().unwrap();
        assert_eq!(kept.data.service_bc_locations.len(), 1);
        assert_eq!(source.request_count(), 1);
    }

    #[tokio::test]
    async fn test_reseed_failure_keeps_previous_cache() {
        let source = MockLocationSource::new(vec![office("a")]);
        let cache = AppDataCache::new(MemoryStore::new(), &source);
        cache.reseed(true).await.unwrap();

        source.set_fail(true);
        assert!(cache.reseed(true).await.is_err());
        assert!(cache.cached().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_refresh_service_type_replaces_one_group() {
        let source = MockLocationSource::new(vec![office("a"), clinic("b")]);
        let cache = AppDataCache::new(MemoryStore::new(), &source);
        cache.reseed(true).await.unwrap();

        source.set_locations(vec![office("a"), office("c"), clinic("b"), clinic("d")]);
        let app_data = cache
            .refresh_service_type(ServiceType::ServiceBC)
            .await
            .unwrap();

        assert_eq!(app_data.data.service_bc_locations.len(), 2);
        assert_eq!(app_data.data.health_bc_locations.len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_service_type_without_cache() {
        let source = MockLocationSource::new(vec![clinic("b")]);
        let cache = AppDataCache::new(MemoryStore::new(), &source);

        let app_data = cache
            .refresh_service_type(ServiceType::HealthBC)
            .await
            .unwrap();
        assert!(app_data.data.service_bc_locations.is_empty());
        assert_eq!(app_data.data.health_bc_locations.len(), 1);
    }
}
