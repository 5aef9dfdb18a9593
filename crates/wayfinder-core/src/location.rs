//! Current location resolution.

use tracing::{debug, warn};

use wayfinder_types::Coordinate;

use crate::error::Result;
use crate::storage::{CURRENT_LOCATION_KEY, load_json_lenient, save_json};
use crate::traits::{CoordinateProvider, KeyValueStore};

/// Determine the current location.
///
/// A fresh fix from `provider` is cached under [`CURRENT_LOCATION_KEY`] and
/// returned. Without a fix (or if the provider fails) the cached value is
/// returned; with neither the location is unknown.
pub async fn resolve_current_location<P, K>(provider: &P, store: &K) -> Result<Option<Coordinate>>
where
    P: CoordinateProvider + ?Sized,
    K: KeyValueStore + ?Sized,
{
    match provider.current_position().await {
        Ok(Some(coordinate)) => {
            debug!("Position fix at {}", coordinate);
            save_json(store, CURRENT_LOCATION_KEY, &coordinate)?;
            return Ok(Some(coordinate));
        }
        Ok(None) => debug!("No position fix, using cached location"),
        Err(e) => warn!("Position lookup failed, using cached location: {}", e),
    }

    load_json_lenient(store, CURRENT_LOCATION_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MemoryStore, MockCoordinateProvider};

    fn victoria() -> Coordinate {
        Coordinate {
            latitude: 48.4284,
            longitude: -123.3656,
        }
    }

    #[tokio::test]
    async fn test_fresh_fix_is_cached() {
        let store = MemoryStore::new();
        let provider = MockCoordinateProvider::at(victoria());

        let resolved = resolve_current_location(&provider, &store).await.unwrap();

        assert_eq!(resolved, Some(victoria()));
        assert!(store.contains(CURRENT_LOCATION_KEY).unwrap());
    }

    #[tokio::test]
    async fn test_falls_back_to_cached_location() {
        let store = MemoryStore::new();
        resolve_current_location(&MockCoordinateProvider::at(victoria()), &store)
            .await
            .unwrap();

        let resolved = resolve_current_location(&MockCoordinateProvider::unavailable(), &store)
            .await
            .unwrap();
        assert_eq!(resolved, Some(victoria()));

        let resolved = resolve_current_location(&MockCoordinateProvider::failing(), &store)
            .await
            .unwrap();
        assert_eq!(resolved, Some(victoria()));
    }

    #[tokio::test]
    async fn test_unknown_without_fix_or_cache() {
        let store = MemoryStore::new();
        let resolved = resolve_current_location(&MockCoordinateProvider::unavailable(), &store)
            .await
            .unwrap();

        assert!(resolved.is_none());
        assert!(!store.contains(CURRENT_LOCATION_KEY).unwrap());
    }
}
