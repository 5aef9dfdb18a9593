//! Capabilities the client core needs from its host.
//!
//! Each trait covers one browser-style facility so that the view, settings
//! and maintenance logic can run against real implementations (see
//! `wayfinder-cli`) or the in-memory ones in [`crate::mock`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use wayfinder_types::{AllLocationsResponse, Coordinate, CriteriaResponse, ServiceType};

use crate::error::Result;
use crate::settings::AnalyticsEvent;

/// Source of the device's current position.
#[async_trait]
pub trait CoordinateProvider: Send + Sync {
    /// Ask for a fresh position fix.
    ///
    /// `Ok(None)` means no fix is available right now (permission denied,
    /// no signal); callers fall back to the cached value.
    async fn current_position(&self) -> Result<Option<Coordinate>>;
}

/// Persistent string key/value storage, in the manner of `localStorage`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Remove every key.
    fn clear(&self) -> Result<()>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Message posted to the active service worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum WorkerDirective {
    /// Drop every cached map tile.
    ClearCache,
}

/// Offline cache and worker lifecycle control.
#[async_trait]
pub trait CacheController: Send + Sync {
    /// Whether the host has a worker/cache facility at all.
    fn is_supported(&self) -> bool;

    /// Delete a named cache. Returns whether it existed.
    async fn delete_cache(&self, name: &str) -> Result<bool>;

    /// Whether a worker registration is present.
    async fn has_registration(&self) -> Result<bool>;

    /// Remove the worker registration. Returns whether it was removed.
    async fn unregister(&self) -> Result<bool>;

    /// Restart the application so assets are fetched anew.
    async fn reload(&self) -> Result<()>;

    /// Post a directive to the controlling worker.
    ///
    /// Returns `false` when no worker is controlling the application.
    async fn post_message(&self, directive: WorkerDirective) -> Result<bool>;
}

/// Receiver of opted-in analytics events.
pub trait AnalyticsSink: Send + Sync {
    fn track(&self, event: &AnalyticsEvent);
}

/// Access to the location API.
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Every location of both service types with their service lists.
    async fn all_locations(&self) -> Result<AllLocationsResponse>;

    /// Locations and services of one service type.
    async fn locations_by_criteria(&self, service_type: ServiceType) -> Result<CriteriaResponse>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

#[async_trait]
impl<T: LocationSource + ?Sized> LocationSource for &T {
    async fn all_locations(&self) -> Result<AllLocationsResponse> {
        (**self).all_locations().await
    }

    async fn locations_by_criteria(&self, service_type: ServiceType) -> Result<CriteriaResponse> {
        (**self).locations_by_criteria(service_type).await
    }
}

#[async_trait]
impl<T: LocationSource + ?Sized> LocationSource for Arc<T> {
    async fn all_locations(&self) -> Result<AllLocationsResponse> {
        (**self).all_locations().await
    }

    async fn locations_by_criteria(&self, service_type: ServiceType) -> Result<CriteriaResponse> {
        (**self).locations_by_criteria(service_type).await
    }
}
