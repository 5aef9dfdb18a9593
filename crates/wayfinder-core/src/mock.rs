//! In-memory capability implementations for testing.
//!
//! Each mock implements one trait from [`crate::traits`] and records what was
//! asked of it, so flows can be checked step by step without a browser,
//! a filesystem or a running location API.
//!
//! # Features
//!
//! - **Failure injection**: make writes, fetches or cache steps fail
//! - **Call recording**: inspect the exact order of cache operations
//! - **Call counting**: assert that an offline path never touched the source

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use wayfinder_types::{
    AllLocationsResponse, Coordinate, CriteriaResponse, Location, ServiceType,
};

use crate::error::{Error, Result};
use crate::settings::AnalyticsEvent;
use crate::traits::{
    AnalyticsSink, CacheController, CoordinateProvider, KeyValueStore, LocationSource,
    WorkerDirective,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A [`KeyValueStore`] backed by a map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set`, `remove` and `clear` fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Snapshot of every key currently stored.
    pub fn keys(&self) -> Vec<String> {
        lock(&self.entries).keys().cloned().collect()
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            Err(Error::storage("mock write failure"))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_writable()?;
        lock(&self.entries).remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.check_writable()?;
        lock(&self.entries).clear();
        Ok(())
    }
}

/// A [`CoordinateProvider`] returning a fixed answer.
#[derive(Debug, Clone, Default)]
pub struct MockCoordinateProvider {
    position: Option<Coordinate>,
    fail: bool,
}

impl MockCoordinateProvider {
    /// A provider that always has a fix at `position`.
    pub fn at(position: Coordinate) -> Self {
        Self {
            position: Some(position),
            fail: false,
        }
    }

    /// A provider that never has a fix.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// A provider whose lookups fail.
    pub fn failing() -> Self {
        Self {
            position: None,
            fail: true,
        }
    }
}

#[async_trait]
impl CoordinateProvider for MockCoordinateProvider {
    async fn current_position(&self) -> Result<Option<Coordinate>> {
        if self.fail {
            return Err(Error::Position("mock position failure".to_string()));
        }
        Ok(self.position)
    }
}

/// One step recorded by [`MockCacheController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheCall {
    DeleteCache(String),
    GetRegistration,
    Unregister,
    Reload,
    PostMessage(WorkerDirective),
}

/// A [`CacheController`] that records every call.
#[derive(Debug)]
pub struct MockCacheController {
    supported: bool,
    registered: AtomicBool,
    controlling: bool,
    unregister_succeeds: bool,
    fail_delete: bool,
    calls: Mutex<Vec<CacheCall>>,
}

impl Default for MockCacheController {
    fn default() -> Self {
        Self {
            supported: true,
            registered: AtomicBool::new(true),
            controlling: true,
            unregister_succeeds: true,
            fail_delete: false,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockCacheController {
    /// A supported controller with a registered, controlling worker.
    pub fn new() -> Self {
        Self::default()
    }

    /// A host without any worker/cache facility.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            registered: AtomicBool::new(false),
            controlling: false,
            ..Self::default()
        }
    }

    /// No worker is registered or controlling.
    pub fn without_registration(mut self) -> Self {
        self.registered = AtomicBool::new(false);
        self.controlling = false;
        self
    }

    /// Unregistering reports failure.
    pub fn with_failing_unregister(mut self) -> Self {
        self.unregister_succeeds = false;
        self
    }

    /// Deleting a cache returns an error.
    pub fn with_failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<CacheCall> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: CacheCall) {
        lock(&self.calls).push(call);
    }
}

#[async_trait]
impl CacheController for MockCacheController {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn delete_cache(&self, name: &str) -> Result<bool> {
        self.record(CacheCall::DeleteCache(name.to_string()));
        if self.fail_delete {
            return Err(Error::cache(format!("delete {}", name), "mock failure"));
        }
        Ok(true)
    }

    async fn has_registration(&self) -> Result<bool> {
        self.record(CacheCall::GetRegistration);
        Ok(self.registered.load(Ordering::Relaxed))
    }

    async fn unregister(&self) -> Result<bool> {
        self.record(CacheCall::Unregister);
        if self.unregister_succeeds {
            self.registered.store(false, Ordering::Relaxed);
        }
        Ok(self.unregister_succeeds)
    }

    async fn reload(&self) -> Result<()> {
        self.record(CacheCall::Reload);
        Ok(())
    }

    async fn post_message(&self, directive: WorkerDirective) -> Result<bool> {
        if !self.controlling {
            return Ok(false);
        }
        self.record(CacheCall::PostMessage(directive));
        Ok(true)
    }
}

/// An [`AnalyticsSink`] that keeps every event. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingAnalytics {
    events: Arc<Mutex<Vec<AnalyticsEvent>>>,
}

impl RecordingAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        lock(&self.events).clone()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn track(&self, event: &AnalyticsEvent) {
        lock(&self.events).push(event.clone());
    }
}

/// A [`LocationSource`] serving a fixed set of locations.
#[derive(Debug, Default)]
pub struct MockLocationSource {
    locations: Mutex<Vec<Location>>,
    fail: AtomicBool,
    request_count: AtomicU32,
}

impl MockLocationSource {
    pub fn new(locations: Vec<Location>) -> Self {
        Self {
            locations: Mutex::new(locations),
            ..Self::default()
        }
    }

    /// Replace the served locations.
    pub fn set_locations(&self, locations: Vec<Location>) {
        *lock(&self.locations) = locations;
    }

    /// Make every subsequent request fail.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::Relaxed);
    }

    /// Number of requests answered or failed so far.
    pub fn request_count(&self) -> u32 {
        self.request_count.load(Ordering::Relaxed)
    }

    fn begin_request(&self) -> Result<()> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        if self.fail.load(Ordering::Relaxed) {
            Err(Error::Source("mock source failure".to_string()))
        } else {
            Ok(())
        }
    }

    fn of_type(&self, service_type: ServiceType) -> Vec<Location> {
        lock(&self.locations)
            .iter()
            .filter(|location| location.service_type == service_type)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl LocationSource for MockLocationSource {
    async fn all_locations(&self) -> Result<AllLocationsResponse> {
        self.begin_request()?;
        Ok(AllLocationsResponse::from_groups(
            self.of_type(ServiceType::ServiceBC),
            self.of_type(ServiceType::HealthBC),
        ))
    }

    async fn locations_by_criteria(&self, service_type: ServiceType) -> Result<CriteriaResponse> {
        self.begin_request()?;
        Ok(CriteriaResponse::from_locations(self.of_type(service_type)))
    }
}
