//! Refresh and cache-clearing flows.
//!
//! Each flow runs its steps strictly in order and stops at the first
//! cache failure. Failures are logged and returned; nothing is retried.
//! Fetching seed data is independent of the cache steps: its failure is
//! logged and reported without stopping the refresh.

use tracing::{debug, error, info};

use crate::app_data::AppDataCache;
use crate::error::{Error, Result};
use crate::traits::{CacheController, KeyValueStore, LocationSource, WorkerDirective};

/// Caches dropped by [`refresh`].
pub const CACHE_NAMES: [&str; 2] = ["mapTiles", "site"];

/// What [`refresh`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Fresh seed data was fetched.
    pub reseeded: bool,
    /// Why fetching seed data failed, if it did.
    pub reseed_error: Option<String>,
    /// Caches that existed and were deleted.
    pub caches_deleted: Vec<String>,
    /// A worker registration was removed.
    pub unregistered: bool,
    /// The application was reloaded.
    pub reloaded: bool,
}

/// Pull new seed data and force every cached asset to be fetched anew.
///
/// Steps: reseed (only when `can_fetch`; a failure is logged into the
/// report and the flow carries on), then, if the host supports a
/// worker, delete the [`CACHE_NAMES`] caches, look up the worker
/// registration, unregister it if present and reload. A registration that
/// cannot be removed ends the flow with [`Error::WorkerUnregisterFailed`]
/// and no reload.
pub async fn refresh<K, S, C>(
    app_data: &AppDataCache<K, S>,
    cache: &C,
    can_fetch: bool,
) -> Result<RefreshReport>
where
    K: KeyValueStore,
    S: LocationSource,
    C: CacheController + ?Sized,
{
    let mut report = RefreshReport::default();

    if can_fetch {
        match app_data.reseed(true).await {
            Ok(_) => report.reseeded = true,
            Err(e) => {
                error!("Error fetching app data: {}", e);
                report.reseed_error = Some(e.to_string());
            }
        }
    }

    if !cache.is_supported() {
        debug!("No worker support, skipping cache refresh");
        return Ok(report);
    }

    for name in CACHE_NAMES {
        let existed = cache.delete_cache(name).await.inspect_err(|e| {
            error!("Error clearing caches: {}", e);
        })?;
        if existed {
            report.caches_deleted.push(name.to_string());
        }
    }

    let registered = cache.has_registration().await.inspect_err(|e| {
        error!("Error getting service worker registration: {}", e);
    })?;

    if registered {
        let unregistered = cache.unregister().await.inspect_err(|e| {
            error!("Service worker unregistration failed: {}", e);
        })?;
        if !unregistered {
            error!("Service worker unregistration failed.");
            return Err(Error::WorkerUnregisterFailed);
        }
        report.unregistered = true;
    }

    cache.reload().await?;
    report.reloaded = true;

    info!(
        "Refresh complete: {} cache(s) deleted, unregistered={}",
        report.caches_deleted.len(),
        report.unregistered
    );
    Ok(report)
}

/// Ask the controlling worker to drop its map tiles.
///
/// Returns whether the directive was delivered.
pub async fn clear_cache<C: CacheController + ?Sized>(cache: &C) -> Result<bool> {
    if !cache.is_supported() {
        return Ok(false);
    }
    let sent = cache.post_message(WorkerDirective::ClearCache).await?;
    if sent {
        info!("Sent clearCache directive");
    } else {
        debug!("No controlling worker, nothing to clear");
    }
    Ok(sent)
}

/// Wipe every persisted key/value entry.
pub fn clear_local_storage<K: KeyValueStore + ?Sized>(store: &K) -> Result<()> {
    store.clear().inspect_err(|e| {
        error!("Error clearing local storage: {}", e);
    })?;
    info!("Cleared local storage");
    Ok(())
}
