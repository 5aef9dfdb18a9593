//! Offline cache buckets on the filesystem.
//!
//! Each named cache is a directory under the cache root. A marker file
//! stands in for the worker registration: while it exists a worker is
//! controlling the client and answers directives.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};

use wayfinder_core::{CacheController, Error, Result, WorkerDirective};

/// Cache holding downloaded map tiles.
pub const MAP_TILES_CACHE: &str = "mapTiles";

const REGISTRATION_MARKER: &str = "worker.registration";

/// Default cache root.
///
/// - Linux: `~/.cache/wayfinder`
/// - macOS: `~/Library/Caches/wayfinder`
/// - Windows: `C:\Users\<user>\AppData\Local\wayfinder`
pub fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wayfinder")
}

/// [`CacheController`] over directories in a cache root.
#[derive(Debug, Clone)]
pub struct FsCacheController {
    root: PathBuf,
}

impl FsCacheController {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn open_default() -> Self {
        Self::new(default_cache_root())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of a named cache.
    pub fn cache_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn marker(&self) -> PathBuf {
        self.root.join(REGISTRATION_MARKER)
    }

    /// Install the worker registration.
    pub fn register(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| Error::cache("register", e))?;
        let stamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| Error::cache("register", e))?;
        fs::write(self.marker(), stamp).map_err(|e| Error::cache("register", e))
    }

    fn is_registered(&self) -> bool {
        self.marker().is_file()
    }
}

#[async_trait]
impl CacheController for FsCacheController {
    fn is_supported(&self) -> bool {
        true
    }

    async fn delete_cache(&self, name: &str) -> Result<bool> {
        match fs::remove_dir_all(self.cache_dir(name)) {
            Ok(()) => {
                debug!("Deleted cache {}", name);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::cache(format!("delete {}", name), e)),
        }
    }

    async fn has_registration(&self) -> Result<bool> {
        Ok(self.is_registered())
    }

    async fn unregister(&self) -> Result<bool> {
        match fs::remove_file(self.marker()) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::cache("unregister", e)),
        }
    }

    /// A reload starts the client afresh, which registers the worker again.
    async fn reload(&self) -> Result<()> {
        self.register()?;
        info!("Worker registered at {}", self.root.display());
        Ok(())
    }

    async fn post_message(&self, directive: WorkerDirective) -> Result<bool> {
        if !self.is_registered() {
            return Ok(false);
        }

        match directive {
            WorkerDirective::ClearCache => {
                let dir = self.cache_dir(MAP_TILES_CACHE);
                match fs::remove_dir_all(&dir) {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(Error::cache("clearCache", e)),
                }
                fs::create_dir_all(&dir).map_err(|e| Error::cache("clearCache", e))?;
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_core::CACHE_NAMES;

    fn controller() -> (tempfile::TempDir, FsCacheController) {
        let dir = tempfile::tempdir().unwrap();
        let controller = FsCacheController::new(dir.path().join("wayfinder"));
        (dir, controller)
    }

    fn fill(controller: &FsCacheController, name: &str) {
        let dir = controller.cache_dir(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("entry"), b"cached").unwrap();
    }

    #[tokio::test]
    async fn test_delete_cache_reports_existence() {
        let (_dir, controller) = controller();
        fill(&controller, "site");

        assert!(controller.delete_cache("site").await.unwrap());
        assert!(!controller.cache_dir("site").exists());
        assert!(!controller.delete_cache("site").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_and_unregister() {
        let (_dir, controller) = controller();
        assert!(!controller.has_registration().await.unwrap());
        assert!(!controller.unregister().await.unwrap());

        controller.register().unwrap();
        assert!(controller.has_registration().await.unwrap());
        assert!(controller.unregister().await.unwrap());
        assert!(!controller.has_registration().await.unwrap());
    }

    #[tokio::test]
    async fn test_reload_registers_again() {
        let (_dir, controller) = controller();
        controller.reload().await.unwrap();
        assert!(controller.has_registration().await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_cache_directive_needs_worker() {
        let (_dir, controller) = controller();
        fill(&controller, MAP_TILES_CACHE);

        assert!(
            !controller
                .post_message(WorkerDirective::ClearCache)
                .await
                .unwrap()
        );
        assert!(controller.cache_dir(MAP_TILES_CACHE).join("entry").exists());

        controller.register().unwrap();
        assert!(
            controller
                .post_message(WorkerDirective::ClearCache)
                .await
                .unwrap()
        );
        let tiles = controller.cache_dir(MAP_TILES_CACHE);
        assert!(tiles.is_dir());
        assert_eq!(fs::read_dir(tiles).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_refresh_runs_against_filesystem() {
        use wayfinder_core::{AppDataCache, MemoryStore, MockLocationSource, refresh};

        let (_dir, controller) = controller();
        for name in CACHE_NAMES {
            fill(&controller, name);
        }
        controller.register().unwrap();

        let app_data = AppDataCache::new(MemoryStore::new(), MockLocationSource::new(Vec::new()));
        let report = refresh(&app_data, &controller, false).await.unwrap();

        assert_eq!(report.caches_deleted, vec!["mapTiles", "site"]);
        assert!(report.unregistered);
        assert!(report.reloaded);
        assert!(controller.has_registration().await.unwrap());
    }
}
