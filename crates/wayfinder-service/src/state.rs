//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use wayfinder_store::Store;

use crate::config::Config;

/// Shared application state.
pub struct AppState {
    /// The location store. Locked once per store operation.
    pub store: Mutex<Store>,
    /// Configuration.
    pub config: RwLock<Config>,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: Store, config: Config) -> Arc<Self> {
        Arc::new(Self {
            store: Mutex::new(store),
            config: RwLock::new(config),
        })
    }
}
