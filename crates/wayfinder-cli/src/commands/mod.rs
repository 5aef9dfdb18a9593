//! Command implementations for the CLI.

mod config;
mod locate;
mod locations;
mod maintenance;
mod services;
mod settings;

pub use config::cmd_config;
pub use locate::cmd_locate;
pub use locations::cmd_locations;
pub use maintenance::{cmd_clear_cache, cmd_clear_storage, cmd_refresh};
pub use services::cmd_services;
pub use settings::cmd_settings;

use anyhow::{Context as _, Result};
use tracing::{debug, warn};

use wayfinder_core::service_client::ServiceClient;
use wayfinder_core::{AppData, AppDataCache, Settings};

use crate::config::{Config, resolve_service_url, resolve_timeout};
use crate::storage::FileKeyValueStore;
use crate::worker::FsCacheController;

/// Everything a command needs from its environment.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub service_url: String,
    pub state: FileKeyValueStore,
    pub cache: FsCacheController,
    pub quiet: bool,
}

impl Context {
    /// Context over the platform default locations.
    pub fn new(service_url: Option<&str>, quiet: bool) -> Self {
        let config = Config::load();
        Self {
            service_url: resolve_service_url(service_url, &config),
            config,
            state: FileKeyValueStore::open_default(),
            cache: FsCacheController::open_default(),
            quiet,
        }
    }

    pub fn client(&self) -> Result<ServiceClient> {
        ServiceClient::with_timeout(&self.service_url, resolve_timeout(&self.config))
            .with_context(|| format!("Invalid service URL {}", self.service_url))
    }

    /// Whether the location API answers and settings allow using it.
    async fn can_fetch(&self, client: &ServiceClient, settings: &Settings) -> bool {
        if settings.offline_mode {
            debug!("Offline mode on, not contacting {}", self.service_url);
            return false;
        }
        let online = client.is_reachable().await;
        if !online {
            debug!("{} not reachable", self.service_url);
        }
        settings.can_fetch(online)
    }
}

/// The seed data in effect: freshly fetched when allowed, otherwise cached.
async fn current_app_data(ctx: &Context, settings: &Settings) -> Result<AppData> {
    let client = ctx.client()?;
    let can_fetch = ctx.can_fetch(&client, settings).await;
    let app_data = AppDataCache::new(&ctx.state, &client);

    let current = match app_data.reseed(can_fetch).await {
        Ok(current) => current,
        Err(e) => {
            warn!("Could not fetch location data, using cached copy: {}", e);
            app_data.cached()?
        }
    };

    current.context(
        "No location data available. Connect to the location API and run `wayfinder refresh`.",
    )
}
