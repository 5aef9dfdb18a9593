//! Command-line client for BC Wayfinder.
//!
//! Lists the Service BC offices and Health BC sites closest to you, keeps
//! your settings and a copy of the location data for offline use, and runs
//! the refresh and cache-clearing flows of the web client from a terminal.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `locations` | Nearby locations, closest first |
//! | `services` | Services offered, per service type |
//! | `settings` | Show or change settings |
//! | `locate` | Set, clear or show the current location |
//! | `refresh` | Fetch fresh data and drop cached assets |
//! | `clear-cache` | Drop cached map tiles |
//! | `clear-storage` | Delete all saved state |
//! | `config` | Manage CLI configuration |
//! | `completions` | Generate shell completions |
//!
//! # Configuration
//!
//! The CLI reads `~/.config/wayfinder/config.toml` (or platform equivalent):
//!
//! - `service_url`: Base URL of the location API
//! - `timeout`: Request timeout in seconds
//!
//! Saved settings, the current location and the location data live in
//! `state.json` in the platform data directory; cached assets live in the
//! platform cache directory.
//!
//! # Environment Variables
//!
//! - `WAYFINDER_SERVICE_URL`: Location API (overridden by `--service-url`)
//! - `WAYFINDER_POSITION`: Current position as `"lat,lon"` (overridden by
//!   `--lat/--lon`)
//!
//! # Examples
//!
//! ```bash
//! wayfinder locate --lat 48.4284 --lon -123.3656
//! wayfinder locations --search victoria
//! wayfinder settings set location-range 100
//! ```

pub mod analytics;
pub mod cli;
pub mod commands;
pub mod config;
pub mod format;
pub mod position;
pub mod storage;
pub mod worker;

pub use analytics::TracingAnalytics;
pub use position::StaticPosition;
pub use storage::FileKeyValueStore;
pub use worker::FsCacheController;
