//! HTTP location API for BC Wayfinder.
//!
//! This crate provides the service that:
//! - Serves every Service BC and Health BC location with its service list
//! - Filters locations by service type
//! - Accepts authenticated upserts from the location scraper
//!
//! # REST API Endpoints
//!
//! - `GET /api/health` - Service health check
//! - `GET /locations` - All locations, grouped by service type
//! - `POST /locations/criteria` - Locations of one service type
//! - `PATCH /locations` - Create or update a location (scraper only)
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/wayfinder/server.toml`:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:3000"
//!
//! [storage]
//! path = "~/.local/share/wayfinder/locations.db"
//!
//! [security]
//! scraper_api_key = "shared-secret-of-the-scraper"
//! ```
//!
//! The `SCRAPER_API_KEY` environment variable overrides
//! `security.scraper_api_key`. Without a key every upsert is refused.

pub mod api;
pub mod config;
pub mod middleware;
pub mod state;

pub use config::{Config, ConfigError, SecurityConfig, ServerConfig, StorageConfig};
pub use state::AppState;
