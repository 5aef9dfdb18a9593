//! Client core for BC Wayfinder.
//!
//! This crate holds everything the client does between the location API and
//! the screen: computing distances, assembling the list of nearby offices,
//! owning the user's settings, keeping the seed data cached and running the
//! refresh and cache-clearing flows.
//!
//! Host facilities (position, persistent storage, offline caches, analytics
//! and the API itself) are reached through the narrow traits in [`traits`],
//! with in-memory implementations in [`mock`].
//!
//! # Features
//!
//! - **Location view**: distance-annotated, range- and search-filtered list
//! - **Settings**: explicit state holder persisted after every change
//! - **App data cache**: seed data that survives offline use
//! - **Maintenance**: ordered refresh, cache clearing and storage wipe
//! - **Service client** (feature `service-client`): HTTP access to the API
//!
//! # Quick Start
//!
//! ```
//! use wayfinder_core::view::assemble_view;
//! use wayfinder_types::{Coordinate, Location, ServiceType};
//!
//! let offices = vec![
//!     Location::new("https://a.example", ServiceType::ServiceBC, "Victoria", 48.4284, -123.3656),
//!     Location::new("https://b.example", ServiceType::ServiceBC, "Vancouver", 49.2827, -123.1207),
//! ];
//! let here = Coordinate { latitude: 48.4284, longitude: -123.3656 };
//!
//! let view = assemble_view(&offices, Some(here), 50.0, "");
//! assert_eq!(view.len(), 1);
//! assert_eq!(view[0].distance, "0.00");
//! ```

pub mod app_data;
pub mod distance;
pub mod error;
pub mod location;
pub mod maintenance;
pub mod mock;
pub mod settings;
pub mod storage;
pub mod traits;
pub mod view;

#[cfg(feature = "service-client")]
pub mod service_client;

pub use app_data::{AppData, AppDataCache};
pub use distance::distance_between;
pub use error::{Error, Result};
pub use location::resolve_current_location;
pub use maintenance::{CACHE_NAMES, RefreshReport, clear_cache, clear_local_storage, refresh};
pub use mock::{
    MemoryStore, MockCacheController, MockCoordinateProvider, MockLocationSource,
    RecordingAnalytics,
};
pub use settings::{AnalyticsEvent, SettingChange, Settings, SettingsService};
pub use storage::{APP_DATA_KEY, CURRENT_LOCATION_KEY, SETTINGS_KEY};
pub use traits::{
    AnalyticsSink, CacheController, CoordinateProvider, KeyValueStore, LocationSource,
    WorkerDirective,
};
pub use view::{LocatedLocation, assemble_view};

// Re-export from wayfinder-types
pub use wayfinder_types::{Coordinate, Location, ServiceType};
