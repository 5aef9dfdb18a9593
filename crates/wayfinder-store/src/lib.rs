//! SQLite document store for BC Wayfinder service locations.
//!
//! Each location record is kept as a JSON document alongside the two
//! columns it is queried by (`website` and `service_type`), so fields the
//! scraper adds later survive without a schema change.
//!
//! # Features
//!
//! - Find all records of a service type
//! - Find and update a record by its website
//! - Create records with validation
//! - Merge partial updates into a stored document
//! - Import seed data from a JSON array
//!
//! # Example
//!
//! ```no_run
//! use wayfinder_store::Store;
//! use wayfinder_types::ServiceType;
//!
//! let store = Store::open_default()?;
//! let offices = store.find_by_service_type(ServiceType::ServiceBC)?;
//! println!("{} Service BC offices", offices.len());
//! # Ok::<(), wayfinder_store::Error>(())
//! ```

mod error;
mod models;
mod queries;
mod schema;
mod store;

pub use error::{Error, Result};
pub use models::{ImportResult, StoredLocation, merge_document};
pub use wayfinder_types::UpsertOutcome;
pub use queries::LocationQuery;
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/wayfinder/locations.db`
/// - macOS: `~/Library/Application Support/wayfinder/locations.db`
/// - Windows: `C:\Users\<user>\AppData\Local\wayfinder\locations.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("wayfinder")
        .join("locations.db")
}
