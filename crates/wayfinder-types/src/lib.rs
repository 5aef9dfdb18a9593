//! Shared data model for BC Wayfinder service locations.
//!
//! This crate provides the types exchanged between the location API
//! (wayfinder-service), its store (wayfinder-store) and clients
//! (wayfinder-core, wayfinder-cli).
//!
//! # Features
//!
//! - Location records as stored and served over HTTP
//! - The closed set of service types
//! - Geographic coordinates with range validation
//! - Response bodies for the list-all and filter-by-criteria endpoints
//! - Derivation of the unique, sorted service-name list
//!
//! # Example
//!
//! ```
//! use wayfinder_types::{Location, ServiceType, extract_service_list};
//!
//! let a = Location::new("https://a.example", ServiceType::ServiceBC, "Victoria", 48.42, -123.36)
//!     .with_services(["B", "A"]);
//! let b = Location::new("https://b.example", ServiceType::ServiceBC, "Nanaimo", 49.16, -123.94)
//!     .with_services(["A", "C"]);
//!
//! assert_eq!(extract_service_list(&[a, b]), vec!["A", "B", "C"]);
//! ```

pub mod catalog;
pub mod error;
pub mod types;

pub use catalog::{
    AllLocationsResponse, CriteriaRequest, CriteriaResponse, UpsertOutcome, extract_service_list,
};
pub use error::{ParseError, ParseResult};
pub use types::{Coordinate, Location, ServiceType};
