//! Response bodies for the location endpoints and service-list derivation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{Location, ServiceType};

/// Collect the unique service names offered across `locations`.
///
/// The result is the deduplicated union of every `services` array, sorted
/// alphabetically.
///
/// # Examples
///
/// ```
/// use wayfinder_types::{Location, ServiceType, extract_service_list};
///
/// assert!(extract_service_list(&[]).is_empty());
///
/// let site = Location::new("w", ServiceType::HealthBC, "Hope", 49.4, -121.4)
///     .with_services(["Lab", "Immunization", "Lab"]);
/// assert_eq!(extract_service_list(&[site]), vec!["Immunization", "Lab"]);
/// ```
#[must_use]
pub fn extract_service_list(locations: &[Location]) -> Vec<String> {
    locations
        .iter()
        .flat_map(|location| location.services.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Body of `GET /locations`: the full seed data for clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllLocationsResponse {
    #[serde(rename = "serviceBCLocations")]
    pub service_bc_locations: Vec<Location>,
    #[serde(rename = "serviceBCServices")]
    pub service_bc_services: Vec<String>,
    #[serde(rename = "healthBCLocations")]
    pub health_bc_locations: Vec<Location>,
    #[serde(rename = "healthBCServices")]
    pub health_bc_services: Vec<String>,
}

impl AllLocationsResponse {
    /// Build the response from the two location groups, deriving the
    /// service lists.
    pub fn from_groups(service_bc: Vec<Location>, health_bc: Vec<Location>) -> Self {
        Self {
            service_bc_services: extract_service_list(&service_bc),
            service_bc_locations: service_bc,
            health_bc_services: extract_service_list(&health_bc),
            health_bc_locations: health_bc,
        }
    }

    /// Locations of one service type.
    #[must_use]
    pub fn locations(&self, service_type: ServiceType) -> &[Location] {
        match service_type {
            ServiceType::ServiceBC => &self.service_bc_locations,
            ServiceType::HealthBC => &self.health_bc_locations,
        }
    }

    /// Service names of one service type.
    #[must_use]
    pub fn services(&self, service_type: ServiceType) -> &[String] {
        match service_type {
            ServiceType::ServiceBC => &self.service_bc_services,
            ServiceType::HealthBC => &self.health_bc_services,
        }
    }

    /// Replace one service type's group with a filter-by-criteria result.
    pub fn replace_group(&mut self, service_type: ServiceType, group: CriteriaResponse) {
        match service_type {
            ServiceType::ServiceBC => {
                self.service_bc_locations = group.location_data;
                self.service_bc_services = group.service_data;
            }
            ServiceType::HealthBC => {
                self.health_bc_locations = group.location_data;
                self.health_bc_services = group.service_data;
            }
        }
    }
}

/// Body of `POST /locations/criteria`.
///
/// The service type stays a raw string so that unsupported values reach the
/// handler and are answered with 400.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaRequest {
    #[serde(default)]
    pub service_type: String,
}

impl CriteriaRequest {
    pub fn new(service_type: ServiceType) -> Self {
        Self {
            service_type: service_type.as_str().to_string(),
        }
    }
}

/// Response of `POST /locations/criteria`: one service type's data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaResponse {
    pub location_data: Vec<Location>,
    pub service_data: Vec<String>,
}

impl CriteriaResponse {
    pub fn from_locations(locations: Vec<Location>) -> Self {
        Self {
            service_data: extract_service_list(&locations),
            location_data: locations,
        }
    }
}

/// Result of a scraper upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    /// No record had the website; a new one was created.
    Created,
    /// An existing record was updated in place.
    Updated,
}
