//! HTTP client for the wayfinder-service location API.
//!
//! # Example
//!
//! ```no_run
//! use wayfinder_core::service_client::ServiceClient;
//! use wayfinder_types::ServiceType;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ServiceClient::new("http://localhost:3000")?;
//!
//! let all = client.all_locations().await?;
//! println!("{} Service BC offices", all.service_bc_locations.len());
//!
//! let health = client.locations_by_criteria(ServiceType::HealthBC).await?;
//! println!("Health BC services: {:?}", health.service_data);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use wayfinder_types::{
    AllLocationsResponse, CriteriaRequest, CriteriaResponse, Location, ServiceType,
    UpsertOutcome,
};

use crate::traits::LocationSource;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the location API.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
    base_url: String,
}

/// Error type for service client operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceClientError {
    /// The service is not reachable.
    #[error("Service not reachable at {url}: {source}")]
    NotReachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
}

/// Result type for service client operations.
pub type Result<T> = std::result::Result<T, ServiceClientError>;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

fn normalize_base_url(base_url: &str) -> Result<String> {
    let base_url = base_url.trim_end_matches('/').to_string();

    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ServiceClientError::InvalidUrl(format!(
            "URL must start with http:// or https://, got: {}",
            base_url
        )));
    }

    Ok(base_url)
}

impl ServiceClient {
    /// Create a new service client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the wayfinder-service (e.g., "http://localhost:3000")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ServiceClientError::Request)?;

        Ok(Self { client, base_url })
    }

    /// Create a client with a custom reqwest Client.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the service is reachable.
    pub async fn is_reachable(&self) -> bool {
        self.health().await.is_ok()
    }

    /// Get service health.
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/api/health", self.base_url);
        self.get(&url).await
    }

    /// Every location of both service types.
    pub async fn all_locations(&self) -> Result<AllLocationsResponse> {
        let url = format!("{}/locations", self.base_url);
        self.get(&url).await
    }

    /// Locations and services of one service type.
    pub async fn locations_by_criteria(
        &self,
        service_type: ServiceType,
    ) -> Result<CriteriaResponse> {
        let url = format!("{}/locations/criteria", self.base_url);
        self.post_json(&url, &CriteriaRequest::new(service_type)).await
    }

    /// Create or update a location as the scraper.
    pub async fn upsert_location(&self, token: &str, location: &Location) -> Result<UpsertOutcome> {
        let url = format!("{}/locations", self.base_url);
        let response = self
            .client
            .patch(&url)
            .bearer_auth(token)
            .json(location)
            .send()
            .await
            .map_err(|e| ServiceClientError::NotReachable {
                url: url.clone(),
                source: e,
            })?;

        match response.status() {
            StatusCode::CREATED => Ok(UpsertOutcome::Created),
            StatusCode::NO_CONTENT => Ok(UpsertOutcome::Updated),
            status => Err(Self::api_error(status, response).await),
        }
    }

    // ======================================================================
    // Internal HTTP helpers
    // ======================================================================

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| ServiceClientError::NotReachable {
                    url: url.to_string(),
                    source: e,
                })?;

        self.handle_response(response).await
    }

    async fn post_json<T: serde::de::DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.client.post(url).json(body).send().await.map_err(|e| {
            ServiceClientError::NotReachable {
                url: url.to_string(),
                source: e,
            }
        })?;

        self.handle_response(response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(ServiceClientError::Request)
        } else {
            Err(Self::api_error(status, response).await)
        }
    }

    async fn api_error(status: StatusCode, response: reqwest::Response) -> ServiceClientError {
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| status.to_string());

        ServiceClientError::ApiError {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl LocationSource for ServiceClient {
    async fn all_locations(&self) -> crate::Result<AllLocationsResponse> {
        ServiceClient::all_locations(self)
            .await
            .map_err(|e| crate::Error::Source(e.to_string()))
    }

    async fn locations_by_criteria(
        &self,
        service_type: ServiceType,
    ) -> crate::Result<CriteriaResponse> {
        ServiceClient::locations_by_criteria(self, service_type)
            .await
            .map_err(|e| crate::Error::Source(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ServiceClient::new("http://localhost:3000");
        assert!(client.is_ok());

        let client = client.unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_client_normalizes_url() {
        let client = ServiceClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_client_invalid_url() {
        let result = ServiceClient::new("localhost:3000");
        assert!(matches!(result, Err(ServiceClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_api_error_display() {
        let error = ServiceClientError::ApiError {
            status: 400,
            message: "Unsupported service type".to_string(),
        };
        assert_eq!(error.to_string(), "API error (400): Unsupported service type");
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Port 9 (discard) is not expected to run an HTTP server
        let client =
            ServiceClient::with_timeout("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        assert!(!client.is_reachable().await);
        assert!(matches!(
            client.all_locations().await,
            Err(ServiceClientError::NotReachable { .. })
        ));
    }
}
