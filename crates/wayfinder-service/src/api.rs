//! REST API endpoints.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/api/health` | Service health check |
//! | GET | `/locations` | All locations and services, grouped by service type |
//! | POST | `/locations/criteria` | Locations and services of one service type |
//! | PATCH | `/locations` | Create or update a location (scraper token required) |
//!
//! # Error Handling
//!
//! All endpoints return structured JSON errors via [`AppError`]. Invalid
//! input yields 400, a refused scraper token 403, and store failures 500.
//!
//! # Example
//!
//! ```ignore
//! use wayfinder_service::api;
//!
//! let app = api::router(state);
//! ```

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{debug, info};
use wayfinder_store::merge_document;
use wayfinder_types::{
    AllLocationsResponse, CriteriaRequest, CriteriaResponse, Location, ServiceType,
};

use crate::middleware::scraper_auth;
use crate::state::AppState;

/// Create the API router.
///
/// Only `PATCH /locations` passes through [`scraper_auth`].
pub fn router(state: Arc<AppState>) -> Router {
    let scraper_only = from_fn_with_state(state.clone(), scraper_auth);

    Router::new()
        .route("/api/health", get(health))
        .route(
            "/locations",
            get(list_locations).merge(patch(upsert_location).route_layer(scraper_only)),
        )
        .route("/locations/criteria", post(filter_by_criteria))
        .with_state(state)
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: OffsetDateTime::now_utc(),
    })
}

/// Every location of both service types with their service lists.
async fn list_locations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AllLocationsResponse>, AppError> {
    let (service_bc, health_bc) = {
        let store = state.store.lock().await;
        (
            store.find_by_service_type(ServiceType::ServiceBC)?,
            store.find_by_service_type(ServiceType::HealthBC)?,
        )
    };

    debug!(
        "Serving {} Service BC and {} Health BC locations",
        service_bc.len(),
        health_bc.len()
    );
    Ok(Json(AllLocationsResponse::from_groups(service_bc, health_bc)))
}

/// Locations of the requested service type.
///
/// The service type is checked before the store is touched.
async fn filter_by_criteria(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CriteriaResponse>, AppError> {
    let request: CriteriaRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?;
    let service_type: ServiceType = request
        .service_type
        .parse()
        .map_err(|e| AppError::BadRequest(format!("{}", e)))?;

    let locations = state.store.lock().await.find_by_service_type(service_type)?;
    debug!("Criteria {} matched {} locations", service_type, locations.len());

    Ok(Json(CriteriaResponse::from_locations(locations)))
}

/// Create or update a location keyed by its website.
///
/// An existing record has the payload's fields overlaid on it (204); an
/// unknown website creates a new record (201). The lookup and the write lock
/// the store separately.
async fn upsert_location(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let Value::Object(document) = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?
    else {
        return Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    };

    let website = document
        .get("website")
        .and_then(Value::as_str)
        .filter(|website| !website.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Field 'website' cannot be empty".to_string()))?
        .to_string();

    let existing = state.store.lock().await.find_by_website(&website)?;

    match existing {
        Some(existing) => {
            let merged = merge_document(&existing, &document)?;
            state.store.lock().await.update_by_website(&website, &merged)?;
            info!("Updated location {}", website);
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        None => {
            let location: Location = serde_json::from_value(Value::Object(document))
                .map_err(|e| AppError::BadRequest(format!("Invalid location: {}", e)))?;
            state.store.lock().await.create(&location)?;
            info!("Created location {}", website);
            Ok((
                StatusCode::CREATED,
                Json(serde_json::json!({ "message": "Created" })),
            )
                .into_response())
        }
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Forbidden(String),
    Store(wayfinder_store::Error),
}

impl From<wayfinder_store::Error> for AppError {
    fn from(e: wayfinder_store::Error) -> Self {
        if e.is_invalid_record() {
            AppError::BadRequest(e.to_string())
        } else {
            AppError::Store(e)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}
