//! Service client against a running location API.

use std::sync::Arc;
use std::time::Duration;

use wayfinder_core::service_client::{ServiceClient, ServiceClientError};
use wayfinder_core::{Location, ServiceType};
use wayfinder_service::{AppState, Config, api};
use wayfinder_store::Store;
use wayfinder_types::UpsertOutcome;

const TOKEN: &str = "scraper-secret";

async fn serve() -> (String, Arc<AppState>) {
    let mut config = Config::default();
    config.security.scraper_api_key = Some(TOKEN.to_string());
    let state = AppState::new(Store::open_in_memory().unwrap(), config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = api::router(Arc::clone(&state));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

fn client(base_url: &str) -> ServiceClient {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    ServiceClient::with_client(base_url, http).unwrap()
}

fn victoria() -> Location {
    Location::new(
        "https://www2.gov.bc.ca/victoria",
        ServiceType::ServiceBC,
        "Victoria",
        48.4284,
        -123.3656,
    )
    .with_services(["Driver Licensing"])
}

#[tokio::test]
async fn test_upsert_creates_then_updates() {
    let (url, state) = serve().await;
    let client = client(&url);

    let outcome = client.upsert_location(TOKEN, &victoria()).await.unwrap();
    assert_eq!(outcome, UpsertOutcome::Created);

    let moved = victoria().with_address("1150 Douglas St");
    let outcome = client.upsert_location(TOKEN, &moved).await.unwrap();
    assert_eq!(outcome, UpsertOutcome::Updated);

    assert_eq!(state.store.lock().await.count_locations(None).unwrap(), 1);

    let all = client.all_locations().await.unwrap();
    assert_eq!(all.service_bc_locations.len(), 1);
    assert_eq!(
        all.service_bc_locations[0].address.as_deref(),
        Some("1150 Douglas St")
    );
    assert_eq!(all.service_bc_services, vec!["Driver Licensing"]);
}

#[tokio::test]
async fn test_upsert_with_wrong_token_is_an_api_error() {
    let (url, state) = serve().await;
    let client = client(&url);

    let result = client.upsert_location("not-the-secret", &victoria()).await;

    assert!(matches!(
        result,
        Err(ServiceClientError::ApiError { status: 403, .. })
    ));
    assert_eq!(state.store.lock().await.count_locations(None).unwrap(), 0);
}

#[tokio::test]
async fn test_criteria_and_health_round_trip() {
    let (url, _state) = serve().await;
    let client = client(&url);
    client.upsert_location(TOKEN, &victoria()).await.unwrap();

    assert!(client.is_reachable().await);
    assert_eq!(client.health().await.unwrap().status, "ok");

    let health_bc = client
        .locations_by_criteria(ServiceType::HealthBC)
        .await
        .unwrap();
    assert!(health_bc.location_data.is_empty());

    let service_bc = client
        .locations_by_criteria(ServiceType::ServiceBC)
        .await
        .unwrap();
    assert_eq!(service_bc.location_data.len(), 1);
    assert_eq!(service_bc.service_data, vec!["Driver Licensing"]);
}
