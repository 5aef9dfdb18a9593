//! Client flows against the filesystem-backed host implementations.

use std::sync::Arc;

use wayfinder_cli::{FileKeyValueStore, FsCacheController, StaticPosition};
use wayfinder_cli::cli::PositionArgs;
use wayfinder_core::{
    AppDataCache, CURRENT_LOCATION_KEY, KeyValueStore, MockLocationSource, RecordingAnalytics,
    SETTINGS_KEY, SettingChange, SettingsService, assemble_view, clear_cache, clear_local_storage,
    refresh, resolve_current_location,
};
use wayfinder_types::{Location, ServiceType};

fn offices() -> Vec<Location> {
    vec![
        Location::new(
            "https://www2.gov.bc.ca/vancouver",
            ServiceType::ServiceBC,
            "Vancouver",
            49.2827,
            -123.1207,
        ),
        Location::new(
            "https://www2.gov.bc.ca/victoria",
            ServiceType::ServiceBC,
            "Victoria",
            48.4284,
            -123.3656,
        ),
        Location::new(
            "https://www2.gov.bc.ca/prince-george",
            ServiceType::ServiceBC,
            "Prince George",
            53.9171,
            -122.7497,
        ),
    ]
}

fn victoria_args() -> PositionArgs {
    PositionArgs {
        lat: Some(48.4284),
        lon: Some(-123.3656),
    }
}

#[tokio::test]
async fn test_nearby_offices_from_file_state() {
    let dir = tempfile::tempdir().unwrap();
    let state = FileKeyValueStore::new(dir.path().join("state.json"));

    let mut settings = SettingsService::load(&state).unwrap();
    settings
        .apply(SettingChange::LocationRange(150))
        .unwrap();

    let source = MockLocationSource::new(offices());
    let app_data = AppDataCache::new(&state, &source);
    let data = app_data.reseed(true).await.unwrap().unwrap();

    let current = resolve_current_location(&StaticPosition::from_args(&victoria_args()), &state)
        .await
        .unwrap();

    let reopened = FileKeyValueStore::new(state.path());
    let range = SettingsService::load(&reopened).unwrap().settings().location_range;
    let view = assemble_view(
        data.data.locations(ServiceType::ServiceBC),
        current,
        f64::from(range),
        "",
    );

    let locales: Vec<_> = view.iter().map(|l| l.location.locale.as_str()).collect();
    assert_eq!(locales, vec!["Victoria", "Vancouver"]);
    assert_eq!(view[0].distance, "0.00");
}

#[tokio::test]
async fn test_cached_location_used_without_fix() {
    let dir = tempfile::tempdir().unwrap();
    let state = FileKeyValueStore::new(dir.path().join("state.json"));

    resolve_current_location(&StaticPosition::from_args(&victoria_args()), &state)
        .await
        .unwrap();
    assert!(state.contains(CURRENT_LOCATION_KEY).unwrap());

    let cached = resolve_current_location(&StaticPosition::none(), &state)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cached.latitude, 48.4284);
}

#[tokio::test]
async fn test_settings_change_reports_location_when_opted_in() {
    let dir = tempfile::tempdir().unwrap();
    let state = FileKeyValueStore::new(dir.path().join("state.json"));
    resolve_current_location(&StaticPosition::from_args(&victoria_args()), &state)
        .await
        .unwrap();

    let analytics = RecordingAnalytics::new();
    let mut settings = SettingsService::load(&state)
        .unwrap()
        .with_analytics(Box::new(analytics.clone()));

    settings.apply(SettingChange::Lang("fra".to_string())).unwrap();
    assert!(analytics.events().is_empty());

    settings.apply(SettingChange::AnalyticsOptIn(true)).unwrap();
    let events = analytics.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].setting, "analyticsOptIn");
    assert_eq!(events[0].coordinate.longitude, -123.3656);

    let raw = state.get(SETTINGS_KEY).unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored["lang"], "fra");
    assert_eq!(stored["analytics_opt_in"], true);
}

#[tokio::test]
async fn test_refresh_then_clear_everything() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(FileKeyValueStore::new(dir.path().join("state.json")));
    let cache = FsCacheController::new(dir.path().join("cache"));

    for name in ["mapTiles", "site"] {
        std::fs::create_dir_all(cache.cache_dir(name)).unwrap();
    }
    cache.register().unwrap();

    let source = MockLocationSource::new(offices());
    let app_data = AppDataCache::new(Arc::clone(&state), &source);
    let report = refresh(&app_data, &cache, true).await.unwrap();

    assert!(report.reseeded);
    assert_eq!(report.caches_deleted, vec!["mapTiles", "site"]);
    assert!(report.unregistered);
    assert!(report.reloaded);
    assert!(app_data.cached().unwrap().is_some());

    assert!(clear_cache(&cache).await.unwrap());

    clear_local_storage(&*state).unwrap();
    assert!(app_data.cached().unwrap().is_none());
    assert!(!state.path().exists());
}
