//! User settings and the service that mutates them.
//!
//! [`SettingsService`] is the single owner of the in-memory settings. Every
//! change goes through [`SettingsService::apply`], which sets the value,
//! persists the whole settings object and, for users who opted in, reports
//! the change to the attached [`AnalyticsSink`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use wayfinder_types::Coordinate;

use crate::error::Result;
use crate::storage::{CURRENT_LOCATION_KEY, SETTINGS_KEY, load_json_lenient, save_json};
use crate::traits::{AnalyticsSink, KeyValueStore};

/// Smallest selectable location range, in kilometres.
pub const MIN_LOCATION_RANGE: u32 = 1;

/// Largest selectable location range, in kilometres.
pub const MAX_LOCATION_RANGE: u32 = 5000;

/// Location range used before the user picks one, in kilometres.
pub const DEFAULT_LOCATION_RANGE: u32 = 50;

/// Language used before the user picks one.
pub const DEFAULT_LANG: &str = "eng";

/// Persisted user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Language code.
    pub lang: String,
    /// Never fetch from the network, even when online.
    pub offline_mode: bool,
    /// Whether analytics events may be sent.
    pub analytics_opt_in: bool,
    /// Maximum distance of listed locations, in kilometres.
    pub location_range: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
            offline_mode: false,
            analytics_opt_in: false,
            location_range: DEFAULT_LOCATION_RANGE,
        }
    }
}

impl Settings {
    /// Whether network fetches are allowed given connectivity.
    pub fn can_fetch(&self, online: bool) -> bool {
        online && !self.offline_mode
    }
}

/// Clamp a location range to the selectable bounds.
pub fn clamp_location_range(range: u32) -> u32 {
    range.clamp(MIN_LOCATION_RANGE, MAX_LOCATION_RANGE)
}

/// A single settings mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingChange {
    Lang(String),
    OfflineMode(bool),
    AnalyticsOptIn(bool),
    LocationRange(u32),
}

impl SettingChange {
    /// Name of the changed setting, as reported to analytics.
    pub fn name(&self) -> &'static str {
        match self {
            SettingChange::Lang(_) => "language",
            SettingChange::OfflineMode(_) => "offlineMode",
            SettingChange::AnalyticsOptIn(_) => "analyticsOptIn",
            SettingChange::LocationRange(_) => "locationRange",
        }
    }

    /// New value as text.
    pub fn value(&self) -> String {
        match self {
            SettingChange::Lang(lang) => lang.clone(),
            SettingChange::OfflineMode(value) | SettingChange::AnalyticsOptIn(value) => {
                value.to_string()
            }
            SettingChange::LocationRange(range) => range.to_string(),
        }
    }
}

/// An analytics event describing a settings change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsEvent {
    /// Name of the changed setting.
    pub setting: String,
    /// New value as text.
    pub value: String,
    /// Where the user was when the change was made.
    pub coordinate: Coordinate,
}

/// Owner of the user's settings.
pub struct SettingsService<K: KeyValueStore> {
    settings: Settings,
    store: K,
    analytics: Option<Box<dyn AnalyticsSink>>,
}

impl<K: KeyValueStore> std::fmt::Debug for SettingsService<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsService")
            .field("settings", &self.settings)
            .field("analytics", &self.analytics.is_some())
            .finish()
    }
}

impl<K: KeyValueStore> SettingsService<K> {
    /// Initialize from the persisted settings, or defaults if none are
    /// stored or the stored value is unreadable.
    pub fn load(store: K) -> Result<Self> {
        let settings = match load_json_lenient::<Settings, _>(&store, SETTINGS_KEY)? {
            Some(mut settings) => {
                settings.location_range = clamp_location_range(settings.location_range);
                settings
            }
            None => {
                debug!("No stored settings, using defaults");
                Settings::default()
            }
        };

        Ok(Self {
            settings,
            store,
            analytics: None,
        })
    }

    /// Attach the sink that receives opted-in analytics events.
    pub fn with_analytics(mut self, sink: Box<dyn AnalyticsSink>) -> Self {
        self.analytics = Some(sink);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn set_lang(&mut self, lang: impl Into<String>) {
        self.settings.lang = lang.into();
    }

    pub fn set_offline_mode(&mut self, offline_mode: bool) {
        self.settings.offline_mode = offline_mode;
    }

    pub fn set_analytics_opt_in(&mut self, opt_in: bool) {
        self.settings.analytics_opt_in = opt_in;
    }

    /// Set the location range, clamped to [1, 5000].
    pub fn set_location_range(&mut self, range: u32) {
        self.settings.location_range = clamp_location_range(range);
    }

    /// Write the whole settings object to the store.
    pub fn persist(&self) -> Result<()> {
        save_json(&self.store, SETTINGS_KEY, &self.settings)
    }

    /// Set, persist and report one change.
    ///
    /// The event is only sent when a sink is attached, the user has opted
    /// in (as of after the change) and a current location is cached.
    pub fn apply(&mut self, change: SettingChange) -> Result<()> {
        match &change {
            SettingChange::Lang(lang) => self.set_lang(lang.clone()),
            SettingChange::OfflineMode(value) => self.set_offline_mode(*value),
            SettingChange::AnalyticsOptIn(value) => self.set_analytics_opt_in(*value),
            SettingChange::LocationRange(range) => self.set_location_range(*range),
        }
        self.persist()?;
        info!("Setting {} changed to {}", change.name(), change.value());

        self.emit(&change)
    }

    fn emit(&self, change: &SettingChange) -> Result<()> {
        let Some(sink) = self.analytics.as_ref() else {
            return Ok(());
        };
        if !self.settings.analytics_opt_in {
            return Ok(());
        }
        let Some(coordinate) = load_json_lenient::<Coordinate, _>(&self.store, CURRENT_LOCATION_KEY)?
        else {
            debug!("No current location, skipping analytics event");
            return Ok(());
        };

        sink.track(&AnalyticsEvent {
            setting: change.name().to_string(),
            value: change.value(),
            coordinate,
        });
        Ok(())
    }
}
