//! Persisted client state keys and JSON helpers over [`KeyValueStore`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::Result;
use crate::traits::KeyValueStore;

/// Key of the persisted [`Settings`](crate::settings::Settings).
pub const SETTINGS_KEY: &str = "settings";

/// Key of the cached current location.
pub const CURRENT_LOCATION_KEY: &str = "currentLocation";

/// Key of the cached seed data.
pub const APP_DATA_KEY: &str = "appData";

/// Read and decode the JSON value stored under `key`.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Like [`load_json`], but a value that no longer decodes is treated as
/// absent.
pub fn load_json_lenient<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match load_json(store, key) {
        Err(crate::Error::Serialization(e)) => {
            warn!("Ignoring unreadable value under '{}': {}", key, e);
            Ok(None)
        }
        other => other,
    }
}

/// Encode `value` as JSON and store it under `key`.
pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
