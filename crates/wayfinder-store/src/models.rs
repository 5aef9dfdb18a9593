//! Data models for stored data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use wayfinder_types::Location;

use crate::error::Result;

/// A location row as stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredLocation {
    /// Database row ID.
    pub id: i64,
    /// The location document.
    pub location: Location,
    /// When the record was first written.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the record was last written.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Summary of a seed import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    /// Records that did not exist before.
    pub created: usize,
    /// Records matched by website and updated.
    pub updated: usize,
    /// Entries that were not written, with the reason.
    pub rejected: Vec<String>,
}

impl ImportResult {
    /// Total entries processed.
    pub fn total(&self) -> usize {
        self.created + self.updated + self.rejected.len()
    }
}

/// Overlay the fields of `patch` onto `existing`.
///
/// Keys present in `patch` replace the stored value; keys absent from it are
/// kept. The merged document must still form a valid [`Location`].
pub fn merge_document(existing: &Location, patch: &Map<String, Value>) -> Result<Location> {
    let mut document = match serde_json::to_value(existing)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in patch {
        document.insert(key.clone(), value.clone());
    }

    let merged: Location = serde_json::from_value(Value::Object(document))?;
    merged.validate()?;
    Ok(merged)
}
