//! Main store implementation.

use std::path::Path;

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use wayfinder_types::{Location, ParseError, ServiceType, UpsertOutcome};

use crate::error::{Error, Result};
use crate::models::{ImportResult, StoredLocation, merge_document};
use crate::queries::LocationQuery;
use crate::schema;

/// SQLite-backed document collection of service locations.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }
}

// Queries
impl Store {
    /// Query stored rows with filters.
    pub fn query_locations(&self, query: &LocationQuery) -> Result<Vec<StoredLocation>> {
        let sql = query.build_sql();
        let (_, params) = query.build_where();

        debug!("Executing query: {}", sql);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_ref.as_slice(), stored_location_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// All records of one service type, in insertion order.
    pub fn find_by_service_type(&self, service_type: ServiceType) -> Result<Vec<Location>> {
        let query = LocationQuery::new().service_type(service_type);
        Ok(self
            .query_locations(&query)?
            .into_iter()
            .map(|row| row.location)
            .collect())
    }

    /// The record with this website, if any.
    ///
    /// If several rows share the website the oldest is returned.
    pub fn find_by_website(&self, website: &str) -> Result<Option<Location>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, document, created_at, updated_at FROM locations
             WHERE website = ? ORDER BY id ASC LIMIT 1",
        )?;

        let row = stmt
            .query_row([website], stored_location_from_row)
            .optional()?;

        Ok(row.map(|row| row.location))
    }

    /// Count records, optionally of one service type.
    pub fn count_locations(&self, service_type: Option<ServiceType>) -> Result<u64> {
        let count: i64 = match service_type {
            Some(service_type) => self.conn.query_row(
                "SELECT COUNT(*) FROM locations WHERE service_type = ?",
                [service_type.as_str()],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))?,
        };

        Ok(count as u64)
    }
}

// Writes
impl Store {
    /// Insert a new record after validating it.
    ///
    /// Returns the row ID.
    pub fn create(&self, location: &Location) -> Result<i64> {
        location.validate()?;

        let document = serde_json::to_string(location)?;
        let now = OffsetDateTime::now_utc().unix_timestamp();

        self.conn.execute(
            "INSERT INTO locations (website, service_type, document, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            rusqlite::params![
                location.website,
                location.service_type.as_str(),
                document,
                now
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Created location {} ({})", location.website, id);
        Ok(id)
    }

    /// Replace the document of the record whose website is `website`.
    ///
    /// When several rows share the website only the oldest, the one
    /// [`Store::find_by_website`] returns, is changed. Returns the number of
    /// rows changed; zero when nothing matched.
    pub fn update_by_website(&self, website: &str, location: &Location) -> Result<usize> {
        location.validate()?;

        let document = serde_json::to_string(location)?;
        let now = OffsetDateTime::now_utc().unix_timestamp();

        let changed = self.conn.execute(
            "UPDATE locations SET
                website = ?2,
                service_type = ?3,
                document = ?4,
                updated_at = ?5
             WHERE id = (SELECT MIN(id) FROM locations WHERE website = ?1)",
            rusqlite::params![
                website,
                location.website,
                location.service_type.as_str(),
                document,
                now
            ],
        )?;

        debug!("Updated {} row(s) for {}", changed, website);
        Ok(changed)
    }

    /// Create or update a record from a raw JSON document.
    ///
    /// An existing record matched by `website` has the document's fields
    /// overlaid onto it; otherwise the document must form a complete record.
    pub fn upsert_document(&self, document: &Map<String, Value>) -> Result<UpsertOutcome> {
        let website = document
            .get("website")
            .and_then(Value::as_str)
            .filter(|website| !website.trim().is_empty())
            .ok_or(Error::Validation(ParseError::EmptyField("website")))?;

        match self.find_by_website(website)? {
            Some(existing) => {
                let merged = merge_document(&existing, document)?;
                self.update_by_website(website, &merged)?;
                Ok(UpsertOutcome::Updated)
            }
            None => {
                let location: Location = serde_json::from_value(Value::Object(document.clone()))?;
                self.create(&location)?;
                Ok(UpsertOutcome::Created)
            }
        }
    }

    /// Import location documents from a JSON array.
    ///
    /// Every entry goes through [`Store::upsert_document`]. Entries that are
    /// not objects or fail validation are reported in
    /// [`ImportResult::rejected`]; database errors abort the import.
    pub fn import_json(&self, json: &str) -> Result<ImportResult> {
        let entries: Vec<Value> = serde_json::from_str(json)?;
        let mut result = ImportResult::default();

        for (index, entry) in entries.into_iter().enumerate() {
            let Value::Object(document) = entry else {
                result.rejected.push(format!("entry {}: not an object", index));
                continue;
            };

            match self.upsert_document(&document) {
                Ok(UpsertOutcome::Created) => result.created += 1,
                Ok(UpsertOutcome::Updated) => result.updated += 1,
                Err(e) if e.is_invalid_record() => {
                    warn!("Skipping entry {}: {}", index, e);
                    result.rejected.push(format!("entry {}: {}", index, e));
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Imported {} locations ({} created, {} updated, {} rejected)",
            result.total(),
            result.created,
            result.updated,
            result.rejected.len()
        );
        Ok(result)
    }
}

fn stored_location_from_row(row: &Row<'_>) -> rusqlite::Result<StoredLocation> {
    let document: String = row.get(1)?;
    let location = serde_json::from_str(&document)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

    Ok(StoredLocation {
        id: row.get(0)?,
        location,
        created_at: timestamp_from_row(row, 2)?,
        updated_at: timestamp_from_row(row, 3)?,
    })
}

fn timestamp_from_row(row: &Row<'_>, idx: usize) -> rusqlite::Result<OffsetDateTime> {
    let seconds: i64 = row.get(idx)?;
    OffsetDateTime::from_unix_timestamp(seconds)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn office(website: &str, locale: &str) -> Location {
        Location::new(website, ServiceType::ServiceBC, locale, 48.43, -123.37)
            .with_services(["Driver Licensing"])
    }

    fn document(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("document must be an object"),
        }
    }

    #[test]
    fn test_open_in_memory() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.count_locations(None).unwrap(), 0);
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("locations.db");

        let store = Store::open(&path).unwrap();
        store.create(&office("https://a.example", "Victoria")).unwrap();
        drop(store);

        let reopened = Store::open(&path).unwrap();
        assert_eq!(reopened.count_locations(None).unwrap(), 1);
    }

    #[test]
    fn test_find_by_service_type_filters_and_keeps_order() {
        let store = Store::open_in_memory().unwrap();
        store.create(&office("https://b.example", "Nanaimo")).unwrap();
        store
            .create(&Location::new(
                "https://h.example",
                ServiceType::HealthBC,
                "Hope",
                49.38,
                -121.44,
            ))
            .unwrap();
        store.create(&office("https://a.example", "Victoria")).unwrap();

        let offices = store.find_by_service_type(ServiceType::ServiceBC).unwrap();
        let websites: Vec<_> = offices.iter().map(|l| l.website.as_str()).collect();
        assert_eq!(websites, ["https://b.example", "https://a.example"]);

        let health = store.find_by_service_type(ServiceType::HealthBC).unwrap();
        assert_eq!(health.len(), 1);
        assert_eq!(store.count_locations(Some(ServiceType::HealthBC)).unwrap(), 1);
    }

    #[test]
    fn test_create_rejects_invalid_record() {
        let store = Store::open_in_memory().unwrap();
        let invalid = office("https://a.example", "");

        let result = store.create(&invalid);
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(store.count_locations(None).unwrap(), 0);
    }

    #[test]
    fn test_find_by_website() {
        let store = Store::open_in_memory().unwrap();
        store.create(&office("https://a.example", "Victoria")).unwrap();

        let found = store.find_by_website("https://a.example").unwrap().unwrap();
        assert_eq!(found.locale, "Victoria");
        assert!(store.find_by_website("https://missing.example").unwrap().is_none());
    }

    #[test]
    fn test_update_by_website() {
        let store = Store::open_in_memory().unwrap();
        store.create(&office("https://a.example", "Victoria")).unwrap();

        let changed = store
            .update_by_website("https://a.example", &office("https://a.example", "Saanich"))
            .unwrap();
        assert_eq!(changed, 1);
        assert_eq!(
            store.find_by_website("https://a.example").unwrap().unwrap().locale,
            "Saanich"
        );

        let changed = store
            .update_by_website("https://none.example", &office("https://none.example", "X"))
            .unwrap();
        assert_eq!(changed, 0);
    }

    #[test]
    fn test_update_by_website_changes_only_oldest_duplicate() {
        let store = Store::open_in_memory().unwrap();
        store.create(&office("https://a.example", "Victoria")).unwrap();
        store.create(&office("https://a.example", "Langford")).unwrap();

        let changed = store
            .update_by_website("https://a.example", &office("https://a.example", "Saanich"))
            .unwrap();
        assert_eq!(changed, 1);

        let locales: Vec<_> = store
            .find_by_service_type(ServiceType::ServiceBC)
            .unwrap()
            .into_iter()
            .map(|l| l.locale)
            .collect();
        assert_eq!(locales, ["Saanich", "Langford"]);
    }

    #[test]
    fn test_upsert_document_creates_then_updates() {
        let store = Store::open_in_memory().unwrap();
        let first = document(json!({
            "website": "https://a.example",
            "serviceType": "ServiceBC",
            "locale": "Victoria",
            "latitude": 48.43,
            "longitude": -123.37,
            "services": ["Driver Licensing"]
        }));

        assert_eq!(store.upsert_document(&first).unwrap(), UpsertOutcome::Created);

        let second = document(json!({
            "website": "https://a.example",
            "locale": "Victoria Downtown",
            "services": ["BC Services Card"]
        }));
        assert_eq!(store.upsert_document(&second).unwrap(), UpsertOutcome::Updated);

        assert_eq!(store.count_locations(None).unwrap(), 1);
        let stored = store.find_by_website("https://a.example").unwrap().unwrap();
        assert_eq!(stored.locale, "Victoria Downtown");
        assert_eq!(stored.services, vec!["BC Services Card"]);
        assert_eq!(stored.latitude, 48.43);
    }

    #[test]
    fn test_upsert_document_requires_website() {
        let store = Store::open_in_memory().unwrap();
        let result = store.upsert_document(&document(json!({ "locale": "Hope" })));
        assert!(matches!(
            result,
            Err(Error::Validation(ParseError::EmptyField("website")))
        ));
    }

    #[test]
    fn test_upsert_document_incomplete_new_record() {
        let store = Store::open_in_memory().unwrap();
        let result = store.upsert_document(&document(json!({ "website": "https://a.example" })));
        assert!(result.unwrap_err().is_invalid_record());
        assert_eq!(store.count_locations(None).unwrap(), 0);
    }

    #[test]
    fn test_query_locations_timestamps_and_pagination() {
        let store = Store::open_in_memory().unwrap();
        for i in 0..5 {
            store
                .create(&office(&format!("https://{}.example", i), "Victoria"))
                .unwrap();
        }

        let page = store
            .query_locations(&LocationQuery::new().limit(2).offset(2))
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].location.website, "https://2.example");
        assert!(page[0].updated_at >= page[0].created_at);
    }

    #[test]
    fn test_import_json() {
        let store = Store::open_in_memory().unwrap();
        store.create(&office("https://a.example", "Victoria")).unwrap();

        let json = r#"[
            {"website": "https://a.example", "locale": "Esquimalt"},
            {"website": "https://h.example", "serviceType": "HealthBC", "locale": "Hope",
             "latitude": 49.38, "longitude": -121.44, "services": ["Lab"]},
            {"website": "https://bad.example", "serviceType": "ParksBC", "locale": "X",
             "latitude": 0, "longitude": 0},
            "not an object"
        ]"#;

        let result = store.import_json(json).unwrap();
        assert_eq!(result.created, 1);
        assert_eq!(result.updated, 1);
        assert_eq!(result.rejected.len(), 2);
        assert_eq!(store.count_locations(None).unwrap(), 2);
    }

    #[test]
    fn test_import_json_rejects_non_array() {
        let store = Store::open_in_memory().unwrap();
        assert!(matches!(
            store.import_json("{}"),
            Err(Error::Serialization(_))
        ));
    }
}
