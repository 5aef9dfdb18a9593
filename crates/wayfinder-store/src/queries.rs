//! Query builder for location records.

use wayfinder_types::ServiceType;

/// Fluent query builder for stored locations.
///
/// Results are returned in insertion order.
///
/// # Example
///
/// ```
/// use wayfinder_store::LocationQuery;
/// use wayfinder_types::ServiceType;
///
/// let query = LocationQuery::new()
///     .service_type(ServiceType::HealthBC)
///     .limit(20);
/// ```
#[derive(Debug, Default, Clone)]
pub struct LocationQuery {
    /// Filter by service type.
    pub service_type: Option<ServiceType>,
    /// Filter by exact website.
    pub website: Option<String>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Offset for pagination.
    pub offset: Option<u32>,
}

impl LocationQuery {
    /// Create a query matching every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only include records of this service type.
    pub fn service_type(mut self, service_type: ServiceType) -> Self {
        self.service_type = Some(service_type);
        self
    }

    /// Only include the record with this website.
    pub fn website(mut self, website: &str) -> Self {
        self.website = Some(website.to_string());
        self
    }

    /// Limit the maximum number of results returned.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip the first N results.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Build the SQL WHERE clause and parameters.
    pub(crate) fn build_where(&self) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(service_type) = self.service_type {
            conditions.push("service_type = ?");
            params.push(Box::new(service_type.as_str()));
        }

        if let Some(ref website) = self.website {
            conditions.push("website = ?");
            params.push(Box::new(website.clone()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self) -> String {
        let (where_clause, _) = self.build_where();

        let mut sql = format!(
            "SELECT id, document, created_at, updated_at FROM locations {} ORDER BY id ASC",
            where_clause
        );

        // SQLite only accepts OFFSET after a LIMIT
        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => {
                sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset))
            }
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {}", limit)),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {}", offset)),
            (None, None) => {}
        }

        sql
    }
}
