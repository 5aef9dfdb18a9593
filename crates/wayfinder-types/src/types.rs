//! Core types for service-location records.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};

/// Category of a service location.
///
/// The API only serves and accepts these values; anything else is rejected
/// before the store is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ServiceType {
    /// Service BC offices.
    #[serde(rename = "ServiceBC")]
    ServiceBC,
    /// Health BC sites.
    #[serde(rename = "HealthBC")]
    HealthBC,
}

impl ServiceType {
    /// Every supported service type, in response order.
    pub const ALL: [ServiceType; 2] = [ServiceType::ServiceBC, ServiceType::HealthBC];

    /// Returns the wire representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfinder_types::ServiceType;
    ///
    /// assert_eq!(ServiceType::ServiceBC.as_str(), "ServiceBC");
    /// assert_eq!(ServiceType::HealthBC.as_str(), "HealthBC");
    /// ```
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::ServiceBC => "ServiceBC",
            ServiceType::HealthBC => "HealthBC",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = ParseError;

    /// Parse a service type. Matching is exact; `"servicebc"` is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use wayfinder_types::ServiceType;
    ///
    /// assert_eq!("HealthBC".parse::<ServiceType>(), Ok(ServiceType::HealthBC));
    /// assert!("DriverBC".parse::<ServiceType>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ServiceBC" => Ok(ServiceType::ServiceBC),
            "HealthBC" => Ok(ServiceType::HealthBC),
            other => Err(ParseError::UnknownServiceType(other.to_string())),
        }
    }
}

/// A geographic coordinate in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, -90 to 90.
    pub latitude: f64,
    /// Longitude in degrees, -180 to 180.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting out-of-range or non-finite values.
    pub fn new(latitude: f64, longitude: f64) -> ParseResult<Self> {
        let coordinate = Self {
            latitude,
            longitude,
        };
        if coordinate.is_valid() {
            Ok(coordinate)
        } else {
            Err(ParseError::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    /// Whether both components are finite and within range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// A physical service site.
///
/// Serialized in camelCase to match the wire format used by the scraper and
/// the client. Contact fields this crate does not interpret are kept in
/// [`Location::extra`] and round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Office web page; the identifying key used for upserts.
    pub website: String,
    /// Category of the site.
    pub service_type: ServiceType,
    /// Display name of the site (usually the community).
    pub locale: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Names of the services offered at this site.
    #[serde(default)]
    pub services: Vec<String>,
    /// Street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Any other fields supplied by the scraper.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Location {
    /// Create a location with no services or contact details.
    pub fn new(
        website: impl Into<String>,
        service_type: ServiceType,
        locale: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            website: website.into(),
            service_type,
            locale: locale.into(),
            latitude,
            longitude,
            services: Vec::new(),
            address: None,
            phone: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Replace the offered services.
    #[must_use]
    pub fn with_services<I, S>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.services = services.into_iter().map(Into::into).collect();
        self
    }

    /// Set the street address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// The site's coordinate.
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Check the invariants a record must satisfy before it is created.
    ///
    /// The service type is already enforced by deserialization.
    pub fn validate(&self) -> ParseResult<()> {
        if self.website.trim().is_empty() {
            return Err(ParseError::EmptyField("website"));
        }
        if self.locale.trim().is_empty() {
            return Err(ParseError::EmptyField("locale"));
        }
        Coordinate::new(self.latitude, self.longitude)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn victoria() -> Location {
        Location::new(
            "https://www2.gov.bc.ca/victoria",
            ServiceType::ServiceBC,
            "Victoria",
            48.4284,
            -123.3656,
        )
        .with_services(["Driver Licensing", "BC Services Card"])
        .with_address("403 Vancouver St")
    }

    #[test]
    fn test_service_type_round_trips_through_str() {
        for service_type in ServiceType::ALL {
            assert_eq!(service_type.as_str().parse::<ServiceType>(), Ok(service_type));
        }
    }

    #[test]
    fn test_service_type_rejects_case_variants() {
        assert_eq!(
            "servicebc".parse::<ServiceType>(),
            Err(ParseError::UnknownServiceType("servicebc".to_string()))
        );
        assert!("".parse::<ServiceType>().is_err());
    }

    #[test]
    fn test_service_type_display() {
        assert_eq!(ServiceType::HealthBC.to_string(), "HealthBC");
    }

    #[test]
    fn test_coordinate_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(90.1, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_location_serializes_camel_case() {
        let json = serde_json::to_value(victoria()).unwrap();
        assert_eq!(json["serviceType"], "ServiceBC");
        assert_eq!(json["locale"], "Victoria");
        assert_eq!(json["services"][0], "Driver Licensing");
        assert!(json.get("phone").is_none());
    }

    #[test]
    fn test_location_preserves_unknown_fields() {
        let json = serde_json::json!({
            "website": "https://example.gov.bc.ca/hope",
            "serviceType": "HealthBC",
            "locale": "Hope",
            "latitude": 49.38,
            "longitude": -121.44,
            "services": ["Lab"],
            "hours": "8:30-4:30",
            "fax": "604-555-0100"
        });

        let location: Location = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(location.extra["hours"], "8:30-4:30");
        assert_eq!(serde_json::to_value(&location).unwrap(), json);
    }

    #[test]
    fn test_location_rejects_unknown_service_type() {
        let json = serde_json::json!({
            "website": "https://example.gov.bc.ca",
            "serviceType": "ParksBC",
            "locale": "Hope",
            "latitude": 49.38,
            "longitude": -121.44
        });
        assert!(serde_json::from_value::<Location>(json).is_err());
    }

    #[test]
    fn test_location_services_default_to_empty() {
        let json = serde_json::json!({
            "website": "https://example.gov.bc.ca",
            "serviceType": "ServiceBC",
            "locale": "Hope",
            "latitude": 49.38,
            "longitude": -121.44
        });
        let location: Location = serde_json::from_value(json).unwrap();
        assert!(location.services.is_empty());
    }

    #[test]
    fn test_validate() {
        assert!(victoria().validate().is_ok());

        let mut no_website = victoria();
        no_website.website = "  ".to_string();
        assert_eq!(no_website.validate(), Err(ParseError::EmptyField("website")));

        let mut no_locale = victoria();
        no_locale.locale.clear();
        assert_eq!(no_locale.validate(), Err(ParseError::EmptyField("locale")));

        let mut off_planet = victoria();
        off_planet.latitude = 123.0;
        assert!(matches!(
            off_planet.validate(),
            Err(ParseError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_coordinate_accessor() {
        let coordinate = victoria().coordinate();
        assert_eq!(coordinate.latitude, 48.4284);
        assert_eq!(coordinate.longitude, -123.3656);
    }
}
