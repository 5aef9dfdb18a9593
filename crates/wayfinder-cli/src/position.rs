//! Position from the command line or the environment.

use async_trait::async_trait;

use wayfinder_core::{CoordinateProvider, Error, Result};
use wayfinder_types::Coordinate;

use crate::cli::PositionArgs;

/// Environment variable holding a `"lat,lon"` position.
pub const POSITION_ENV: &str = "WAYFINDER_POSITION";

/// Parse a `"lat,lon"` pair in decimal degrees.
///
/// # Examples
///
/// ```
/// use wayfinder_cli::position::parse_position;
///
/// let here = parse_position("48.4284, -123.3656").unwrap();
/// assert_eq!(here.latitude, 48.4284);
/// assert!(parse_position("48.4284").is_err());
/// ```
pub fn parse_position(value: &str) -> Result<Coordinate> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| Error::Position(format!("expected \"lat,lon\", got {:?}", value)))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|e| Error::Position(format!("{:?}: {}", part.trim(), e)))
    };
    Coordinate::new(parse(lat)?, parse(lon)?).map_err(|e| Error::Position(e.to_string()))
}

/// A position fix that is known up front.
///
/// An explicit `--lat/--lon` wins over [`POSITION_ENV`]; with neither there
/// is no fix and the cached location is used.
#[derive(Debug, Clone, Default)]
pub struct StaticPosition {
    raw: Option<Source>,
}

#[derive(Debug, Clone)]
enum Source {
    Args { lat: f64, lon: f64 },
    Env(String),
}

impl StaticPosition {
    /// Position from command-line arguments, falling back to the environment.
    pub fn from_args(args: &PositionArgs) -> Self {
        Self::resolve(args, std::env::var(POSITION_ENV).ok())
    }

    fn resolve(args: &PositionArgs, env: Option<String>) -> Self {
        let raw = match (args.lat, args.lon) {
            (Some(lat), Some(lon)) => Some(Source::Args { lat, lon }),
            _ => env.filter(|v| !v.trim().is_empty()).map(Source::Env),
        };
        Self { raw }
    }

    /// No position at all.
    pub fn none() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CoordinateProvider for StaticPosition {
    async fn current_position(&self) -> Result<Option<Coordinate>> {
        match &self.raw {
            None => Ok(None),
            Some(Source::Args { lat, lon }) => Coordinate::new(*lat, *lon)
                .map(Some)
                .map_err(|e| Error::Position(e.to_string())),
            Some(Source::Env(value)) => parse_position(value).map(Some),
        }
    }
}
