use std::env;

use thiserror::Error;

use crate::shared::geo::{self, Coordinate};

pub const ORIGIN: Coordinate = Coordinate {
    latitude: 44.64059687284279,
    longitude: -63.578466657511996,
};

pub const ROUTING_KEY_VAR: &str = "PINPOINT_ROUTING_KEY";
pub const AIR_QUALITY_KEY_VAR: &str = "PINPOINT_AIR_QUALITY_KEY";
pub const TIME_ZONE_KEY_VAR: &str = "PINPOINT_TIME_ZONE_KEY";
pub const ORIGIN_VAR: &str = "PINPOINT_ORIGIN";
pub const ROUTING_URL_VAR: &str = "PINPOINT_ROUTING_URL";
pub const AIR_QUALITY_URL_VAR: &str = "PINPOINT_AIR_QUALITY_URL";
pub const TIME_ZONE_URL_VAR: &str = "PINPOINT_TIME_ZONE_URL";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing environment variable: {0}")]
    MissingVariable(&'static str),
    #[error("Could not parse {0} as \"lat,lng\": {1}")]
    InvalidOrigin(String, String),
    #[error("Invalid origin: {0}")]
    Coordinate(#[from] geo::Error),
}

/// Endpoint and opaque credential of one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Provider {
    pub base_url: String,
    pub api_key: String,
}

impl Provider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

/// Initial view handed to the map widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapSettings {
    pub center: Coordinate,
    pub zoom: u8,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center: ORIGIN,
            zoom: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub origin: Coordinate,
    pub routing: Provider,
    pub air_quality: Provider,
    pub time_zone: Provider,
    pub map: MapSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: ORIGIN,
            routing: Provider::new("https://maps.googleapis.com/maps/api", ""),
            air_quality: Provider::new("https://api.airvisual.com/v2", ""),
            time_zone: Provider::new("https://maps.googleapis.com/maps/api", ""),
            map: MapSettings::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Default::default()
    }

    /// Keys are required, everything else falls back to [`Config::default`].
    pub fn from_env() -> Result<Self, self::Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, self::Error>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();
        let required = |name: &'static str| lookup(name).ok_or(self::Error::MissingVariable(name));
        config.routing.api_key = required(ROUTING_KEY_VAR)?;
        config.air_quality.api_key = required(AIR_QUALITY_KEY_VAR)?;
        config.time_zone.api_key = required(TIME_ZONE_KEY_VAR)?;

        if let Some(url) = lookup(ROUTING_URL_VAR) {
            config.routing.base_url = url;
        }
        if let Some(url) = lookup(AIR_QUALITY_URL_VAR) {
            config.air_quality.base_url = url;
        }
        if let Some(url) = lookup(TIME_ZONE_URL_VAR) {
            config.time_zone.base_url = url;
        }
        if let Some(origin) = lookup(ORIGIN_VAR) {
            config.origin = parse_origin(&origin)?;
            config.map.center = config.origin;
        }
        Ok(config)
    }
}

fn parse_origin(value: &str) -> Result<Coordinate, self::Error> {
    let invalid = |reason: &str| self::Error::InvalidOrigin(value.to_string(), reason.to_string());
    let (latitude, longitude) = value.split_once(',').ok_or_else(|| invalid("missing comma"))?;
    let latitude: f64 = latitude
        .trim()
        .parse()
        .map_err(|_| invalid("latitude is not a number"))?;
    let longitude: f64 = longitude
        .trim()
        .parse()
        .map_err(|_| invalid("longitude is not a number"))?;
    // Origin keeps full precision, only bounds are checked.
    Coordinate::new(latitude, longitude)?;
    Ok(Coordinate::from((latitude, longitude)))
}
