use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of decimal digits kept on a selected coordinate (about 11 m).
pub const COORDINATE_PRECISION: i32 = 4;

pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Latitude {0} is outside of [-90, 90]")]
    InvalidLatitude(f64),
    #[error("Longitude {0} is outside of [-180, 180]")]
    InvalidLongitude(f64),
}

/// Raw position as reported by the map widget, before any validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Click {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<(f64, f64)> for Click {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}, {}", self.latitude, self.longitude))
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(value: Coordinate) -> Self {
        (value.latitude, value.longitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl TryFrom<Click> for Coordinate {
    type Error = self::Error;

    fn try_from(click: Click) -> Result<Self, Self::Error> {
        Self::new(click.latitude, click.longitude)
    }
}

impl Coordinate {
    /// Bounds checks both axes and rounds them to [`COORDINATE_PRECISION`].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, self::Error> {
        if !LATITUDE_RANGE.contains(&latitude) {
            return Err(self::Error::InvalidLatitude(latitude));
        }
        if !LONGITUDE_RANGE.contains(&longitude) {
            return Err(self::Error::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude: round(latitude),
            longitude: round(longitude),
        })
    }

    /// Comma separated pair used by the routing and time zone providers.
    pub fn to_query_string(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }

    pub fn latitude_string(&self) -> String {
        format!("{:.*}", COORDINATE_PRECISION as usize, self.latitude)
    }

    pub fn longitude_string(&self) -> String {
        format!("{:.*}", COORDINATE_PRECISION as usize, self.longitude)
    }
}

fn round(value: f64) -> f64 {
    let factor = 10f64.powi(COORDINATE_PRECISION);
    (value * factor).round() / factor
}

#[test]
fn rounds_to_four_digits() {
    let coord = Coordinate::new(44.64059687284279, -63.578466657511996).unwrap();
    assert_eq!(coord.latitude, 44.6406);
    assert_eq!(coord.longitude, -63.5785);
}

#[test]
fn rejects_nan() {
    assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    assert!(Coordinate::new(0.0, f64::NAN).is_err());
}

#[test]
fn query_string() {
    let coord = Coordinate::from((44.6401, -63.5785));
    assert_eq!(coord.to_query_string(), "44.6401,-63.5785");
}
