//! Pure mapping from the selection state to the values shown in the popup.

use std::fmt::Display;

use crate::{
    clients::AirQualityResult,
    selection::{Kind, SelectionState},
};

/// US EPA style severity buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AqiBucket {
    Green,
    Yellow,
    Orange,
    Red,
    Purple,
}

impl AqiBucket {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AqiBucket::Green => "green",
            AqiBucket::Yellow => "yellow",
            AqiBucket::Orange => "orange",
            AqiBucket::Red => "red",
            AqiBucket::Purple => "purple",
        }
    }
}

pub fn aqi_to_bucket(aqi: u32) -> AqiBucket {
    match aqi {
        0..=50 => AqiBucket::Green,
        51..=100 => AqiBucket::Yellow,
        101..=150 => AqiBucket::Orange,
        151..=200 => AqiBucket::Red,
        _ => AqiBucket::Purple,
    }
}

/// Color of the AQI swatch. `Unknown` is drawn gray and is never a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Known(AqiBucket),
    Unknown,
}

impl Severity {
    pub fn of(air_quality: Option<&AirQualityResult>) -> Self {
        match air_quality {
            Some(result) => Severity::Known(aqi_to_bucket(result.aqi_us)),
            None => Severity::Unknown,
        }
    }

    pub const fn color(&self) -> &'static str {
        match self {
            Severity::Known(bucket) => bucket.as_str(),
            Severity::Unknown => "gray",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.color())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirQualityView {
    pub city: String,
    pub aqi: u32,
}

/// Everything the popup renders, derived from scratch on every render.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub popup_open: bool,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub air_quality: Option<AirQualityView>,
    pub severity: Severity,
    pub travel_time: Option<String>,
    pub time_zone: Option<String>,
    pub alert: Option<String>,
    pub pending: Vec<Kind>,
}

impl View {
    pub fn from_state(state: &SelectionState) -> Self {
        let coordinate = state.selected();
        Self {
            popup_open: state.popup_open(),
            latitude: coordinate.map(|coordinate| coordinate.latitude_string()),
            longitude: coordinate.map(|coordinate| coordinate.longitude_string()),
            air_quality: state.air_quality().map(|result| AirQualityView {
                city: result.city.clone(),
                aqi: result.aqi_us,
            }),
            severity: Severity::of(state.air_quality()),
            travel_time: state
                .route()
                .map(|route| route.total_duration.to_travel_string()),
            time_zone: state.time_zone().map(str::to_string),
            alert: state.alert().map(str::to_string),
            pending: state.pending(),
        }
    }

    pub fn travel_label(&self) -> Option<String> {
        self.travel_time
            .as_ref()
            .map(|text| format!("Travel Time: {text} (In car)"))
    }
}

impl From<&SelectionState> for View {
    fn from(state: &SelectionState) -> Self {
        Self::from_state(state)
    }
}

#[test]
fn bucket_edges() {
    assert_eq!(aqi_to_bucket(0), AqiBucket::Green);
    assert_eq!(aqi_to_bucket(50), AqiBucket::Green);
    assert_eq!(aqi_to_bucket(51), AqiBucket::Yellow);
    assert_eq!(aqi_to_bucket(100), AqiBucket::Yellow);
    assert_eq!(aqi_to_bucket(101), AqiBucket::Orange);
    assert_eq!(aqi_to_bucket(150), AqiBucket::Orange);
    assert_eq!(aqi_to_bucket(151), AqiBucket::Red);
    assert_eq!(aqi_to_bucket(200), AqiBucket::Red);
    assert_eq!(aqi_to_bucket(201), AqiBucket::Purple);
    assert_eq!(aqi_to_bucket(u32::MAX), AqiBucket::Purple);
}

#[test]
fn absent_is_gray() {
    assert_eq!(Severity::of(None), Severity::Unknown);
    assert_eq!(Severity::Unknown.color(), "gray");
    assert_ne!(Severity::of(None), Severity::Known(AqiBucket::Green));
}
