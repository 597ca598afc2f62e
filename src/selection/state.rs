use std::{collections::BTreeSet, fmt::Display};

use crate::{
    clients::{self, AirQualityResult, RouteResult},
    shared::Coordinate,
};

/// Identity of one selection. Every in-flight request carries the generation
/// it was dispatched for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Route,
    AirQuality,
    TimeZone,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Route, Kind::AirQuality, Kind::TimeZone];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Kind::Route => "route",
            Kind::AirQuality => "air_quality",
            Kind::TimeZone => "time_zone",
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum Outcome {
    Route(Result<RouteResult, clients::Error>),
    AirQuality(Result<AirQualityResult, clients::Error>),
    TimeZone(Result<String, clients::Error>),
}

impl Outcome {
    pub const fn kind(&self) -> Kind {
        match self {
            Outcome::Route(_) => Kind::Route,
            Outcome::AirQuality(_) => Kind::AirQuality,
            Outcome::TimeZone(_) => Kind::TimeZone,
        }
    }
}

/// A client call that finished, tagged with the selection it was made for.
#[derive(Debug)]
pub struct Resolution {
    pub generation: Generation,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: Kind,
    pub cause: String,
}

/// What applying a resolution did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merge {
    Merged(Kind),
    Failed(Kind),
    /// Superseded selection or duplicate delivery, state untouched.
    Stale(Kind),
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    generation: Generation,
    selected: Option<Coordinate>,
    route: Option<RouteResult>,
    air_quality: Option<AirQualityResult>,
    time_zone: Option<String>,
    popup_open: bool,
    pending: BTreeSet<Kind>,
    failures: Vec<Failure>,
    alert: Option<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Default::default()
    }

    /// Starts a new selection. All derived fields are cleared before the
    /// returned generation can be used to merge anything.
    pub fn select(&mut self, coordinate: Coordinate) -> Generation {
        self.generation = self.generation.next();
        self.selected = Some(coordinate);
        self.route = None;
        self.air_quality = None;
        self.time_zone = None;
        self.failures.clear();
        self.alert = None;
        self.popup_open = true;
        self.pending = Kind::ALL.into_iter().collect();
        self.generation
    }

    pub fn close_popup(&mut self) {
        self.popup_open = false;
    }

    pub fn apply(&mut self, resolution: Resolution) -> Merge {
        let kind = resolution.outcome.kind();
        if resolution.generation != self.generation || !self.pending.remove(&kind) {
            return Merge::Stale(kind);
        }

        match resolution.outcome {
            Outcome::Route(Ok(route)) => self.route = Some(route),
            Outcome::AirQuality(Ok(air_quality)) => self.air_quality = Some(air_quality),
            Outcome::TimeZone(Ok(time_zone)) => self.time_zone = Some(time_zone),
            Outcome::Route(Err(err)) => {
                let alert = match err {
                    clients::Error::Routing { .. } => err.to_string(),
                    other => format!("Directions request failed due to {other}"),
                };
                self.record(kind, alert.clone());
                self.alert = Some(alert);
                return Merge::Failed(kind);
            }
            Outcome::AirQuality(Err(err)) | Outcome::TimeZone(Err(err)) => {
                self.record(kind, err.to_string());
                return Merge::Failed(kind);
            }
        }
        Merge::Merged(kind)
    }

    fn record(&mut self, kind: Kind, cause: String) {
        self.failures.push(Failure { kind, cause });
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn selected(&self) -> Option<Coordinate> {
        self.selected
    }

    pub fn route(&self) -> Option<&RouteResult> {
        self.route.as_ref()
    }

    pub fn air_quality(&self) -> Option<&AirQualityResult> {
        self.air_quality.as_ref()
    }

    pub fn time_zone(&self) -> Option<&str> {
        self.time_zone.as_deref()
    }

    pub fn popup_open(&self) -> bool {
        self.popup_open
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn pending(&self) -> Vec<Kind> {
        self.pending.iter().copied().collect()
    }

    pub fn is_pending(&self, kind: Kind) -> bool {
        self.pending.contains(&kind)
    }

    /// True while idle or once every client of the active selection has answered.
    pub fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }
}
