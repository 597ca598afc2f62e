use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Display;

use super::{Error, RoutingClient, endpoint, get_json};
use crate::{
    config::Provider,
    shared::{Coordinate, Duration},
};

const STATUS_OK: &str = "OK";
const STATUS_NO_ROUTES: &str = "NO_ROUTES";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TravelMode {
    #[default]
    Driving,
}

impl TravelMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "DRIVING",
        }
    }
}

impl Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider specific encoding of the route geometry. Only the map widget reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderablePath(pub String);

#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    /// Raw seconds, rounding happens at display time.
    pub total_duration: Duration,
    pub path: RenderablePath,
}

impl RouteResult {
    /// Sums the durations of every leg, whatever their count.
    pub fn from_legs<I>(legs: I, path: RenderablePath) -> Self
    where
        I: IntoIterator<Item = Duration>,
    {
        Self {
            total_duration: legs.into_iter().sum(),
            path,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
    overview_polyline: Option<Polyline>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    duration: DirectionsValue,
}

#[derive(Debug, Deserialize)]
struct DirectionsValue {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct Polyline {
    points: String,
}

impl DirectionsResponse {
    fn into_result(self) -> Result<RouteResult, Error> {
        if self.status != STATUS_OK {
            return Err(Error::Routing {
                status: self.status,
            });
        }
        let route = self.routes.into_iter().next().ok_or(Error::Routing {
            status: STATUS_NO_ROUTES.to_string(),
        })?;
        let path = route
            .overview_polyline
            .map(|polyline| RenderablePath(polyline.points))
            .unwrap_or_default();
        Ok(RouteResult::from_legs(
            route
                .legs
                .iter()
                .map(|leg| Duration::from_seconds(leg.duration.value)),
            path,
        ))
    }
}

/// Directions over HTTP: `GET {base}/directions/json`.
pub struct HttpRoutingClient {
    http: reqwest::Client,
    provider: Provider,
}

impl HttpRoutingClient {
    pub fn new(http: reqwest::Client, provider: Provider) -> Self {
        Self { http, provider }
    }
}

#[async_trait]
impl RoutingClient for HttpRoutingClient {
    async fn compute_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<RouteResult, Error> {
        let url = endpoint(
            &self.provider.base_url,
            "directions/json",
            &[
                ("origin", origin.to_query_string()),
                ("destination", destination.to_query_string()),
                ("mode", mode.as_str().to_lowercase()),
                ("key", self.provider.api_key.clone()),
            ],
        )?;
        let response: DirectionsResponse = get_json(&self.http, url).await?;
        response.into_result()
    }
}
