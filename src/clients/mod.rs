//! Stateless request/response clients for the three providers queried on
//! every selection. Each provider sits behind a trait so the orchestrator can
//! be driven by mocks in tests.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::{sync::Arc, time};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub mod air_quality;
pub mod routing;
pub mod time_zone;

pub use air_quality::*;
pub use routing::*;
pub use time_zone::*;

use crate::{
    config::Config,
    shared::{Coordinate, Timestamp},
};

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum Error {
    #[error("Directions request failed due to {status}")]
    Routing { status: String },
    #[error("Failed to fetch air quality data: {0}")]
    AirQuality(String),
    #[error("Failed to fetch time zone data: {0}")]
    TimeZone(String),
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Invalid provider url: {0}")]
    Url(#[from] url::ParseError),
    #[error("Client task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait RoutingClient: Send + Sync {
    async fn compute_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<RouteResult, self::Error>;
}

#[async_trait]
pub trait AirQualityClient: Send + Sync {
    async fn fetch_air_quality(&self, coordinate: Coordinate)
    -> Result<AirQualityResult, self::Error>;
}

#[async_trait]
pub trait TimeZoneClient: Send + Sync {
    async fn fetch_time_zone(
        &self,
        coordinate: Coordinate,
        at: Timestamp,
    ) -> Result<String, self::Error>;
}

/// The three providers a selection fans out to.
#[derive(Clone)]
pub struct Clients {
    pub routing: Arc<dyn RoutingClient>,
    pub air_quality: Arc<dyn AirQualityClient>,
    pub time_zone: Arc<dyn TimeZoneClient>,
}

impl Clients {
    pub fn new(
        routing: impl RoutingClient + 'static,
        air_quality: impl AirQualityClient + 'static,
        time_zone: impl TimeZoneClient + 'static,
    ) -> Self {
        Self {
            routing: Arc::new(routing),
            air_quality: Arc::new(air_quality),
            time_zone: Arc::new(time_zone),
        }
    }

    /// HTTP clients for every provider named in `config`, sharing one connection pool.
    pub fn from_config(config: &Config) -> Result<Self, self::Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::new(
            HttpRoutingClient::new(http.clone(), config.routing.clone()),
            HttpAirQualityClient::new(http.clone(), config.air_quality.clone()),
            HttpTimeZoneClient::new(http, config.time_zone.clone()),
        ))
    }
}

pub(crate) fn endpoint(
    base_url: &str,
    path: &str,
    params: &[(&str, String)],
) -> Result<Url, self::Error> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), path);
    Ok(Url::parse_with_params(&url, params)?)
}

/// Non 2xx responses and undecodable bodies both surface as transport errors.
pub(crate) async fn get_json<T>(http: &reqwest::Client, url: Url) -> Result<T, self::Error>
where
    T: DeserializeOwned,
{
    debug!("GET {}", url.path());
    let response = http.get(url).send().await?.error_for_status()?;
    Ok(response.json::<T>().await?)
}
