use async_trait::async_trait;
use serde::Deserialize;

use super::{AirQualityClient, Error, endpoint, get_json};
use crate::{config::Provider, shared::Coordinate};

const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirQualityResult {
    pub city: String,
    /// US EPA index.
    pub aqi_us: u32,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    data: Option<Data>,
}

// The provider reuses `data` for the error message on failure.
#[derive(Debug, Deserialize)]
struct Data {
    city: Option<String>,
    current: Option<Current>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Current {
    pollution: Pollution,
}

#[derive(Debug, Deserialize)]
struct Pollution {
    aqius: u32,
}

impl Envelope {
    fn into_result(self) -> Result<AirQualityResult, Error> {
        if self.status != STATUS_SUCCESS {
            let message = self.data.and_then(|data| data.message).unwrap_or_default();
            return Err(Error::AirQuality(format!(
                "status {} {}",
                self.status, message
            )));
        }
        let data = self
            .data
            .ok_or_else(|| Error::AirQuality("missing data".to_string()))?;
        match (data.city, data.current) {
            (Some(city), Some(current)) => Ok(AirQualityResult {
                city,
                aqi_us: current.pollution.aqius,
            }),
            _ => Err(Error::AirQuality("incomplete data".to_string())),
        }
    }
}

/// Nearest city lookup: `GET {base}/nearest_city?lat=&lon=&key=`.
pub struct HttpAirQualityClient {
    http: reqwest::Client,
    provider: Provider,
}

impl HttpAirQualityClient {
    pub fn new(http: reqwest::Client, provider: Provider) -> Self {
        Self { http, provider }
    }
}

#[async_trait]
impl AirQualityClient for HttpAirQualityClient {
    async fn fetch_air_quality(&self, coordinate: Coordinate) -> Result<AirQualityResult, Error> {
        let url = endpoint(
            &self.provider.base_url,
            "nearest_city",
            &[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("key", self.provider.api_key.clone()),
            ],
        )?;
        let envelope: Envelope = get_json(&self.http, url).await?;
        envelope.into_result()
    }
}
