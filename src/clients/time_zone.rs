use async_trait::async_trait;
use serde::Deserialize;

use super::{Error, TimeZoneClient, endpoint, get_json};
use crate::{
    config::Provider,
    shared::{Coordinate, Timestamp},
};

const STATUS_OK: &str = "OK";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeZoneResponse {
    status: String,
    time_zone_id: Option<String>,
    error_message: Option<String>,
}

impl TimeZoneResponse {
    fn into_result(self) -> Result<String, Error> {
        if self.status != STATUS_OK {
            return Err(Error::TimeZone(match self.error_message {
                Some(message) => format!("status {} {}", self.status, message),
                None => format!("status {}", self.status),
            }));
        }
        self.time_zone_id
            .ok_or_else(|| Error::TimeZone("missing timeZoneId".to_string()))
    }
}

/// IANA zone lookup: `GET {base}/timezone/json?location=&timestamp=&key=`.
pub struct HttpTimeZoneClient {
    http: reqwest::Client,
    provider: Provider,
}

impl HttpTimeZoneClient {
    pub fn new(http: reqwest::Client, provider: Provider) -> Self {
        Self { http, provider }
    }
}

#[async_trait]
impl TimeZoneClient for HttpTimeZoneClient {
    async fn fetch_time_zone(&self, coordinate: Coordinate, at: Timestamp) -> Result<String, Error> {
        let url = endpoint(
            &self.provider.base_url,
            "timezone/json",
            &[
                ("location", coordinate.to_query_string()),
                ("timestamp", at.as_seconds().to_string()),
                ("key", self.provider.api_key.clone()),
            ],
        )?;
        let response: TimeZoneResponse = get_json(&self.http, url).await?;
        response.into_result()
    }
}

#[test]
fn ok_without_zone_id() {
    let response = TimeZoneResponse {
        status: "OK".to_string(),
        time_zone_id: None,
        error_message: None,
    };
    assert!(matches!(response.into_result(), Err(Error::TimeZone(_))));
}
