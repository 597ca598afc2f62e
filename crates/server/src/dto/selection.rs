use crate::driver::Snapshot;
use pinpoint::display::View;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirQualityDto {
    pub city: String,
    pub aqi: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionDto {
    pub popup_open: bool,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub air_quality: Option<AirQualityDto>,
    pub color: String,
    pub travel_time: Option<String>,
    pub travel_label: Option<String>,
    pub time_zone: Option<String>,
    pub alert: Option<String>,
    pub pending: Vec<String>,
    pub overlay: Option<String>,
}

impl From<Snapshot> for SelectionDto {
    fn from(snapshot: Snapshot) -> Self {
        let travel_label = snapshot.view.travel_label();
        let View {
            popup_open,
            latitude,
            longitude,
            air_quality,
            severity,
            travel_time,
            time_zone,
            alert,
            pending,
        } = snapshot.view;
        Self {
            popup_open,
            latitude,
            longitude,
            air_quality: air_quality.map(|value| AirQualityDto {
                city: value.city,
                aqi: value.aqi,
            }),
            color: severity.color().to_string(),
            travel_time,
            travel_label,
            time_zone,
            alert,
            pending: pending.iter().map(|kind| kind.to_string()).collect(),
            overlay: snapshot.overlay.map(|path| path.0),
        }
    }
}
