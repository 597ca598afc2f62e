use pinpoint::{config::MapSettings, shared::Coordinate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDto {
    pub center: Coordinate,
    pub zoom: u8,
}

impl From<MapSettings> for MapDto {
    fn from(settings: MapSettings) -> Self {
        Self {
            center: settings.center,
            zoom: settings.zoom,
        }
    }
}
