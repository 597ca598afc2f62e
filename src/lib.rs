pub mod clients;
pub mod config;
pub mod display;
pub mod selection;
pub mod shared;

pub mod prelude {
    pub use crate::clients::{
        AirQualityClient, AirQualityResult, Clients, RenderablePath, RouteResult, RoutingClient,
        TimeZoneClient, TravelMode,
    };
    pub use crate::config::Config;
    pub use crate::display::{AqiBucket, Severity, View, aqi_to_bucket};
    pub use crate::selection::{Generation, Kind, MapView, Merge, Orchestrator, SelectionState};
    pub use crate::shared::{Click, Coordinate, Duration, Timestamp};
}
