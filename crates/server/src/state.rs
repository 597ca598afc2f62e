use crate::driver::Driver;
use pinpoint::config::MapSettings;

pub struct AppState {
    pub driver: Driver,
    pub map: MapSettings,
}
