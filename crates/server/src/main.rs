mod api;
mod driver;
mod dto;
mod state;

use crate::{
    driver::{Driver, ServerMap},
    state::AppState,
};
use axum::routing::get;
use pinpoint::{clients::Clients, config::Config, selection::Orchestrator};
use std::sync::Arc;
use tracing::{error, info};

const PORT: u16 = 3000;
const PORT_VAR: &str = "PINPOINT_PORT";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    info!("Starting server...");
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {err}");
            std::process::exit(1);
        }
    };
    let clients = match Clients::from_config(&config) {
        Ok(clients) => clients,
        Err(err) => {
            error!("Failed to build provider clients: {err}");
            std::process::exit(1);
        }
    };
    info!("Routing from origin {}", config.origin);

    let orchestrator = Orchestrator::new(clients, config.origin).with_map(ServerMap::default());
    let state = Arc::new(AppState {
        driver: Driver::spawn(orchestrator),
        map: config.map,
    });

    let app = axum::Router::new()
        .route("/select", get(api::select))
        .route("/close", get(api::close))
        .route("/state", get(api::state))
        .route("/map", get(api::map))
        .with_state(state);

    let port = std::env::var(PORT_VAR)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(PORT);
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind port {port}: {err}");
            std::process::exit(1);
        }
    };
    info!("Listening to port {port}");
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server stopped: {err}");
    }
}
