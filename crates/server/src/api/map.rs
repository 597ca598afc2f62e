use crate::{dto::MapDto, state::AppState};
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

pub async fn map(State(state): State<Arc<AppState>>) -> Response {
    Json(MapDto::from(state.map)).into_response()
}
