use crate::{
    driver::{Command, Snapshot},
    dto::SelectionDto,
    state::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pinpoint::shared::Click;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::oneshot;
use tracing::error;

pub async fn select(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let latitude = parse_param(&params, "lat")?;
    let longitude = parse_param(&params, "lng")?;
    let click = Click::from((latitude, longitude));

    let (reply, receiver) = oneshot::channel();
    if !state.driver.send(Command::Select { click, reply }).await {
        error!("Driver is not running");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    let snapshot = receiver
        .await
        .map_err(|err| {
            error!("Driver dropped the reply: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|err| {
            error!("Rejected selection: {err}");
            StatusCode::UNPROCESSABLE_ENTITY
        })?;
    Ok(Json(SelectionDto::from(snapshot)).into_response())
}

pub async fn close(State(state): State<Arc<AppState>>) -> Result<Response, StatusCode> {
    let snapshot = request(&state, |reply| Command::Close { reply }).await?;
    Ok(Json(SelectionDto::from(snapshot)).into_response())
}

pub async fn state(State(state): State<Arc<AppState>>) -> Result<Response, StatusCode> {
    let snapshot = request(&state, |reply| Command::Snapshot { reply }).await?;
    Ok(Json(SelectionDto::from(snapshot)).into_response())
}

async fn request<F>(state: &AppState, command: F) -> Result<Snapshot, StatusCode>
where
    F: FnOnce(oneshot::Sender<Snapshot>) -> Command,
{
    let (reply, receiver) = oneshot::channel();
    if !state.driver.send(command(reply)).await {
        error!("Driver is not running");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    receiver.await.map_err(|err| {
        error!("Driver dropped the reply: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

fn parse_param(params: &HashMap<String, String>, name: &str) -> Result<f64, StatusCode> {
    params
        .get(name)
        .ok_or(StatusCode::BAD_REQUEST)?
        .parse()
        .map_err(|_| StatusCode::BAD_REQUEST)
}
