use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use crate::admin::AdminState;
use crate::pool::{PoolError, PoolStatus, WorkerId};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub pools: usize,
    pub connected_pools: usize,
}

#[derive(Serialize)]
pub struct SelectResponse {
    pub pool: String,
    pub worker: WorkerId,
}

#[derive(Serialize)]
pub struct ConnectResponse {
    pub pool: String,
    pub connected: bool,
}

/// Pool errors rendered as JSON with a matching status code.
pub struct ApiError(pub PoolError);

impl From<PoolError> for ApiError {
    fn from(e: PoolError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PoolError::UnknownPool(_) => StatusCode::NOT_FOUND,
            PoolError::AlreadyRegistered(_) => StatusCode::CONFLICT,
            PoolError::Disconnected | PoolError::NotConnected | PoolError::Stopped => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    let statuses = state.registry.statuses().await;
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        pools: statuses.len(),
        connected_pools: statuses.iter().filter(|s| s.connected).count(),
    })
}

pub async fn get_pools(State(state): State<AdminState>) -> Json<Vec<PoolStatus>> {
    Json(state.registry.statuses().await)
}

pub async fn get_pool(
    State(state): State<AdminState>,
    Path(name): Path<String>,
) -> Result<Json<PoolStatus>, ApiError> {
    Ok(Json(state.registry.status(&name).await?))
}

pub async fn select_worker(
    State(state): State<AdminState>,
    Path(name): Path<String>,
) -> Result<Json<SelectResponse>, ApiError> {
    let worker = state.registry.select(&name).await?;
    Ok(Json(SelectResponse { pool: name, worker }))
}

pub async fn connect_pool(
    State(state): State<AdminState>,
    Path(name): Path<String>,
) -> Result<Json<ConnectResponse>, ApiError> {
    state.registry.connect(&name).await?;
    Ok(Json(ConnectResponse { pool: name, connected: true }))
}
