use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    Clock, InviteError, InviteRegistry, PhaseDurationConfig, ProjectInvite, ScheduleError,
    ScheduleResult, ServiceConfig, SystemClock, generate_auto_schedule,
};

#[derive(Clone)]
pub struct AppState {
    durations: PhaseDurationConfig,
    invites: Arc<InviteRegistry<Arc<dyn Clock>>>,
}

impl AppState {
    pub fn new(config: &ServiceConfig) -> Result<Self, InviteError> {
        Self::with_clock(
            config.durations,
            config.invite_ttl,
            config.invite_capacity,
            Arc::new(SystemClock),
        )
    }

    pub fn with_clock(
        durations: PhaseDurationConfig,
        invite_ttl: Duration,
        invite_capacity: usize,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, InviteError> {
        Ok(Self {
            durations,
            invites: Arc::new(InviteRegistry::new(invite_ttl, invite_capacity, clock)?),
        })
    }

    fn invites(&self) -> Arc<InviteRegistry<Arc<dyn Clock>>> {
        self.invites.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    Schedule(ScheduleError),
    NotFound(String),
    Invalid(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        ApiError::Schedule(value)
    }
}

impl From<InviteError> for ApiError {
    fn from(value: InviteError) -> Self {
        match value {
            InviteError::NotFound => ApiError::NotFound(value.to_string()),
            other => ApiError::Invalid(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::Invalid(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::Schedule(err) => (StatusCode::BAD_REQUEST, err.code(), err.to_string()),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviewPayload {
    anchor_date: String,
    #[serde(default)]
    durations: Option<PhaseDurationConfig>,
}

#[derive(Debug, Deserialize)]
struct TotalPayload {
    #[serde(default)]
    durations: Option<PhaseDurationConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvitePayload {
    project_id: String,
    email: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schedule/defaults", get(schedule_defaults))
        .route("/schedule/preview", post(preview_schedule))
        .route("/schedule/total", post(total_duration))
        .route("/invites", post(issue_invite))
        .route("/invites/:token", get(get_invite).delete(revoke_invite))
        .route("/invites/:token/accept", post(accept_invite))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "schedule HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn schedule_defaults(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let total = state.durations.total_days()?;
    Ok(Json(json!({
        "durations": state.durations,
        "total": total,
    })))
}

async fn preview_schedule(
    State(state): State<AppState>,
    payload: Result<Json<PreviewPayload>, JsonRejection>,
) -> Result<Json<ScheduleResult>, ApiError> {
    let Json(payload) = payload?;
    let durations = payload.durations.unwrap_or(state.durations);
    let schedule = generate_auto_schedule(&payload.anchor_date, Some(&durations))?;
    Ok(Json(schedule))
}

async fn total_duration(
    State(state): State<AppState>,
    payload: Result<Json<TotalPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let durations = payload.durations.unwrap_or(state.durations);
    let total = durations.total_days()?;
    Ok(Json(json!({ "total": total })))
}

async fn issue_invite(
    State(state): State<AppState>,
    payload: Result<Json<InvitePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ProjectInvite>), ApiError> {
    let Json(payload) = payload?;
    let invite = state.invites().issue(&payload.project_id, &payload.email)?;
    Ok((StatusCode::CREATED, Json(invite)))
}

async fn get_invite(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<ProjectInvite>, ApiError> {
    state
        .invites()
        .lookup(&token)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("invite {token} not found")))
}

async fn accept_invite(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<ProjectInvite>, ApiError> {
    let invite = state.invites().accept(&token)?;
    Ok(Json(invite))
}

async fn revoke_invite(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.invites().revoke(&token) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("invite {token} not found")))
    }
}
