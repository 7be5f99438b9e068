use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    models::{auth::AdminSession, draft::EventStatus},
    routes::{relay, ApiResult},
    services::api_client::ApiError,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    pub status: Option<String>,
}

pub async fn list_events(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(query): Query<ListEventsQuery>,
) -> ApiResult {
    let events = state
        .backend
        .list_events(query.status.as_deref().filter(|s| !s.is_empty()))
        .await
        .map_err(ApiError::into_rejection)?;
    Ok(Json(json!(events)))
}

pub async fn get_event(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> ApiResult {
    relay(state.backend.get(&format!("/api/events/{id}")).await)
}

pub async fn create_event(
    State(state): State<AppState>,
    session: AdminSession,
    Json(body): Json<Value>,
) -> ApiResult {
    let created = relay(state.backend.post("/api/events/", &body).await)?;
    let id = created.get("id").and_then(Value::as_str).unwrap_or("?");
    tracing::info!("{} created event {}", session.email, id);
    Ok(created)
}

pub async fn update_event(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult {
    relay(state.backend.put(&format!("/api/events/{id}"), &body).await)
}

pub async fn delete_event(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    state
        .backend
        .delete(&format!("/api/events/{id}"))
        .await
        .map_err(ApiError::into_rejection)?;
    tracing::info!("{} deleted event {}", session.email, id);
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: EventStatus,
}

pub async fn set_status(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    Json(body): Json<StatusChange>,
) -> ApiResult {
    tracing::info!("Event {} moves to status {}", id, body.status);
    relay(state.backend.set_status(&id, body.status).await)
}
