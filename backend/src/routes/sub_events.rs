use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::{
    models::auth::AdminSession,
    routes::{relay, ApiResult},
    services::api_client::ApiError,
    AppState,
};

pub async fn list_sub_events(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> ApiResult {
    relay(state.backend.get(&format!("/api/events/{id}/sub-events")).await)
}

pub async fn create_sub_event(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult {
    relay(state.backend.post(&format!("/api/events/{id}/sub-events"), &body).await)
}

pub async fn get_sub_event(
    State(state): State<AppState>,
    _session: AdminSession,
    Path((id, sub_event_id)): Path<(String, String)>,
) -> ApiResult {
    relay(
        state
            .backend
            .get(&format!("/api/events/{id}/sub-events/{sub_event_id}"))
            .await,
    )
}

pub async fn update_sub_event(
    State(state): State<AppState>,
    _session: AdminSession,
    Path((id, sub_event_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> ApiResult {
    relay(
        state
            .backend
            .put(&format!("/api/events/{id}/sub-events/{sub_event_id}"), &body)
            .await,
    )
}

pub async fn delete_sub_event(
    State(state): State<AppState>,
    _session: AdminSession,
    Path((id, sub_event_id)): Path<(String, String)>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    state
        .backend
        .delete(&format!("/api/events/{id}/sub-events/{sub_event_id}"))
        .await
        .map_err(ApiError::into_rejection)?;
    Ok(StatusCode::NO_CONTENT)
}
