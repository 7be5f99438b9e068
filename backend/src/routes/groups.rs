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

pub async fn list_groups(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> ApiResult {
    relay(state.backend.get(&format!("/api/events/{id}/groups")).await)
}

pub async fn create_group(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult {
    relay(state.backend.post(&format!("/api/events/{id}/groups"), &body).await)
}

pub async fn get_group(
    State(state): State<AppState>,
    _session: AdminSession,
    Path((id, group_id)): Path<(String, String)>,
) -> ApiResult {
    relay(state.backend.get(&format!("/api/events/{id}/groups/{group_id}")).await)
}

pub async fn update_group(
    State(state): State<AppState>,
    _session: AdminSession,
    Path((id, group_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> ApiResult {
    relay(
        state
            .backend
            .put(&format!("/api/events/{id}/groups/{group_id}"), &body)
            .await,
    )
}

pub async fn delete_group(
    State(state): State<AppState>,
    _session: AdminSession,
    Path((id, group_id)): Path<(String, String)>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    state
        .backend
        .delete(&format!("/api/events/{id}/groups/{group_id}"))
        .await
        .map_err(ApiError::into_rejection)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_group_sub_events(
    State(state): State<AppState>,
    _session: AdminSession,
    Path((id, group_id)): Path<(String, String)>,
) -> ApiResult {
    relay(
        state
            .backend
            .get(&format!("/api/events/{id}/groups/{group_id}/sub-events"))
            .await,
    )
}

/// Replace the sub-events a group is invited to. The event API takes this
/// as a POST.
pub async fn set_group_sub_events(
    State(state): State<AppState>,
    _session: AdminSession,
    Path((id, group_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> ApiResult {
    relay(
        state
            .backend
            .post(&format!("/api/events/{id}/groups/{group_id}/sub-events"), &body)
            .await,
    )
}
