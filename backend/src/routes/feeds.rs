use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    models::auth::AdminSession,
    routes::{relay, ApiResult},
    services::api_client::ApiError,
    AppState,
};

/// Lists shown in the dashboard. A reply that is not a list or an object
/// (empty or unparseable body) shows as an empty list.
async fn feed(state: &AppState, path: &str, query: &HashMap<String, String>) -> ApiResult {
    let query: Vec<(&str, &str)> = query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    let value = state
        .backend
        .get_with_query(path, &query)
        .await
        .map_err(ApiError::into_rejection)?;

    let empty = match &value {
        Value::Array(_) => false,
        Value::Object(map) => map.is_empty(),
        _ => true,
    };
    if empty {
        tracing::debug!("Empty feed reply from {}", path);
        return Ok(Json(json!([])));
    }
    Ok(Json(value))
}

pub async fn list_notifications(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult {
    feed(&state, &format!("/api/events/{id}/notifications"), &query).await
}

pub async fn send_notification(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult {
    tracing::info!("{} sends a notification to event {}", session.email, id);
    relay(state.backend.post(&format!("/api/events/{id}/notifications"), &body).await)
}

pub async fn list_donations(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult {
    feed(&state, &format!("/api/events/{id}/donations"), &query).await
}

pub async fn list_guestbook(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult {
    feed(&state, &format!("/api/events/{id}/guestbook"), &query).await
}

pub async fn list_photos(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult {
    feed(&state, &format!("/api/events/{id}/photos"), &query).await
}
