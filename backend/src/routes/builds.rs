use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    models::{auth::AdminSession, build::BuildRequest, event::EventRecord},
    routes::{bad_request, ApiResult},
    services::eas::{eas_profile, BuildEvent},
    AppState,
};

pub async fn list_builds(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(_id): Path<String>,
) -> Json<Value> {
    Json(json!(state.builds.list_builds().await))
}

/// Queue app builds for an event. The body (`{platform, profile}`) is
/// optional and defaults to a production build for both platforms.
pub async fn trigger_build(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult {
    let request: BuildRequest = if body.is_empty() {
        BuildRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| bad_request(e.to_string()))?
    };

    let event = match state.backend.get_event(&id).await {
        Ok(record) => BuildEvent::from_record(record),
        Err(e) => {
            tracing::info!("Event {} unavailable ({}), building with fallback identity", id, e);
            BuildEvent::fallback(&id)
        }
    };

    tracing::info!(
        "{} requested a {} build of event {}",
        session.email,
        request.platform.as_str(),
        id
    );
    Ok(Json(state.builds.trigger(&event, &request).await))
}

pub async fn generate_eas(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> ApiResult {
    if state.config.api_key.is_empty() {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "API_KEY not configured" })),
        ));
    }

    let value = state
        .backend
        .get(&format!("/api/admin/events/{id}"))
        .await
        .map_err(|e| (e.status_code(), Json(json!({ "error": "Failed to fetch event" }))))?;
    let record: EventRecord = serde_json::from_value(value).map_err(|e| {
        tracing::error!("Event {} has an unexpected shape: {}", id, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error" })),
        )
    })?;

    Ok(Json(json!(eas_profile(&record, &state.config.api_url))))
}
