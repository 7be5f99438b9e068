use std::str::FromStr;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    editor::{branding::BrandingEdit, DraftEdit, EditorError},
    models::{auth::AdminSession, draft::AssetSlot},
    routes::{
        bad_request,
        upload::{log_progress, UploadForm},
        ApiResult, Rejection,
    },
    services::{api_client::ApiError, editor_sessions::SessionError},
    AppState,
};

fn rejection(err: SessionError) -> Rejection {
    let message = err.to_string();
    match err {
        SessionError::NotFound(_) => (StatusCode::NOT_FOUND, Json(json!({ "error": message }))),
        SessionError::Load(e) | SessionError::Editor(EditorError::Save(e)) => e.into_rejection(),
        SessionError::Editor(EditorError::Invalid(issues)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": message, "issues": issues })),
        ),
        SessionError::Editor(EditorError::CreateInFlight) => {
            (StatusCode::CONFLICT, Json(json!({ "error": message })))
        }
    }
}

/// One edit, or `{"edits": [...]}` applied in order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EditsBody {
    Batch { edits: Vec<DraftEdit> },
    Single(DraftEdit),
}

impl EditsBody {
    fn into_edits(self) -> Vec<DraftEdit> {
        match self {
            EditsBody::Batch { edits } => edits,
            EditsBody::Single(edit) => vec![edit],
        }
    }
}

pub async fn create_editor(State(state): State<AppState>, _session: AdminSession) -> ApiResult {
    let view = state.editors.create().await;
    Ok(Json(json!(view)))
}

/// Open an event in the editor. Keys of unsaved new events are looked up
/// without touching the event API.
pub async fn open_editor(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(key): Path<String>,
) -> ApiResult {
    let view = if key.starts_with("new-") {
        state.editors.view(&key).await
    } else {
        state.editors.open(state.repository.as_ref(), &key).await
    };
    view.map(|v| Json(json!(v))).map_err(rejection)
}

pub async fn close_editor(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(key): Path<String>,
) -> Result<StatusCode, Rejection> {
    if state.editors.close(&key).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(rejection(SessionError::NotFound(key)))
    }
}

pub async fn apply_edits(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(key): Path<String>,
    Json(body): Json<EditsBody>,
) -> ApiResult {
    let edits = body.into_edits();
    state
        .editors
        .apply(&key, &edits)
        .await
        .map(|v| Json(json!(v)))
        .map_err(rejection)
}

pub async fn save_editor(
    State(state): State<AppState>,
    session: AdminSession,
    Path(key): Path<String>,
) -> ApiResult {
    let reply = state
        .editors
        .save(state.repository.as_ref(), &key)
        .await
        .map_err(rejection)?;
    tracing::info!(
        "{} saved editor {} (event {})",
        session.email,
        key,
        reply.view.event_id.as_deref().unwrap_or("?")
    );
    Ok(Json(json!(reply)))
}

pub async fn discard_editor(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(key): Path<String>,
) -> ApiResult {
    state
        .editors
        .discard(&key)
        .await
        .map(|v| Json(json!(v)))
        .map_err(rejection)
}

pub async fn validate_editor(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(key): Path<String>,
) -> ApiResult {
    let view = state.editors.view(&key).await.map_err(rejection)?;
    Ok(Json(json!({ "valid": view.issues.is_empty(), "issues": view.issues })))
}

/// Upload a file and put its URL in one of the draft's branding slots.
pub async fn upload_editor_asset(
    State(state): State<AppState>,
    _session: AdminSession,
    Path((key, slot)): Path<(String, String)>,
    multipart: Multipart,
) -> ApiResult {
    let slot = AssetSlot::from_str(&slot).map_err(|e| bad_request(e.to_string()))?;
    let view = state.editors.view(&key).await.map_err(rejection)?;

    let mut form = UploadForm::read(multipart).await?;
    form.event_id = form.event_id.or(view.event_id);
    let upload = form.into_upload(slot.folder(), slot.asset_type())?;

    let progress = log_progress(upload.file_name.clone());
    let uploaded = state
        .backend
        .upload_asset(upload, progress)
        .await
        .map_err(ApiError::into_rejection)?;

    let edit = DraftEdit::Branding(BrandingEdit::Asset { slot, url: Some(uploaded.url.clone()) });
    let view = state
        .editors
        .apply(&key, &[edit])
        .await
        .map_err(rejection)?;

    Ok(Json(json!({ "upload": uploaded, "editor": view })))
}
