use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    models::{auth::AdminSession, guest::ImportGuestsRequest},
    routes::{bad_request, relay, ApiResult},
    services::guest_import::{import_guests as run_import, parse_csv},
    AppState,
};

pub async fn list_guests(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> ApiResult {
    relay(state.backend.get(&format!("/api/events/{id}/guests")).await)
}

pub async fn create_guest(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult {
    relay(state.backend.post(&format!("/api/events/{id}/guests"), &body).await)
}

pub async fn set_guest_group(
    State(state): State<AppState>,
    _session: AdminSession,
    Path((id, guest_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> ApiResult {
    relay(
        state
            .backend
            .put(&format!("/api/events/{id}/guests/{guest_id}/group"), &body)
            .await,
    )
}

pub async fn generate_codes(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> ApiResult {
    relay(
        state
            .backend
            .post_empty(&format!("/api/events/{id}/guests/generate-codes"))
            .await,
    )
}

/// `{"guests": [...]}` as produced by the CMS after parsing a file itself.
pub async fn import_guests(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    body: Result<Json<ImportGuestsRequest>, axum::extract::rejection::JsonRejection>,
) -> ApiResult {
    let Json(body) = body.map_err(|_| bad_request("Invalid guests data"))?;
    let report = run_import(&state.backend, &id, &body.guests).await;
    Ok(Json(json!(report)))
}

/// Raw CSV upload in the `file` field of a multipart form.
pub async fn import_guests_csv(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult {
    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(e.to_string()))?
    {
        if field.name() == Some("file") {
            data = Some(field.bytes().await.map_err(|e| bad_request(e.to_string()))?);
        }
    }
    let data = data.ok_or_else(|| bad_request("Champ « file » manquant"))?;

    let parsed = parse_csv(&data).map_err(|e| {
        (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": e.to_string() })))
    })?;
    let mut report = run_import(&state.backend, &id, &parsed.guests).await;
    let mut errors = parsed.errors;
    errors.append(&mut report.errors);
    report.errors = errors;
    Ok(Json(json!(report)))
}
