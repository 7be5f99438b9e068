pub mod auth;
pub mod builds;
pub mod editor;
pub mod events;
pub mod feeds;
pub mod groups;
pub mod guests;
pub mod health;
pub mod sub_events;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use crate::{middleware::auth::SessionSecret, services::api_client::ApiError, AppState};

pub type Rejection = (StatusCode, Json<Value>);
pub type ApiResult = Result<Json<Value>, Rejection>;

/// Relay an event API reply to the caller.
pub(crate) fn relay(result: Result<Value, ApiError>) -> ApiResult {
    result.map(Json).map_err(ApiError::into_rejection)
}

pub(crate) fn bad_request(message: impl Into<String>) -> Rejection {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message.into() })))
}

/// Every CMS route. Layers that depend on the deployment (CORS, tracing)
/// are added by the binary.
pub fn router(state: AppState) -> Router {
    let session_secret = SessionSecret(state.config.session_secret.clone());

    Router::new()
        .route("/health", get(health::health_check))
        // Session
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        // Events
        .route("/api/events", get(events::list_events).post(events::create_event))
        .route(
            "/api/events/{id}",
            get(events::get_event).put(events::update_event).delete(events::delete_event),
        )
        .route("/api/events/{id}/status", put(events::set_status).patch(events::set_status))
        .route("/api/events/{id}/generate-eas", post(builds::generate_eas))
        .route("/api/events/{id}/build", get(builds::list_builds).post(builds::trigger_build))
        // Guests
        .route("/api/events/{id}/guests", get(guests::list_guests).post(guests::create_guest))
        .route("/api/events/{id}/guests/import", post(guests::import_guests))
        .route("/api/events/{id}/guests/import-csv", post(guests::import_guests_csv))
        .route("/api/events/{id}/guests/generate-codes", post(guests::generate_codes))
        .route("/api/events/{id}/guests/{guest_id}/group", put(guests::set_guest_group))
        // Invitation groups
        .route("/api/events/{id}/groups", get(groups::list_groups).post(groups::create_group))
        .route(
            "/api/events/{id}/groups/{group_id}",
            get(groups::get_group).put(groups::update_group).delete(groups::delete_group),
        )
        .route(
            "/api/events/{id}/groups/{group_id}/sub-events",
            get(groups::get_group_sub_events)
                .put(groups::set_group_sub_events)
                .post(groups::set_group_sub_events),
        )
        // Sub-events
        .route(
            "/api/events/{id}/sub-events",
            get(sub_events::list_sub_events).post(sub_events::create_sub_event),
        )
        .route(
            "/api/events/{id}/sub-events/{sub_event_id}",
            get(sub_events::get_sub_event)
                .put(sub_events::update_sub_event)
                .delete(sub_events::delete_sub_event),
        )
        // Guest-facing feeds
        .route(
            "/api/events/{id}/notifications",
            get(feeds::list_notifications).post(feeds::send_notification),
        )
        .route("/api/events/{id}/donations", get(feeds::list_donations))
        .route("/api/events/{id}/guestbook", get(feeds::list_guestbook))
        .route("/api/events/{id}/photos", get(feeds::list_photos))
        // Assets
        .route("/api/upload", post(upload::upload_asset))
        // Editor
        .route("/api/editor/new", post(editor::create_editor))
        .route("/api/editor/{key}", get(editor::open_editor).delete(editor::close_editor))
        .route("/api/editor/{key}/edits", post(editor::apply_edits))
        .route("/api/editor/{key}/save", post(editor::save_editor))
        .route("/api/editor/{key}/discard", post(editor::discard_editor))
        .route("/api/editor/{key}/validate", get(editor::validate_editor))
        .route("/api/editor/{key}/assets/{slot}", post(editor::upload_editor_asset))
        .layer(axum::Extension(session_secret))
        // Videos go up to 100 MB
        .layer(DefaultBodyLimit::max(100 * 1024 * 1024))
        .with_state(state)
}
