use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde_json::{json, Value};

use crate::{
    middleware::auth::SESSION_COOKIE,
    models::auth::{AdminSession, LoginRequest},
    services::auth::AuthService,
    AppState,
};

/// Build a JSON response that also sets (or clears) the session cookie.
fn json_response_with_cookie(body: &Value, cookie: String) -> Response {
    let body_str = serde_json::to_string(body).unwrap_or_default();
    let mut response = Response::new(Body::from(body_str));
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));
    if let Ok(value) = header::HeaderValue::from_str(&cookie) {
        headers.insert(header::SET_COOKIE, value);
    }
    response
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    match AuthService::login(&state.config, &body.email, &body.password) {
        Ok(login) => {
            tracing::info!("Admin {} logged in", login.user.email);
            let cookie = format!(
                "{SESSION_COOKIE}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
                login.token, login.expires_in
            );
            let body = serde_json::to_value(&login).unwrap_or_default();
            Ok(json_response_with_cookie(&body, cookie))
        }
        Err(e) => {
            tracing::warn!("Failed login for {}", body.email);
            Err((StatusCode::UNAUTHORIZED, Json(json!({ "error": e.to_string() }))))
        }
    }
}

pub async fn logout() -> Response {
    json_response_with_cookie(
        &json!({ "success": true }),
        format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0"),
    )
}

pub async fn me(session: AdminSession) -> Json<Value> {
    Json(json!({ "id": "1", "name": session.name, "email": session.email }))
}
