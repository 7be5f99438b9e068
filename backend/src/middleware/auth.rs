use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    Json,
};
use serde_json::{json, Value};

use crate::models::auth::AdminSession;
use crate::services::auth::AuthService;

pub const SESSION_COOKIE: &str = "session";

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let unauthorized = || (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Non authentifié" })));

        let bearer = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string);
        let token = bearer
            .or_else(|| session_cookie(parts))
            .ok_or_else(unauthorized)?;

        let secret = parts.extensions.get::<SessionSecret>().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Session secret not configured" })),
        ))?;

        AuthService::decode_token(&token, &secret.0).map_err(|e| {
            tracing::debug!("Rejected session token: {}", e);
            unauthorized()
        })
    }
}

fn session_cookie(parts: &Parts) -> Option<String> {
    let prefix = format!("{SESSION_COOKIE}=");
    parts
        .headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|part| part.trim().strip_prefix(&prefix).map(str::to_string))
}

/// Extension type to carry the session signing secret through request extensions.
#[derive(Clone)]
pub struct SessionSecret(pub String);
