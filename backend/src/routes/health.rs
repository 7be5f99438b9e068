use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "backend": if state.config.use_fixtures { "fixtures" } else { state.config.api_url.as_str() },
        "eas_configured": state.builds.is_configured(),
    }))
}
