//! Router-level tests: session handling, the editor surface over the
//! fixture repository, and the event API proxy against a mock backend.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use httpmock::prelude::*;
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot

use oninvite_cms::{
    config::Config,
    routes,
    services::{api_client::BackendClient, auth::AuthService, fixtures::FixtureRepository},
    AppState,
};

const SECRET: &str = "test-secret";

fn config(api_url: &str) -> Config {
    Config {
        api_url: api_url.into(),
        api_key: "backend-key".into(),
        admin_email: "admin@oninvite.fr".into(),
        admin_password: "Oninvite2026!".into(),
        admin_name: "Admin Oninvite".into(),
        session_secret: SECRET.into(),
        session_max_age_seconds: 86400,
        host: "127.0.0.1".into(),
        port: 0,
        expo_token: None,
        eas_project_id: None,
        expo_account: "oninvite".into(),
        expo_api_url: "http://127.0.0.1:1".into(),
        cms_base_url: None,
        use_fixtures: true,
        editor_idle_timeout_seconds: 7200,
    }
}

/// App whose editors run on fixtures and whose proxy points at `api_url`.
fn app_with(api_url: &str) -> (Router, Arc<FixtureRepository>) {
    let config = config(api_url);
    let backend = Arc::new(BackendClient::new(&config.api_url, &config.api_key));
    let fixtures = Arc::new(FixtureRepository::with_demo_event());
    let state = AppState::with_repository(config, backend, fixtures.clone());
    (routes::router(state), fixtures)
}

fn token() -> String {
    AuthService::issue_token("admin@oninvite.fr", "Admin Oninvite", SECRET, 3600).unwrap()
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token()));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn health_needs_no_session() {
    let (app, _) = app_with("http://127.0.0.1:1");
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["backend"], "fixtures");
}

#[tokio::test]
async fn protected_routes_reject_missing_or_bad_tokens() {
    let (app, _) = app_with("http://127.0.0.1:1");

    let req = Request::builder().uri("/api/events").body(Body::empty()).unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Non authentifié");

    let req = Request::builder()
        .uri("/api/editor/1")
        .header(header::AUTHORIZATION, "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_sets_session_cookie() {
    let (app, _) = app_with("http://127.0.0.1:1");

    let bad = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "email": "admin@oninvite.fr", "password": "nope" }).to_string()))
        .unwrap();
    let (status, _) = send(&app, bad).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let good = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": "admin@oninvite.fr", "password": "Oninvite2026!" }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(good).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("session="));

    let me = Request::builder()
        .uri("/api/auth/me")
        .header(header::COOKIE, format!("theme=dark; {cookie}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, me).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "admin@oninvite.fr");
}

#[tokio::test]
async fn editor_edit_save_discard() {
    let (app, fixtures) = app_with("http://127.0.0.1:1");

    let (status, view) = send(&app, request("GET", "/api/editor/1", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["dirty"], false);
    assert_eq!(view["draft"]["event"]["title"], "Sarah & David");

    let edits = json!({ "edits": [
        { "tab": "modules", "edit": { "toggle": { "module": "chat" } } },
        { "tab": "general", "edit": { "title": "Sarah & David Cohen" } }
    ] });
    let (status, view) = send(&app, request("POST", "/api/editor/1/edits", Some(edits))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["dirty"], true);
    assert_eq!(view["draft"]["modules"]["chat"]["enabled"], true);
    assert_eq!(view["changed_sections"], json!(["event", "modules"]));

    let (status, reply) = send(&app, request("POST", "/api/editor/1/save", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["applied"], true);
    assert_eq!(reply["dirty"], false);
    assert_eq!(fixtures.get("1").unwrap().title(), "Sarah & David Cohen");

    let single = json!({ "tab": "contacts", "edit": { "emergency_name": "Rachel" } });
    send(&app, request("POST", "/api/editor/1/edits", Some(single))).await;
    let (_, view) = send(&app, request("POST", "/api/editor/1/discard", None)).await;
    assert_eq!(view["dirty"], false);
    assert_eq!(view["draft"]["contacts"]["emergency"]["name"], "Rachel (témoin)");
}

#[tokio::test]
async fn failed_save_keeps_editor_dirty() {
    let (app, fixtures) = app_with("http://127.0.0.1:1");
    send(&app, request("GET", "/api/editor/1", None)).await;
    let edit = json!({ "tab": "settings", "edit": { "maintenance_mode": true } });
    send(&app, request("POST", "/api/editor/1/edits", Some(edit))).await;

    fixtures.fail_writes(true);
    let (status, body) = send(&app, request("POST", "/api/editor/1/save", None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["detail"], "Service indisponible");

    let (_, view) = send(&app, request("GET", "/api/editor/1", None)).await;
    assert_eq!(view["dirty"], true);
    assert_eq!(view["draft"]["settings"]["maintenance_mode"], true);
}

#[tokio::test]
async fn new_event_must_validate_before_create() {
    let (app, fixtures) = app_with("http://127.0.0.1:1");

    let (status, view) = send(&app, request("POST", "/api/editor/new", None)).await;
    assert_eq!(status, StatusCode::OK);
    let key = view["key"].as_str().unwrap().to_string();

    let (status, body) = send(&app, request("GET", &format!("/api/editor/{key}/validate"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);

    let (status, body) = send(&app, request("POST", &format!("/api/editor/{key}/save"), None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["issues"][0]["field"], "event.title");

    let edits = json!({ "edits": [
        { "tab": "general", "edit": { "title": "Nathan" } },
        { "tab": "general", "edit": { "date": "2026-09-01T10:00" } }
    ] });
    send(&app, request("POST", &format!("/api/editor/{key}/edits"), Some(edits))).await;
    let (status, reply) = send(&app, request("POST", &format!("/api/editor/{key}/save"), None)).await;
    assert_eq!(status, StatusCode::OK);
    let id = reply["event_id"].as_str().unwrap();
    assert_eq!(reply["key"], id);
    assert_eq!(fixtures.get(id).unwrap().title(), "Nathan");

    let (status, _) = send(&app, request("DELETE", &format!("/api/editor/{id}"), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn proxy_forwards_api_key_and_backend_errors() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/events/")
                .query_param("status", "draft")
                .header("X-API-Key", "backend-key");
            then.status(200).json_body(json!([{ "id": "1", "title": "Sarah & David" }]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/events/404");
            then.status(404).json_body(json!({ "detail": "Événement non trouvé" }));
        })
        .await;

    let (app, _) = app_with(&server.base_url());

    let (status, body) = send(&app, request("GET", "/api/events?status=draft", None)).await;
    list.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["title"], "Sarah & David");

    let (status, body) = send(&app, request("GET", "/api/events/404", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Événement non trouvé" }));
}

#[tokio::test]
async fn status_change_is_a_patch() {
    let server = MockServer::start_async().await;
    let patch = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/api/events/1/status")
                .json_body(json!({ "status": "live" }));
            then.status(200).json_body(json!({ "id": "1", "status": "live" }));
        })
        .await;

    let (app, _) = app_with(&server.base_url());
    let (status, _) = send(
        &app,
        request("PUT", "/api/events/1/status", Some(json!({ "status": "live" }))),
    )
    .await;
    patch.assert_async().await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn create_event_relays_backend_reply() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/events/")
                .header("X-API-Key", "backend-key")
                .json_body_includes(r#"{ "title": "Léa & Tom" }"#);
            then.status(201).json_body(json!({ "id": "evt_42", "title": "Léa & Tom" }));
        })
        .await;

    let (app, _) = app_with(&server.base_url());
    let (status, body) = send(
        &app,
        request("POST", "/api/events", Some(json!({ "title": "Léa & Tom", "type": "wedding" }))),
    )
    .await;
    create.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "evt_42");
}

#[tokio::test]
async fn empty_feed_replies_become_lists() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/events/1/guestbook");
            then.status(200).body("");
        })
        .await;

    let (app, _) = app_with(&server.base_url());
    let (status, body) = send(&app, request("GET", "/api/events/1/guestbook", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn build_without_expo_is_simulated_with_fallback_event() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/events/9f8e7d6c-1234");
            then.status(500).body("boom");
        })
        .await;

    let (app, _) = app_with(&server.base_url());
    let (status, body) = send(&app, request("POST", "/api/events/9f8e7d6c-1234/build", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["simulated"], true);
    assert_eq!(body["config"]["expo"]["slug"], "event-9f8e7d6c");

    let (_, list) = send(&app, request("GET", "/api/events/9f8e7d6c-1234/build", None)).await;
    assert_eq!(list["configured"], false);
}

#[tokio::test]
async fn guest_import_rejects_malformed_body() {
    let (app, _) = app_with("http://127.0.0.1:1");
    let (status, body) = send(
        &app,
        request("POST", "/api/events/1/guests/import", Some(json!({ "guests": "nope" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid guests data");
}
