use axum::{http::StatusCode, Json};
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};

use crate::models::{
    draft::EventStatus,
    event::{EventPayload, EventRecord, EventSummary},
};

/// Failure talking to the event API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx reply. `body` is the backend's JSON error object, or
    /// `{"detail": "API error"}` when the reply was not JSON.
    #[error("{}", detail_of(.body))]
    Backend { status: u16, body: Value },
    #[error("Erreur réseau: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Réponse inattendue de l'API: {0}")]
    Malformed(String),
    #[error("Événement {0} introuvable")]
    NotFound(String),
}

fn detail_of(body: &Value) -> String {
    body.get("detail")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .unwrap_or("API error")
        .to_string()
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Backend { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::Transport(_) | ApiError::Malformed(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Handler rejection. Backend error bodies are passed through verbatim
    /// with the backend's status.
    pub fn into_rejection(self) -> (StatusCode, Json<Value>) {
        let status = self.status_code();
        match self {
            ApiError::Backend { body, .. } => (status, Json(body)),
            other => (status, Json(json!({ "error": other.to_string() }))),
        }
    }
}

/// Client for the event API. Every call carries the server-side API key,
/// which never leaves this process.
pub struct BackendClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request.header("X-API-Key", &self.api_key).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let body = serde_json::from_str::<Value>(&text)
                .ok()
                .filter(Value::is_object)
                .unwrap_or_else(|| json!({ "detail": "API error" }));
            tracing::warn!("Event API returned {}: {}", status, detail_of(&body));
            return Err(ApiError::Backend { status: status.as_u16(), body });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!("Event API returned a non-JSON body ({}), using {{}}", e);
                Ok(json!({}))
            }
        }
    }

    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send(self.client.get(self.url(path))).await
    }

    pub async fn get_with_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        self.send(self.client.get(self.url(path)).query(query)).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    pub async fn post_empty(&self, path: &str) -> Result<Value, ApiError> {
        self.send(self.client.post(self.url(path))).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.send(self.client.put(self.url(path)).json(body)).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.send(self.client.patch(self.url(path)).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.send(self.client.delete(self.url(path))).await
    }

    fn typed<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
        serde_json::from_value(value).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    pub async fn list_events(&self, status: Option<&str>) -> Result<Vec<EventSummary>, ApiError> {
        let value = match status {
            Some(status) => self.get_with_query("/api/events/", &[("status", status)]).await?,
            None => self.get("/api/events/").await?,
        };
        Self::typed(value)
    }

    pub async fn get_event(&self, event_id: &str) -> Result<EventRecord, ApiError> {
        Self::typed(self.get(&format!("/api/events/{event_id}")).await?)
    }

    pub async fn create_event(&self, payload: &EventPayload) -> Result<EventRecord, ApiError> {
        Self::typed(self.post("/api/events/", payload).await?)
    }

    pub async fn update_event(&self, event_id: &str, payload: &EventPayload) -> Result<Value, ApiError> {
        self.put(&format!("/api/events/{event_id}"), payload).await
    }

    pub async fn set_status(&self, event_id: &str, status: EventStatus) -> Result<Value, ApiError> {
        self.patch(&format!("/api/events/{event_id}/status"), &json!({ "status": status }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn forwards_api_key_and_parses_list() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/events/")
                    .query_param("status", "live")
                    .header("X-API-Key", "secret");
                then.status(200).json_body(json!([
                    { "id": "1", "title": "Sarah & David", "type": "wedding", "status": "live", "guest_count": 250 }
                ]));
            })
            .await;

        let client = BackendClient::new(server.base_url(), "secret");
        let events = client.list_events(Some("live")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].guest_count, Some(250));
    }

    #[tokio::test]
    async fn backend_detail_is_surfaced_verbatim() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/api/events/42");
                then.status(422).json_body(json!({ "detail": "event_date is required" }));
            })
            .await;

        let client = BackendClient::new(server.base_url(), "k");
        let err = client.put("/api/events/42", &json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "event_date is required");
        let (status, Json(body)) = err.into_rejection();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "event_date is required");
    }

    #[tokio::test]
    async fn non_json_bodies_are_replaced() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/events/broken");
                then.status(502).body("<html>Bad gateway</html>");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/events/html");
                then.status(200).body("<html>ok</html>");
            })
            .await;

        let client = BackendClient::new(server.base_url(), "k");
        let err = client.get("/api/events/broken").await.unwrap_err();
        assert!(matches!(err, ApiError::Backend { status: 502, .. }));
        assert_eq!(err.to_string(), "API error");

        let value = client.get("/api/events/html").await.unwrap();
        assert_eq!(value, json!({}));
    }
}
