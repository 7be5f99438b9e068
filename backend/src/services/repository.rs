use async_trait::async_trait;

use crate::models::{draft::EventDraft, event::EventPayload};

use super::api_client::{ApiError, BackendClient};

/// Where the editor loads drafts from and saves them to.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn load(&self, event_id: &str) -> Result<EventDraft, ApiError>;

    /// Persist a new event and return the id the backend assigned.
    async fn create(&self, draft: &EventDraft) -> Result<String, ApiError>;

    async fn update(&self, event_id: &str, draft: &EventDraft) -> Result<(), ApiError>;
}

#[async_trait]
impl EventRepository for BackendClient {
    async fn load(&self, event_id: &str) -> Result<EventDraft, ApiError> {
        Ok(self.get_event(event_id).await?.into_draft())
    }

    async fn create(&self, draft: &EventDraft) -> Result<String, ApiError> {
        let record = self.create_event(&EventPayload::from_draft(draft, true)).await?;
        if record.id.is_empty() {
            return Err(ApiError::Malformed("la création n'a pas renvoyé d'identifiant".into()));
        }
        tracing::info!("Created event {} ({})", record.id, draft.title());
        Ok(record.id)
    }

    async fn update(&self, event_id: &str, draft: &EventDraft) -> Result<(), ApiError> {
        self.update_event(event_id, &EventPayload::from_draft(draft, false)).await?;
        tracing::info!("Saved event {}", event_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn create_posts_payload_and_returns_id() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/events/")
                    .header("X-API-Key", "k")
                    .json_body_includes(r#"{"title":"Nathan","slug":"nathan"}"#);
                then.status(201).json_body(json!({ "id": "evt_9", "title": "Nathan" }));
            })
            .await;

        let mut draft = EventDraft::empty_template();
        std::sync::Arc::make_mut(&mut draft.event).title = Some("Nathan".into());

        let client = BackendClient::new(server.base_url(), "k");
        let id = client.create(&draft).await.unwrap();
        mock.assert_async().await;
        assert_eq!(id, "evt_9");
    }

    #[tokio::test]
    async fn unreadable_config_section_survives_load_and_save() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/events/8");
                then.status(200).json_body(json!({
                    "id": "8",
                    "title": "Léa & Tom",
                    "config": {
                        "settings": { "souvenir_delay_days": "7" },
                        "locations": [{ "id": "loc_1", "name": "Mairie" }]
                    }
                }));
            })
            .await;
        let put = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/api/events/8")
                    .json_body_includes(r#"{"config":{"settings":{"souvenir_delay_days":"7"}}}"#);
                then.status(200).json_body(json!({ "id": "8" }));
            })
            .await;

        let client = BackendClient::new(server.base_url(), "k");
        let draft = client.load("8").await.unwrap();
        assert_eq!(draft.locations[0].name, "Mairie");
        client.update("8", &draft).await.unwrap();
        put.assert_async().await;
    }

    #[tokio::test]
    async fn load_maps_record_into_draft() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/events/7");
                then.status(200).json_body(json!({
                    "id": "7",
                    "title": "Léa & Tom",
                    "config": { "program": [{ "title": "Cocktail", "location_id": "loc_x" }] }
                }));
            })
            .await;

        let client = BackendClient::new(server.base_url(), "k");
        let draft = client.load("7").await.unwrap();
        assert_eq!(draft.title(), "Léa & Tom");
        assert_eq!(draft.program.len(), 1);
        assert_eq!(draft.step_location_name(&draft.program[0]), "Aucun lieu");
    }
}
