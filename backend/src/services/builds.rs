use reqwest::Client;
use serde_json::{json, Value};

use crate::{
    config::Config,
    models::build::{BuildList, BuildRequest, BuildResult, Platform},
};

use super::eas::{app_config, BuildEvent};

/// Submits and lists app builds on Expo Application Services. Without an
/// Expo token and project id every call degrades to a simulated answer.
pub struct ExpoBuildService {
    client: Client,
    api_url: String,
    token: Option<String>,
    project_id: Option<String>,
    account: String,
    event_api_url: String,
}

impl ExpoBuildService {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_url: config.expo_api_url.trim_end_matches('/').to_string(),
            token: config.expo_token.clone(),
            project_id: config.eas_project_id.clone(),
            account: config.expo_account.clone(),
            event_api_url: config.api_url.clone(),
        }
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.token.as_deref()?, self.project_id.as_deref()?))
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }

    /// The ten latest builds of the project. Never fails: problems are
    /// reported in the `error` field.
    pub async fn list_builds(&self) -> BuildList {
        let Some((token, project_id)) = self.credentials() else {
            return BuildList {
                builds: vec![],
                configured: false,
                message: Some(
                    "EAS non configuré - Ajoutez EXPO_TOKEN et EAS_PROJECT_ID".into(),
                ),
                error: None,
            };
        };

        let url = format!("{}/v2/projects/{}/builds", self.api_url, project_id);
        let response = match self
            .client
            .get(&url)
            .query(&[("limit", "10")])
            .bearer_auth(token)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Expo build listing failed: {}", e);
                return BuildList {
                    builds: vec![],
                    configured: true,
                    message: None,
                    error: Some(format!("Erreur réseau: {e}")),
                };
            }
        };

        if !response.status().is_success() {
            tracing::warn!("Expo API returned {} when listing builds", response.status());
            return BuildList {
                builds: vec![],
                configured: true,
                message: None,
                error: Some("Erreur API Expo - vérifiez votre token".into()),
            };
        }

        let data: Value = response.json().await.unwrap_or_else(|_| json!({ "data": [] }));
        let builds = data
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        BuildList { builds, configured: true, message: None, error: None }
    }

    /// Queue one build per requested platform. A platform that fails does not
    /// stop the others.
    pub async fn trigger(&self, event: &BuildEvent, request: &BuildRequest) -> Value {
        let config = app_config(event, &self.event_api_url, self.project_id.as_deref());

        let Some((token, project_id)) = self.credentials() else {
            tracing::info!("Expo not configured, simulating build of event {}", event.id);
            return json!({
                "success": true,
                "simulated": true,
                "message": "Build simulé (EXPO_TOKEN non configuré)",
                "config": config,
                "instructions": [
                    "1. Installez EAS CLI: npm install -g eas-cli",
                    "2. Connectez-vous: eas login",
                    "3. Lancez le build: eas build --platform all --profile production",
                ]
            });
        };

        let url = format!("{}/v2/projects/{}/builds", self.api_url, project_id);
        let platforms = request.platform.targets();
        let mut results = Vec::with_capacity(platforms.len());

        for platform in &platforms {
            let body = json!({
                "platform": platform.as_str().to_uppercase(),
                "profile": request.profile,
                "metadata": { "appName": event.title, "eventId": event.id }
            });
            let sent = self.client.post(&url).bearer_auth(token).json(&body).send().await;

            let result = match sent {
                Ok(response) if response.status().is_success() => {
                    let data: Value = response.json().await.unwrap_or_else(|_| json!({ "data": {} }));
                    let build_id = data
                        .pointer("/data/id")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                    tracing::info!(
                        "Queued {} build {:?} for event {}",
                        platform.as_str(),
                        build_id,
                        event.id
                    );
                    BuildResult {
                        platform: *platform,
                        url: Some(format!(
                            "https://expo.dev/accounts/{}/projects/{}/builds/{}",
                            self.account,
                            event.slug,
                            build_id.as_deref().unwrap_or("undefined")
                        )),
                        build_id,
                        status: "queued".into(),
                        error: None,
                    }
                }
                Ok(response) => {
                    let data: Value = response.json().await.unwrap_or(Value::Null);
                    let message = data
                        .pointer("/errors/0/message")
                        .and_then(Value::as_str)
                        .unwrap_or("Erreur de build")
                        .to_string();
                    tracing::warn!("Expo refused {} build: {}", platform.as_str(), message);
                    BuildResult::failed(*platform, message)
                }
                Err(e) => {
                    tracing::error!("Expo build request failed: {}", e);
                    BuildResult::failed(*platform, e.to_string())
                }
            };
            results.push(result);
        }

        let plural = if platforms.len() > 1 { "s" } else { "" };
        json!({
            "success": true,
            "builds": results,
            "message": format!("Build{plural} lancé{plural}"),
            "estimatedTime": "15-20 minutes"
        })
    }
}

impl BuildResult {
    fn failed(platform: Platform, error: String) -> Self {
        Self {
            platform,
            build_id: None,
            status: "failed".into(),
            url: None,
            error: Some(error),
        }
    }
}
