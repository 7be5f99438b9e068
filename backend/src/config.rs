use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the event API every proxy call goes to.
    pub api_url: String,
    pub api_key: String,
    // Single administrator account
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
    pub session_secret: String,
    pub session_max_age_seconds: u64,
    pub host: String,
    pub port: u16,
    // Expo / EAS (optional, builds are simulated without them)
    pub expo_token: Option<String>,
    pub eas_project_id: Option<String>,
    pub expo_account: String,
    pub expo_api_url: String,
    /// Origin of the CMS front-end, allowed by CORS.
    pub cms_base_url: Option<String>,
    /// Serve the in-memory fixture events instead of the event API.
    pub use_fixtures: bool,
    /// Open editors untouched for this long are dropped, unsaved edits included.
    pub editor_idle_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            api_url: env::var("API_URL").unwrap_or_else(|_| "https://api.oninvite.fr".into()),
            api_key: env::var("API_KEY").unwrap_or_default(),
            admin_email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@oninvite.fr".into()),
            admin_password: required("ADMIN_PASSWORD")?,
            admin_name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin Oninvite".into()),
            session_secret: required("SESSION_SECRET")?,
            session_max_age_seconds: env::var("SESSION_MAX_AGE_SECONDS")
                .unwrap_or_else(|_| "86400".into())
                .parse()?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            expo_token: env::var("EXPO_TOKEN").ok().filter(|s| !s.is_empty()),
            eas_project_id: env::var("EAS_PROJECT_ID").ok().filter(|s| !s.is_empty()),
            expo_account: env::var("EXPO_ACCOUNT").unwrap_or_else(|_| "oninvite".into()),
            expo_api_url: env::var("EXPO_API_URL")
                .unwrap_or_else(|_| "https://api.expo.dev".into()),
            cms_base_url: env::var("CMS_BASE_URL").ok().filter(|s| !s.is_empty()),
            use_fixtures: env::var("USE_FIXTURES")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            editor_idle_timeout_seconds: env::var("EDITOR_IDLE_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "7200".into())
                .parse()?,
        })
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required env var: {}", key))
}
