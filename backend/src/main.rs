use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oninvite_cms::{config::Config, routes, services::editor_sessions, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    if config.use_fixtures {
        info!("USE_FIXTURES set, editors work on in-memory demo events");
    } else {
        info!("Event API at {}", config.api_url);
    }
    if config.api_key.is_empty() {
        info!("API_KEY not set, event API calls are unauthenticated");
    }

    let addr = format!("{}:{}", config.host, config.port);

    // The CMS front-end origin, plus localhost for development.
    let cms_origin = config.cms_base_url.clone();
    let cors_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let Ok(o) = origin.to_str() else {
            return false;
        };
        if o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") {
            return true;
        }
        cms_origin.as_deref().map(|base| base.trim_end_matches('/')) == Some(o)
    });

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
        .allow_origin(cors_origin);

    let state = AppState::new(config);
    editor_sessions::start_sweeper(state.editors.clone());
    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    info!("Oninvite CMS listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
