//! RealDeviceMap Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::header::HeaderName;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rdm_engine::api;
use rdm_engine::app::App;
use rdm_engine::infrastructure::{
    clock::SystemClock,
    config::EngineConfig,
    fragments::HtmlFragmentRenderer,
    localizer::JsonLocalizer,
    ports::{ClockPort, LocalizerPort},
    sqlite::SqliteStorage,
};
use rdm_engine::use_cases::map_data::MapDataSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine is often run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rdm_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RealDeviceMap Engine");

    let config = EngineConfig::from_env()?;

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

    tracing::info!(path = %config.database_path, "Opening SQLite database");
    let storage = SqliteStorage::new(&config.database_path, clock.clone()).await?;

    let localizer: Arc<dyn LocalizerPort> = match &config.locale_path {
        Some(path) => Arc::new(JsonLocalizer::from_file(path, config.time_zone)?),
        None => Arc::new(JsonLocalizer::builtin(config.time_zone)),
    };

    let settings = MapDataSettings {
        max_pokemon_id: config.max_pokemon_id,
        category_timeout: config.category_timeout,
    };
    tracing::info!(
        max_pokemon_id = settings.max_pokemon_id,
        category_timeout_ms = settings.category_timeout.as_millis() as u64,
        "Map data configured"
    );

    // Create application
    let app = Arc::new(App::new(
        Arc::new(storage.clone()),
        Arc::new(storage.session_repo()),
        localizer,
        Arc::new(HtmlFragmentRenderer::new()),
        clock,
        settings,
    ));

    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(config.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        // The map page sends its session token in a custom header, which triggers preflights.
        .allow_headers([HeaderName::from_static("x-session-id")]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
