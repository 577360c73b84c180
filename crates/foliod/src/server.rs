//! HTTP server for foliod

use crate::config::Config;
use crate::db::FolioDb;
use crate::middleware;
use crate::routes;
use anyhow::Result;
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use folio_shared::{Clock, ExperienceEngine, SystemClock};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    pub db: Mutex<FolioDb>,
    /// Clock + configured default start date; the stored setting overrides the date per request
    pub engine: ExperienceEngine,
    pub config: Config,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config, db: FolioDb) -> Self {
        Self::with_clock(config, db, Arc::new(SystemClock))
    }

    /// Fixed clocks in tests
    pub fn with_clock(config: Config, db: FolioDb, clock: Arc<dyn Clock>) -> Self {
        let engine = ExperienceEngine::new(clock, config.experience.start_date());
        Self {
            db: Mutex::new(db),
            engine,
            config,
            start_time: Instant::now(),
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match config.server.cors_origin.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(e)) => {
            warn!("Ignoring invalid cors_origin: {}", e);
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}

/// Full application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::experience_routes(&state))
        .merge(routes::settings_routes(&state))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::body_size_limit,
        ))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until Ctrl+C
pub async fn run(state: AppState) -> Result<()> {
    let state = Arc::new(state);
    let addr = state.config.server.bind.clone();

    if state.config.admin.token.is_none() {
        warn!("  No admin token configured, admin routes are disabled");
    }

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("  Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
    }
}
