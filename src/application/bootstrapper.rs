//! Application bootstrapper
//!
//! Handles all initialization and setup for the BiteBase backend.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use http::HeaderValue;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, CONFIG};
use crate::db;
use crate::endpoints;
use crate::middleware::GatewayHeaderIdentity;
use crate::services::analysis::{Orchestrator, StageRegistry};
use crate::services::dispatcher::AnalysisDispatcher;
use crate::services::store::DatabaseStore;
use crate::state::AppState;

/// Bootstrap and run the application
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting BiteBase backend v{}", env!("CARGO_PKG_VERSION"));

    let state = init_services().await?;
    let dispatcher = state.dispatcher.clone();

    let app = create_app(state);
    let served = serve(app).await;

    dispatcher.shutdown().await;
    tracing::info!("Analysis dispatcher stopped");

    served
}

/// Initialize tracing/logging
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("bitebase={},tower_http=info", CONFIG.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match CONFIG.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_ansi(false))
            .init(),
    }
}

/// Initialize all application services
async fn init_services() -> anyhow::Result<AppState> {
    let conn = db::connect().await?;
    tracing::info!("Database connection established");

    let store = Arc::new(DatabaseStore::new(conn));
    let analysis = &CONFIG.analysis;

    let orchestrator = Orchestrator::new(store.clone(), store.clone(), StageRegistry::standard())
        .with_stage_timeout(analysis.stage_timeout);
    let dispatcher = AnalysisDispatcher::new(Arc::new(orchestrator), analysis.max_concurrent_runs);
    tracing::info!(
        max_concurrent_runs = analysis.max_concurrent_runs,
        stage_timeout_secs = analysis.stage_timeout.as_secs(),
        "Analysis dispatcher ready"
    );

    let identity = Arc::new(GatewayHeaderIdentity::new(&CONFIG.identity_header));
    tracing::info!(header = %identity.header(), "Caller identity read from gateway header");

    Ok(AppState::new(store, dispatcher, identity))
}

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    endpoints::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&CONFIG.server.allowed_origins))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the HTTP server and stop on Ctrl-C
async fn serve(app: Router) -> anyhow::Result<()> {
    let host: std::net::IpAddr = CONFIG.server.host.parse()?;
    let addr = SocketAddr::from((host, CONFIG.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
