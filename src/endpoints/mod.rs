pub mod reports;
pub mod research_projects;
pub mod restaurant_profiles;

use axum::{middleware as axum_middleware, routing::get, Json, Router};

use crate::config::CONFIG;
use crate::middleware::require_auth;
use crate::state::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no identity required)
    let public_routes = Router::new()
        .route("/api/v1/health", get(health_check))
        .route("/api/v1/version", get(get_version));

    // Protected routes (caller identity required)
    let protected_routes = Router::new()
        .nest("/api/v1", api_routes(state.clone()))
        .layer(axum_middleware::from_fn_with_state(state, require_auth));

    public_routes.merge(protected_routes)
}

/// API routes under /api/v1/*
fn api_routes(state: AppState) -> Router {
    Router::new()
        .nest(
            "/restaurant-profiles",
            restaurant_profiles::restaurant_profiles_routes(state.clone()),
        )
        .nest(
            "/research-projects",
            research_projects::research_projects_routes(state.clone()),
        )
        .nest("/reports", reports::reports_routes(state))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Version info endpoint
async fn get_version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "version": CONFIG.version,
        "commit_hash": CONFIG.commit_hash,
        "build_time": CONFIG.build_time,
    }))
}
