// Public API for integration tests and potential library usage

pub mod api;
pub mod config;
pub mod protocol;
pub mod session;
pub mod shuffle;
pub mod source;
pub mod state;
pub mod text;
pub mod types;
pub mod ws;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use state::AppState;

/// Build the HTTP router: WebSocket endpoint, JSON API and static frontend
pub fn router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/api/categories", get(api::list_categories))
        .route("/api/health", get(api::health))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
