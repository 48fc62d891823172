use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trivia_quiz::{config::QuizConfig, source::OpenTdbSource, state::AppState};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trivia_quiz=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting trivia quiz...");

    let config = QuizConfig::from_env();
    tracing::info!(
        "Question source: {} (timeout {:?}), feedback delay {:?}",
        config.opentdb_base_url,
        config.fetch_timeout,
        config.feedback_delay
    );

    let source = match OpenTdbSource::new(config.opentdb_base_url.clone(), config.fetch_timeout) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("Failed to initialize question source: {}", e);
            std::process::exit(1);
        }
    };

    let addr = config.bind_addr;
    let state = Arc::new(AppState::new(config, Arc::new(source)));
    let app = trivia_quiz::router(state);

    tracing::info!("Listening on http://{}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}
