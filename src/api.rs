//! HTTP API endpoints.
//!
//! Read-only helpers for the frontend: the category catalogue and a health probe.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;
use crate::types::{Category, QuestionCount, ALLOWED_COUNTS, CATEGORIES};

/// Response structure for the category catalogue
#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
    pub allowed_counts: Vec<u32>,
    pub default_count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub source: String,
    pub active_sessions: usize,
}

/// List quiz categories and question counts.
///
/// GET /api/categories
pub async fn list_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: CATEGORIES.to_vec(),
        allowed_counts: ALLOWED_COUNTS.to_vec(),
        default_count: QuestionCount::default().get(),
    })
}

/// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        source: state.source.name().to_string(),
        active_sessions: state.active_sessions().await,
    })
}
