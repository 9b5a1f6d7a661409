//! HTTP surface for the orchestrator

pub mod chat;
pub mod error;
pub mod types;

use axum::routing::{get, post};
use axum::Router;
use shardchat_common::METRICS;
use std::sync::Arc;

use crate::launch::LaunchPlanner;

/// Shared per-process state handed to every handler.
///
/// The planner is resolved once at startup; requests only borrow it, so
/// nothing mutable is shared between them.
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<LaunchPlanner>,
    pub model_id: String,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/chat/completions", post(chat::create_chat_completion))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({"status": "ok"}))
}

async fn metrics() -> String {
    METRICS.gather()
}
