//! ShardChat Orchestrator - Main Entry Point
//!
//! Serves the OpenAI-style chat-completion endpoint and fans each request
//! out to the cluster through the external launcher.

use shardchat_common::{Result, ShardChatConfig};
use shardchat_orchestrator::{api, AppState, LaunchPlanner};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shardchat_orchestrator=info,tower_http=info,axum=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ShardChat Orchestrator");

    // Load configuration
    let config_path = std::env::var("SHARDCHAT_CONFIG")
        .unwrap_or_else(|_| "configs/orchestrator-config.yaml".to_string());

    let config = ShardChatConfig::from_file(&config_path)?;

    info!(
        "Orchestrator configuration loaded: model={}, bind={}:{}",
        config.model_id, config.bind_address, config.port
    );

    // Resolve the launcher once; per-request planning only appends arguments
    let planner = LaunchPlanner::from_config(&config.launch, &config.model_id);
    info!("Launcher resolved: {}", planner.describe());

    let state = AppState {
        planner: Arc::new(planner),
        model_id: config.model_id.clone(),
    };

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("ShardChat Orchestrator listening on {}", addr);

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("ShardChat Orchestrator shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Received shutdown signal");
}
