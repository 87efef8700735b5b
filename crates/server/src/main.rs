//! Workload Sizer service
//!
//! Exposes the recommendation engine's submit boundary as a single HTTP
//! endpoint, plus health and metrics surfaces.

use anyhow::Result;
use sizer_lib::{
    coordinator::{CoordinatorConfig, RequestCoordinator},
    engine::SizingEngine,
    health::{components, HealthRegistry},
    observability::{SizerLogger, SizerMetrics},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting sizer-server");

    let config = config::ServerConfig::load()?;
    info!(api_port = config.api_port, latency_ms = config.latency_ms, "Server configured");

    let health_registry = HealthRegistry::new();
    health_registry.register(components::COORDINATOR).await;
    health_registry.register(components::PARSER).await;

    let metrics = SizerMetrics::new();
    let logger = SizerLogger::new(&config.instance_name);
    logger.log_startup(SERVER_VERSION);

    let coordinator = RequestCoordinator::new(
        SizingEngine::new(),
        CoordinatorConfig {
            latency: Duration::from_millis(config.latency_ms),
            timeout: Duration::from_millis(config.timeout_ms),
        },
    );

    let app_state = Arc::new(api::AppState::new(
        coordinator,
        health_registry.clone(),
        metrics,
        logger.clone(),
    ));

    health_registry.set_ready(true).await;

    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    api_handle.abort();

    Ok(())
}
