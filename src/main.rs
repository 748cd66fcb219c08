mod config;
mod metrics;
mod models;
mod routes;
mod services;

use chrono::{DateTime, Utc};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::upstream::Gateway;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub gateway: Gateway,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "happynet_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();
    let port = config.port;

    tracing::info!("Starting HappyNet Gateway v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.node_env);

    if config.upstream_catalog_urls.len() > services::upstream::catalog::MAX_CATALOG_ATTEMPTS {
        tracing::warn!(
            "{} catalog URLs configured, only the first {} are ever tried",
            config.upstream_catalog_urls.len(),
            services::upstream::catalog::MAX_CATALOG_ATTEMPTS
        );
    }

    // Initialize upstream gateway
    let gateway = Gateway::new(config.gateway_config())?;
    tracing::info!(
        "Upstream gateway initialized: catalog candidates {:?}, token host {}",
        config.upstream_catalog_urls,
        config.upstream_token_host
    );

    // Build application state
    let state = Arc::new(AppState {
        config,
        gateway,
        start_time: Instant::now(),
        started_at: Utc::now(),
    });

    let app = routes::router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // Keep serving; only an actual signal stops the server
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
