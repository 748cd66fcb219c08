use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Root endpoint - basic status
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "HappyNet Gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "runtime": "rust"
    }))
}

/// Upstream settings in effect
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamSummary {
    catalog_candidates: usize,
    catalog_timeout_ms: u64,
    token_timeout_ms: u64,
}

/// Health check response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    environment: String,
    uptime: u64,
    started_at: DateTime<Utc>,
    upstream: UpstreamSummary,
}

/// GET /health
///
/// Never contacts upstream: the gateway holds no state whose health could
/// degrade, and probing the provider here would spend its rate limit.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = HealthResponse {
        status: "ok".to_string(),
        environment: state.config.node_env.clone(),
        uptime: state.start_time.elapsed().as_secs(),
        started_at: state.started_at,
        upstream: UpstreamSummary {
            catalog_candidates: state.config.upstream_catalog_urls.len(),
            catalog_timeout_ms: state.gateway.catalog_timeout().as_millis() as u64,
            token_timeout_ms: state.gateway.token_timeout().as_millis() as u64,
        },
    };

    Json(health)
}

/// GET /metrics - Prometheus metrics
pub async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                b"Internal Server Error".to_vec(),
            )
        }
    }
}

/// Liveness probe (for Kubernetes)
pub async fn live() -> impl IntoResponse {
    (StatusCode::OK, "alive")
}
