//! Local upstream doubles for tests

use axum::{http::StatusCode, routing::any, Router};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::types::{AuthCredential, GatewayConfig};

pub(crate) const TEST_STREAM_TEMPLATE: &str = "https://stream.example:8080/";
pub(crate) const TEST_AUTHORIZATION: &str = "Basic dGVzdDp0ZXN0";

/// Serve `app` on an ephemeral loopback port and return its base URL
pub(crate) async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Base URL of a port nobody listens on, so connecting is refused
pub(crate) async fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Upstream answering every request with a fixed status and body, counting hits
pub(crate) async fn fixed_upstream(status: StatusCode, body: &'static str) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let handler = move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (status, body)
        }
    };
    let app = Router::new()
        .route("/", any(handler.clone()))
        .route("/*rest", any(handler));
    (serve(app).await, hits)
}

/// Upstream that waits `delay` before answering `[]`, counting hits
pub(crate) async fn slow_upstream(delay: Duration) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let handler = move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            (StatusCode::OK, "[]")
        }
    };
    let app = Router::new()
        .route("/", any(handler.clone()))
        .route("/*rest", any(handler));
    (serve(app).await, hits)
}

pub(crate) fn gateway_config(catalog_candidates: Vec<String>, token_host: String) -> GatewayConfig {
    GatewayConfig {
        catalog_candidates,
        token_host,
        stream_host_template: TEST_STREAM_TEMPLATE.to_string(),
        credential: AuthCredential::new(TEST_AUTHORIZATION),
        catalog_timeout: Duration::from_secs(2),
        token_timeout: Duration::from_secs(2),
        accept_invalid_certs: false,
        use_system_proxy: false,
        user_agent: "happynet-test".to_string(),
    }
}

pub(crate) fn hits(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}
