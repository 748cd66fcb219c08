pub mod catalog;
pub mod error;
pub mod health;
pub mod token;

use axum::{
    handler::Handler,
    http::{header, HeaderValue, StatusCode},
    routing::{get, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use self::error::{method_not_allowed, Endpoint};
use crate::AppState;

/// Build the full HTTP router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health endpoints
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .route("/live", get(health::live))
        // Gateway endpoints
        .merge(gateway_routes())
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}

/// Catalog and token entry points, under their current and legacy paths.
/// Every response carries permissive CORS headers and is marked uncacheable.
fn gateway_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/catalog", gateway_endpoint(Endpoint::Catalog, catalog::get_catalog))
        .route("/api/channels", gateway_endpoint(Endpoint::Catalog, catalog::get_catalog))
        .route("/api/v1/videos", gateway_endpoint(Endpoint::Catalog, catalog::get_catalog))
        .route("/token", gateway_endpoint(Endpoint::Token, token::get_token))
        .route("/api/token", gateway_endpoint(Endpoint::Token, token::get_token))
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static("GET,OPTIONS"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static("Content-Type"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                )),
        )
}

/// GET served by `handler`, OPTIONS answered locally, anything else 405.
///
/// HEAD is rejected explicitly; axum would otherwise run the GET handler for it.
fn gateway_endpoint<H, T>(endpoint: Endpoint, handler: H) -> MethodRouter<Arc<AppState>>
where
    H: Handler<T, Arc<AppState>>,
    T: 'static,
{
    let reject = move || async move { method_not_allowed(endpoint) };
    get(handler)
        .head(reject)
        .options(preflight)
        .fallback(reject)
}

/// CORS preflight: no upstream call, no body
async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}
