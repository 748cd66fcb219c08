use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::error::{ApiError, Endpoint};
use crate::metrics;
use crate::AppState;

/// Number of upstream entries rejected while decoding the catalog
pub const CATALOG_DROPPED_HEADER: &str = "x-catalog-dropped";

/// GET /catalog (also /api/channels, /api/v1/videos)
/// Relays a freshly fetched channel list as a JSON array.
pub async fn get_catalog(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = Uuid::new_v4();
    let started = Instant::now();

    match state.gateway.fetch_catalog().await {
        Ok(catalog) => {
            metrics::record_outcome(Endpoint::Catalog.as_str(), "ok");
            if catalog.dropped > 0 {
                metrics::CATALOG_DROPPED_ENTRIES.inc_by(catalog.dropped as u64);
                tracing::warn!(
                    request_id = %request_id,
                    dropped = catalog.dropped,
                    "Dropped malformed catalog entries"
                );
            }
            tracing::info!(
                request_id = %request_id,
                channels = catalog.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Catalog fetched"
            );

            Ok((
                [(CATALOG_DROPPED_HEADER, catalog.dropped.to_string())],
                Json(catalog.channels),
            ))
        }
        Err(err) => {
            metrics::record_outcome(Endpoint::Catalog.as_str(), err.kind());
            tracing::error!(
                request_id = %request_id,
                kind = err.kind(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Catalog fetch failed: {}",
                err
            );
            Err(ApiError::new(Endpoint::Catalog, err))
        }
    }
}
