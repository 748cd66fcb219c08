use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::error::{ApiError, Endpoint};
use crate::metrics;
use crate::services::upstream::GatewayError;
use crate::AppState;

#[derive(Deserialize)]
pub struct TokenQuery {
    #[serde(default)]
    pub ch_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub path: String,
}

/// GET /token?ch_id=<id> (also /api/token)
pub async fn get_token(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<TokenResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let started = Instant::now();

    let result = match query.ch_id.as_deref() {
        Some(ch_id) => state.gateway.exchange_token(ch_id).await,
        None => Err(GatewayError::InvalidArgument(
            "missing ch_id query parameter".to_string(),
        )),
    };

    match result {
        Ok(target) => {
            metrics::record_outcome(Endpoint::Token.as_str(), "ok");
            tracing::info!(
                request_id = %request_id,
                ch_id = query.ch_id.as_deref().unwrap_or_default(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Stream token issued"
            );
            Ok(Json(TokenResponse { path: target.url }))
        }
        Err(err) => {
            metrics::record_outcome(Endpoint::Token.as_str(), err.kind());
            if err.is_retryable() {
                tracing::error!(
                    request_id = %request_id,
                    kind = err.kind(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Token exchange failed: {}",
                    err
                );
            } else {
                tracing::debug!(request_id = %request_id, kind = err.kind(), "Token request rejected: {}", err);
            }
            Err(ApiError::new(Endpoint::Token, err))
        }
    }
}
