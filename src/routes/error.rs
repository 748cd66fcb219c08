use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::services::upstream::{GatewayError, ALLOWED_METHODS};

/// Gateway entry point a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Catalog,
    Token,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Catalog => "catalog",
            Endpoint::Token => "token",
        }
    }
}

/// Gateway failure rendered as `{ error, details }` with an endpoint-specific status
#[derive(Debug)]
pub struct ApiError {
    pub endpoint: Endpoint,
    pub error: GatewayError,
}

impl ApiError {
    pub fn new(endpoint: Endpoint, error: GatewayError) -> Self {
        Self { endpoint, error }
    }

    pub fn status(&self) -> StatusCode {
        match (&self.error, self.endpoint) {
            (GatewayError::InvalidArgument(_), _) => StatusCode::BAD_REQUEST,
            (GatewayError::MethodNotAllowed { .. }, _) => StatusCode::METHOD_NOT_ALLOWED,
            (GatewayError::Timeout { .. }, _) => StatusCode::GATEWAY_TIMEOUT,
            (GatewayError::UpstreamUnavailable { .. }, Endpoint::Token) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            (GatewayError::UpstreamUnavailable { .. }, Endpoint::Catalog) => StatusCode::BAD_GATEWAY,
            (GatewayError::UpstreamProtocolError(_), _) => StatusCode::BAD_GATEWAY,
        }
    }

    fn summary(&self) -> &'static str {
        match (&self.error, self.endpoint) {
            (GatewayError::InvalidArgument(_), _) => "Invalid ch_id",
            (GatewayError::MethodNotAllowed { .. }, _) => "Method Not Allowed",
            (GatewayError::Timeout { .. }, _) => "Gateway Timeout",
            (GatewayError::UpstreamUnavailable { .. }, Endpoint::Token) => {
                "Service temporarily unavailable"
            }
            (GatewayError::UpstreamUnavailable { .. }, Endpoint::Catalog) => "Bad Gateway",
            (GatewayError::UpstreamProtocolError(_), _) => "Bad Gateway",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({
            "error": self.summary(),
            "details": self.error.to_string(),
        }));

        let mut response = (status, body).into_response();
        if let GatewayError::MethodNotAllowed { allowed } = &self.error {
            if let Ok(value) = HeaderValue::from_str(&allowed.join(", ")) {
                response.headers_mut().insert(header::ALLOW, value);
            }
        }
        response
    }
}

/// Error returned for any method the gateway does not serve
pub fn method_not_allowed(endpoint: Endpoint) -> ApiError {
    ApiError::new(
        endpoint,
        GatewayError::MethodNotAllowed {
            allowed: ALLOWED_METHODS,
        },
    )
}
