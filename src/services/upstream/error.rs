//! Error taxonomy returned by the upstream access layer

use std::time::Duration;
use thiserror::Error;

/// Failure kinds surfaced to callers of the [`Gateway`](super::Gateway).
///
/// Raw transport errors never escape this layer; they are folded into one
/// of these variants with their message preserved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Rejected before any upstream call was attempted
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("method not allowed (allowed: {})", .allowed.join(", "))]
    MethodNotAllowed { allowed: &'static [&'static str] },

    /// Wall-clock budget exceeded
    #[error("upstream did not answer within {}ms", .budget.as_millis())]
    Timeout { budget: Duration },

    /// Upstream unreachable, or reachable but answering with a failure status
    #[error("upstream unavailable: {message}")]
    UpstreamUnavailable {
        status: Option<u16>,
        message: String,
    },

    /// Success status but the payload could not be interpreted
    #[error("upstream protocol error: {0}")]
    UpstreamProtocolError(String),
}

impl GatewayError {
    /// Stable label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::InvalidArgument(_) => "invalid_argument",
            GatewayError::MethodNotAllowed { .. } => "method_not_allowed",
            GatewayError::Timeout { .. } => "timeout",
            GatewayError::UpstreamUnavailable { .. } => "upstream_unavailable",
            GatewayError::UpstreamProtocolError(_) => "upstream_protocol_error",
        }
    }

    /// Whether the same call may succeed if repeated later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::Timeout { .. } | GatewayError::UpstreamUnavailable { .. }
        )
    }

    /// Transport-level failure (no HTTP status was received)
    pub(crate) fn transport(err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Connection timeout - server did not respond".to_string()
        } else if err.is_connect() {
            format!("Connection failed - server unreachable: {}", err)
        } else {
            format!("Request failed: {}", err)
        };
        GatewayError::UpstreamUnavailable {
            status: None,
            message,
        }
    }

    /// Upstream answered with a non-success status
    pub(crate) fn status(status: reqwest::StatusCode) -> Self {
        let reason = status.canonical_reason().unwrap_or("Error");
        GatewayError::UpstreamUnavailable {
            status: Some(status.as_u16()),
            message: format!("Upstream {} {}", status.as_u16(), reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(GatewayError::Timeout {
            budget: Duration::from_secs(5)
        }
        .is_retryable());
        assert!(GatewayError::status(reqwest::StatusCode::BAD_GATEWAY).is_retryable());
        assert!(!GatewayError::InvalidArgument("x".into()).is_retryable());
        assert!(!GatewayError::UpstreamProtocolError("x".into()).is_retryable());
    }

    #[test]
    fn test_status_error_carries_code() {
        let err = GatewayError::status(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(
            err,
            GatewayError::UpstreamUnavailable {
                status: Some(404),
                message: "Upstream 404 Not Found".to_string(),
            }
        );
        assert_eq!(err.kind(), "upstream_unavailable");
    }

    #[test]
    fn test_display_messages() {
        let err = GatewayError::MethodNotAllowed {
            allowed: &["GET", "OPTIONS"],
        };
        assert_eq!(err.to_string(), "method not allowed (allowed: GET, OPTIONS)");

        let err = GatewayError::Timeout {
            budget: Duration::from_millis(1500),
        };
        assert_eq!(err.to_string(), "upstream did not answer within 1500ms");
    }
}
