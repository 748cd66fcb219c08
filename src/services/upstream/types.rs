//! Upstream configuration types

use std::fmt;
use std::time::Duration;

/// Authorization header value sent on token exchanges.
///
/// Treated as an opaque secret: it is never parsed and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthCredential(String);

impl AuthCredential {
    pub fn new(header_value: impl Into<String>) -> Self {
        Self(header_value.into())
    }

    pub fn header_value(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthCredential(<redacted>)")
    }
}

/// Everything the gateway needs to reach the upstream provider
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Catalog endpoints in the order they are tried
    pub catalog_candidates: Vec<String>,
    /// Base URL of the token endpoint, the channel id is appended as a path segment
    pub token_host: String,
    /// Prefix the normalized token path is appended to
    pub stream_host_template: String,
    pub credential: AuthCredential,
    /// Wall-clock budget for a whole catalog fetch, retry included
    pub catalog_timeout: Duration,
    /// Wall-clock budget for one token exchange
    pub token_timeout: Duration,
    pub accept_invalid_certs: bool,
    /// Honor HTTP(S)_PROXY from the environment
    pub use_system_proxy: bool,
    pub user_agent: String,
}
