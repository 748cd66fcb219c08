use std::env;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::services::upstream::{AuthCredential, GatewayConfig};

/// Default catalog candidates, HTTPS first with a plain HTTP fallback
const DEFAULT_CATALOG_URLS: &str =
    "https://tv.roarzone.info/app.php?per=true,http://tv.roarzone.info/app.php?per=true";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub node_env: String,

    // Upstream
    pub upstream_catalog_urls: Vec<String>,
    pub upstream_token_host: String,
    pub stream_host_template: String,
    pub upstream_credential: AuthCredential,
    pub upstream_accept_invalid_certs: bool,
    pub upstream_use_system_proxy: bool,

    // Budgets
    pub catalog_timeout_ms: u64,
    pub token_timeout_ms: u64,

    // Misc
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            // Server
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .unwrap_or(3001),
            node_env: env::var("NODE_ENV").unwrap_or_else(|_| "development".to_string()),

            // Upstream
            upstream_catalog_urls: parse_url_list(
                &env::var("UPSTREAM_CATALOG_URLS")
                    .unwrap_or_else(|_| DEFAULT_CATALOG_URLS.to_string()),
            ),
            upstream_token_host: env::var("UPSTREAM_TOKEN_HOST")
                .unwrap_or_else(|_| "https://tv.roarzone.info".to_string()),
            stream_host_template: env::var("STREAM_HOST_TEMPLATE")
                .unwrap_or_else(|_| "https://peer19.roarzone.info:8080/".to_string()),
            upstream_credential: match env::var("UPSTREAM_AUTHORIZATION") {
                Ok(header) if !header.trim().is_empty() => AuthCredential::new(header.trim()),
                _ => basic_credential(
                    &env::var("UPSTREAM_USERNAME").unwrap_or_else(|_| "admin".to_string()),
                    &env::var("UPSTREAM_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
                ),
            },
            // Upstream serves a self-signed certificate
            upstream_accept_invalid_certs: env::var("UPSTREAM_ACCEPT_INVALID_CERTS")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
            upstream_use_system_proxy: env::var("UPSTREAM_USE_SYSTEM_PROXY")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),

            // Budgets
            catalog_timeout_ms: env::var("CATALOG_TIMEOUT_MS")
                .unwrap_or_else(|_| "15000".to_string())
                .parse()
                .unwrap_or(15_000), // 15 seconds

            token_timeout_ms: env::var("TOKEN_TIMEOUT_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5_000), // 5 seconds

            // Misc
            user_agent: env::var("USER_AGENT").unwrap_or_else(|_| "Mozilla/5.0".to_string()),
        }
    }

    /// Project the upstream-facing settings handed to the gateway at construction
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            catalog_candidates: self.upstream_catalog_urls.clone(),
            token_host: self.upstream_token_host.clone(),
            stream_host_template: self.stream_host_template.clone(),
            credential: self.upstream_credential.clone(),
            catalog_timeout: Duration::from_millis(self.catalog_timeout_ms),
            token_timeout: Duration::from_millis(self.token_timeout_ms),
            accept_invalid_certs: self.upstream_accept_invalid_certs,
            use_system_proxy: self.upstream_use_system_proxy,
            user_agent: self.user_agent.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Split a comma-separated candidate list, keeping order and skipping blanks
fn parse_url_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Build an HTTP Basic credential from a username/password pair
pub fn basic_credential(username: &str, password: &str) -> AuthCredential {
    let encoded = STANDARD.encode(format!("{}:{}", username, password));
    AuthCredential::new(format!("Basic {}", encoded))
}
