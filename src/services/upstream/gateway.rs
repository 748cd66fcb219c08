//! Gateway facade over the catalog fetcher and token exchanger

use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use url::Url;

use super::catalog::CatalogFetcher;
use super::error::GatewayError;
use super::token::TokenExchanger;
use super::types::GatewayConfig;
use crate::models::{Catalog, PlaybackTarget};

/// Methods accepted by the gateway entry points
pub const ALLOWED_METHODS: &[&str] = &["GET", "OPTIONS"];

lazy_static! {
    /// Path-safe channel id: one URL segment, no separators or escapes
    static ref CHANNEL_ID_REGEX: Regex = Regex::new(r"^[A-Za-z0-9._-]{1,128}$").unwrap();
}

/// Reject ids that cannot be embedded as a single upstream path segment
pub fn validate_channel_id(channel_id: &str) -> Result<(), GatewayError> {
    if channel_id.is_empty() {
        return Err(GatewayError::InvalidArgument(
            "ch_id must not be empty".to_string(),
        ));
    }

    if !CHANNEL_ID_REGEX.is_match(channel_id) || channel_id.chars().all(|c| c == '.') {
        return Err(GatewayError::InvalidArgument(format!(
            "ch_id contains unsupported characters: {:?}",
            channel_id
        )));
    }

    Ok(())
}

/// Single entry point to the upstream provider.
///
/// Calls share nothing but the immutable configuration and the HTTP client,
/// whose idle pool is disabled, so any number of them may run concurrently.
pub struct Gateway {
    catalog: CatalogFetcher,
    tokens: TokenExchanger,
    catalog_timeout: Duration,
    token_timeout: Duration,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        if config.catalog_candidates.is_empty() {
            bail!("At least one upstream catalog URL is required");
        }
        for candidate in &config.catalog_candidates {
            Url::parse(candidate)
                .with_context(|| format!("Invalid upstream catalog URL: {}", candidate))?;
        }
        Url::parse(&config.token_host)
            .with_context(|| format!("Invalid upstream token host: {}", config.token_host))?;
        Url::parse(&config.stream_host_template).with_context(|| {
            format!("Invalid stream host template: {}", config.stream_host_template)
        })?;

        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .pool_max_idle_per_host(0)
            .gzip(true);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            catalog: CatalogFetcher::new(
                http.clone(),
                config.catalog_candidates,
                config.catalog_timeout,
            ),
            tokens: TokenExchanger::new(
                http,
                &config.token_host,
                &config.stream_host_template,
                config.credential,
                config.token_timeout,
            ),
            catalog_timeout: config.catalog_timeout,
            token_timeout: config.token_timeout,
        })
    }

    /// Fetch a fresh catalog from upstream
    pub async fn fetch_catalog(&self) -> Result<Catalog, GatewayError> {
        with_budget(self.catalog_timeout, self.catalog.fetch()).await
    }

    /// Exchange a channel id for a playable URL
    pub async fn exchange_token(&self, channel_id: &str) -> Result<PlaybackTarget, GatewayError> {
        validate_channel_id(channel_id)?;
        with_budget(self.token_timeout, self.tokens.exchange(channel_id)).await
    }

    pub fn catalog_timeout(&self) -> Duration {
        self.catalog_timeout
    }

    pub fn token_timeout(&self) -> Duration {
        self.token_timeout
    }
}

/// Abort `operation` once `budget` has elapsed since the call started
async fn with_budget<T, F>(budget: Duration, operation: F) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    tokio::time::timeout(budget, operation)
        .await
        .map_err(|_| GatewayError::Timeout { budget })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::upstream::test_support::{
        fixed_upstream, gateway_config, hits, refused_base_url, slow_upstream,
    };
    use axum::http::StatusCode;
    use std::time::Instant;

    #[test]
    fn test_validate_channel_id() {
        assert!(validate_channel_id("102").is_ok());
        assert!(validate_channel_id("bk_102-hd.v2").is_ok());

        for bad in ["", "../etc", "a/b", "a b", "a?b", "%2e%2e", ".", "..", "ch#1"] {
            let err = validate_channel_id(bad).unwrap_err();
            assert_eq!(err.kind(), "invalid_argument", "{:?} should be rejected", bad);
        }

        assert!(validate_channel_id(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_new_requires_catalog_candidate() {
        let config = gateway_config(Vec::new(), "http://127.0.0.1:1".to_string());
        assert!(Gateway::new(config).is_err());
    }

    #[test]
    fn test_new_rejects_malformed_urls() {
        let config = gateway_config(vec!["not a url".to_string()], "http://127.0.0.1:1".into());
        assert!(Gateway::new(config).is_err());

        let config = gateway_config(vec!["http://127.0.0.1:1".to_string()], "nope".into());
        assert!(Gateway::new(config).is_err());
    }

    #[tokio::test]
    async fn test_invalid_ids_never_reach_upstream() {
        let (base, counter) = fixed_upstream(StatusCode::OK, "/x.m3u8").await;
        let gateway = Gateway::new(gateway_config(vec![base.clone()], base)).unwrap();

        for bad in ["", "../etc"] {
            let err = gateway.exchange_token(bad).await.unwrap_err();
            assert!(matches!(err, GatewayError::InvalidArgument(_)));
        }
        assert_eq!(hits(&counter), 0);
    }

    #[tokio::test]
    async fn test_exchange_token_scenario() {
        let (base, counter) = fixed_upstream(StatusCode::OK, "/x/y.m3u8?token=ZZZ").await;
        let gateway = Gateway::new(gateway_config(vec![base.clone()], base)).unwrap();

        let target = gateway.exchange_token("42").await.unwrap();

        assert_eq!(target.url, "https://stream.example:8080/x/y.m3u8?token=ZZZ");
        assert_eq!(hits(&counter), 1);
    }

    #[tokio::test]
    async fn test_fetch_catalog_retry_once() {
        let refused = refused_base_url().await;
        let (fallback, counter) = fixed_upstream(
            StatusCode::OK,
            r#"[{"ch_id":"1","ch_name":"A","img_url":"/a.png","ch_url":"http://host/a?token="}]"#,
        )
        .await;
        let gateway =
            Gateway::new(gateway_config(vec![refused, fallback.clone()], fallback)).unwrap();

        let catalog = gateway.fetch_catalog().await.unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(hits(&counter), 1);
    }

    #[tokio::test]
    async fn test_fetch_catalog_times_out() {
        let (slow, counter) = slow_upstream(Duration::from_secs(5)).await;
        let mut config = gateway_config(vec![slow.clone()], slow);
        config.catalog_timeout = Duration::from_millis(300);
        let gateway = Gateway::new(config).unwrap();

        let started = Instant::now();
        let err = gateway.fetch_catalog().await.unwrap_err();

        // Attempts share the budget, racing the outer deadline
        assert!(err.is_retryable());
        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(hits(&counter) <= 2);
    }

    #[tokio::test]
    async fn test_exchange_token_times_out() {
        let (slow, _) = slow_upstream(Duration::from_secs(5)).await;
        let mut config = gateway_config(vec![slow.clone()], slow);
        config.token_timeout = Duration::from_millis(200);
        let gateway = Gateway::new(config).unwrap();

        let started = Instant::now();
        let err = gateway.exchange_token("7").await.unwrap_err();

        assert!(matches!(err, GatewayError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_with_budget_reports_timeout() {
        let budget = Duration::from_millis(50);
        let err = with_budget(budget, async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok::<(), GatewayError>(())
        })
        .await
        .unwrap_err();

        assert_eq!(err, GatewayError::Timeout { budget });
    }

    #[tokio::test]
    async fn test_concurrent_calls_are_independent() {
        let (base, counter) = fixed_upstream(StatusCode::OK, "/x.m3u8?token=T").await;
        let gateway = Gateway::new(gateway_config(vec![base.clone()], base)).unwrap();

        let (a, b, c) = tokio::join!(
            gateway.exchange_token("1"),
            gateway.exchange_token("1"),
            gateway.exchange_token("2"),
        );

        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(hits(&counter), 3);
    }
}
