//! Channel catalog retrieval
//!
//! Fetches the upstream JSON catalog, falling back to the next transport
//! candidate once when the first attempt fails before any status is received.

use reqwest::{header, Client};
use serde_json::{Map, Value};
use std::time::{Duration, Instant};
use url::Url;

use super::error::GatewayError;
use super::gateway::validate_channel_id;
use crate::models::{Catalog, Channel};

/// Upper bound on upstream round trips per fetch (first try + one fallback)
pub const MAX_CATALOG_ATTEMPTS: usize = 2;

/// Outcome of a single failed attempt
enum AttemptError {
    /// No response received, the next candidate may be tried
    Transport(GatewayError),
    /// Upstream answered, its verdict stands
    Terminal(GatewayError),
}

pub struct CatalogFetcher {
    http: Client,
    candidates: Vec<String>,
    budget: Duration,
}

impl CatalogFetcher {
    /// Create a fetcher over an ordered, non-empty candidate list.
    ///
    /// `budget` is the wall-clock allowance for the whole fetch, split across
    /// attempts by [`attempt_timeout`].
    pub fn new(http: Client, candidates: Vec<String>, budget: Duration) -> Self {
        Self {
            http,
            candidates,
            budget,
        }
    }

    /// Endpoints tried by one fetch, in order.
    ///
    /// With a single candidate the fallback reuses it; candidates past the
    /// attempt budget are never reached.
    fn attempt_plan(&self) -> impl Iterator<Item = &str> + '_ {
        self.candidates
            .iter()
            .cycle()
            .take(MAX_CATALOG_ATTEMPTS)
            .map(String::as_str)
    }

    /// Fetch and decode the catalog
    pub async fn fetch(&self) -> Result<Catalog, GatewayError> {
        let started = Instant::now();
        let mut last_err = None;

        for (attempt, url) in self.attempt_plan().enumerate() {
            let timeout = attempt_timeout(self.budget, started.elapsed(), attempt);
            match self.attempt(url, timeout).await {
                Ok(body) => return decode_catalog(&body),
                Err(AttemptError::Transport(err)) => last_err = Some(err),
                Err(AttemptError::Terminal(err)) => return Err(err),
            }
        }

        Err(last_err.unwrap_or_else(|| GatewayError::UpstreamUnavailable {
            status: None,
            message: "No catalog endpoint configured".to_string(),
        }))
    }

    async fn attempt(&self, url: &str, timeout: Duration) -> Result<String, AttemptError> {
        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json")
            .header(header::CACHE_CONTROL, "no-cache")
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| AttemptError::Transport(GatewayError::transport(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Terminal(GatewayError::status(status)));
        }

        // Connection dropped mid-body counts as a transport failure
        response
            .text()
            .await
            .map_err(|e| AttemptError::Transport(GatewayError::transport(&e)))
    }
}

/// Time allowed for attempt number `attempt` (0-based).
///
/// The remaining budget is shared evenly by the attempts still to come, so the
/// first attempt gets half and a fallback after a fast failure gets the rest.
pub fn attempt_timeout(budget: Duration, elapsed: Duration, attempt: usize) -> Duration {
    let attempts_left = MAX_CATALOG_ATTEMPTS.saturating_sub(attempt).max(1) as u32;
    budget.saturating_sub(elapsed) / attempts_left
}

/// Decode an upstream catalog body.
///
/// The top level must be a JSON array. Entries without an id the token
/// exchange would accept, or without a usable stream URL, are dropped and
/// counted rather than failing the whole catalog. A blank body is read as an
/// empty catalog.
pub fn decode_catalog(body: &str) -> Result<Catalog, GatewayError> {
    if body.trim().is_empty() {
        return Ok(Catalog::default());
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| GatewayError::UpstreamProtocolError(format!("Invalid catalog JSON: {}", e)))?;

    let entries = match value {
        Value::Array(entries) => entries,
        other => {
            return Err(GatewayError::UpstreamProtocolError(format!(
                "Expected a JSON array of channels, got {}",
                json_type_name(&other)
            )))
        }
    };

    let mut catalog = Catalog {
        channels: Vec::with_capacity(entries.len()),
        dropped: 0,
    };

    for entry in entries {
        match channel_from_entry(entry) {
            Some(channel) => catalog.channels.push(channel),
            None => catalog.dropped += 1,
        }
    }

    Ok(catalog)
}

fn channel_from_entry(entry: Value) -> Option<Channel> {
    let Value::Object(mut fields) = entry else {
        return None;
    };

    let id = match fields.remove("ch_id")? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if validate_channel_id(&id).is_err() {
        return None;
    }

    let stream_url_prefix = take_string(&mut fields, "ch_url")?;
    if !is_well_formed_stream_url(&stream_url_prefix) {
        return None;
    }

    Some(Channel {
        id,
        display_name: take_string(&mut fields, "ch_name").unwrap_or_default(),
        thumbnail_path: take_string(&mut fields, "img_url").unwrap_or_default(),
        stream_url_prefix,
    })
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key)? {
        Value::String(s) => Some(s),
        _ => None,
    }
}

/// Absolute http(s) URL with a host
fn is_well_formed_stream_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
