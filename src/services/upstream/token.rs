//! Stream token exchange
//!
//! Trades a channel id for a playable URL. Exactly one upstream request per
//! call: issued tokens are time-sensitive and a duplicate request may revoke
//! the previous one.

use reqwest::{header, Client};
use std::time::Duration;

use super::error::GatewayError;
use super::types::AuthCredential;
use crate::models::PlaybackTarget;

pub struct TokenExchanger {
    http: Client,
    token_host: String,
    stream_host_template: String,
    credential: AuthCredential,
    request_timeout: Duration,
}

impl TokenExchanger {
    pub fn new(
        http: Client,
        token_host: &str,
        stream_host_template: &str,
        credential: AuthCredential,
        request_timeout: Duration,
    ) -> Self {
        Self {
            http,
            token_host: token_host.trim_end_matches('/').to_string(),
            stream_host_template: stream_host_template.to_string(),
            credential,
            request_timeout,
        }
    }

    /// Upstream endpoint for a channel (`{host}/{ch_id}`)
    fn exchange_url(&self, channel_id: &str) -> String {
        format!("{}/{}", self.token_host, channel_id)
    }

    /// Perform the exchange. `channel_id` must already be validated.
    pub async fn exchange(&self, channel_id: &str) -> Result<PlaybackTarget, GatewayError> {
        let response = self
            .http
            .post(self.exchange_url(channel_id))
            .header(header::AUTHORIZATION, self.credential.header_value())
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout {
                        budget: self.request_timeout,
                    }
                } else {
                    GatewayError::transport(&e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::status(status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::transport(&e))?;

        Ok(PlaybackTarget {
            url: join_stream_url(&self.stream_host_template, &body),
        })
    }
}

/// Trim the upstream body and strip at most one leading `/`
pub fn normalize_fragment(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_prefix('/').unwrap_or(trimmed)
}

/// Append a normalized fragment to the stream host template.
///
/// An empty fragment yields the template with a single trailing `/`.
pub fn join_stream_url(template: &str, raw_fragment: &str) -> String {
    format!(
        "{}/{}",
        template.strip_suffix('/').unwrap_or(template),
        normalize_fragment(raw_fragment)
    )
}
