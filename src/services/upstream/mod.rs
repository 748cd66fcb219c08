//! Upstream Access Layer
//!
//! Talks to the third-party channel provider on behalf of the HTTP front.
//!
//! # Overview
//!
//! The provider exposes two endpoints, both unreliable (self-signed TLS,
//! occasional outages, slow responses):
//!
//! - **Catalog**: a JSON array of channels, reachable over HTTPS or HTTP
//!   depending on deployment
//! - **Token**: `POST {host}/{ch_id}` with a Basic credential, answering with a
//!   plain-text path fragment that already carries the stream token
//!
//! This module provides:
//!
//! - **CatalogFetcher**: fetches and validates the catalog, retrying once on
//!   the next transport candidate when the first attempt fails at transport level
//! - **TokenExchanger**: single-attempt token exchange producing a playable URL
//! - **Gateway**: facade enforcing argument validation and the wall-clock budget
//!
//! Nothing here logs or caches. Every call is independent and returns either
//! a value or a [`GatewayError`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::services::upstream::Gateway;
//!
//! let gateway = Gateway::new(config.gateway_config())?;
//! let catalog = gateway.fetch_catalog().await?;
//! let target = gateway.exchange_token(&catalog.channels[0].id).await?;
//! ```

pub mod catalog;
pub mod error;
pub mod gateway;
pub mod token;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenience
pub use error::GatewayError;
pub use gateway::{Gateway, ALLOWED_METHODS};
pub use types::{AuthCredential, GatewayConfig};
