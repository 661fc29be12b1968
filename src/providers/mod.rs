//! Providers Module
//!
//! Remote tiers consulted after a cache miss.
//!
//! # Tiers
//! - Primary: fast but unreliable, every error is treated as transient
//! - Secondary: reliable fallback of record, errors end the lookup

mod catalog;
mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use catalog::CatalogProvider;
pub use http::HttpProvider;

// == Provider Error ==
/// Failure raised by a provider while fetching.
///
/// `Ok(None)` is the "not found" answer; an error always means the provider
/// could not give an answer at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(String),
}

// == Primary Provider ==
/// Higher-latency provider that may fail transiently.
#[async_trait]
pub trait PrimaryProvider<V>: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<Option<V>, ProviderError>;
}

// == Secondary Provider ==
/// Always-available provider used as the last resort.
#[async_trait]
pub trait SecondaryProvider<V>: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<Option<V>, ProviderError>;
}
