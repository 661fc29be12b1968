//! Cache Module
//!
//! Time-expiring key/value cache consulted as the first lookup tier.

mod entry;
mod stats;
mod store;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::warn;

use crate::clock::Clock;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Expiring Cache Trait ==
/// Key/value store with a per-entry absolute expiry.
///
/// `get` only returns entries whose expiry is still in the future. `set`
/// replaces both value and expiry as a single step.
#[async_trait]
pub trait ExpiringCache<V>: Send + Sync {
    async fn get(&self, key: &str) -> Option<V>;

    async fn set(&self, key: &str, value: V, expires_at: DateTime<Utc>);
}

/// Cache store shared between the orchestrator, HTTP handlers and the sweep task.
pub type SharedCache<V> = Arc<RwLock<CacheStore<V>>>;

/// Creates an empty shared cache driven by `clock`.
pub fn shared_cache<V: Clone>(clock: Arc<dyn Clock>) -> SharedCache<V> {
    Arc::new(RwLock::new(CacheStore::new(clock)))
}

#[async_trait]
impl<V> ExpiringCache<V> for RwLock<CacheStore<V>>
where
    V: Clone + Send + Sync,
{
    async fn get(&self, key: &str) -> Option<V> {
        // Write lock: reads update stats and evict expired entries
        self.write().await.get(key).ok()
    }

    async fn set(&self, key: &str, value: V, expires_at: DateTime<Utc>) {
        if let Err(e) = self.write().await.set(key.to_string(), value, expires_at) {
            warn!("Dropping cache write for '{}': {}", key, e);
        }
    }
}
