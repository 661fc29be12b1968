//! Lookup Module
//!
//! Read-through resolution of an entity by id across three tiers:
//! the expiring cache, the primary provider and the secondary provider.
//!
//! # Flow
//! ```text
//! lookup(id)
//!     → cache hit: done
//!     → circuit open (too many fresh primary failures): secondary
//!     → primary with retries: found → write cache, done
//!                             not found / retries exhausted → secondary
//!     → secondary: found → write cache, done; not found → absent
//! ```

mod ledger;
mod orchestrator;
mod stats;


use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

pub use ledger::ErrorLedger;
pub use orchestrator::{LookupDiagnostics, LookupOrchestrator};
pub use stats::LookupStats;

/// Prefix that namespaces orchestrator entries in a shared cache.
pub const CACHE_KEY_PREFIX: &str = "AdvKey_";

/// Cache key under which the entity `id` is stored.
pub fn cache_key(id: &str) -> String {
    format!("{}{}", CACHE_KEY_PREFIX, id)
}

// == Tier ==
/// Which tier produced a lookup result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Cache,
    Primary,
    Secondary,
}

/// A value together with the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<V> {
    pub value: V,
    pub tier: Tier,
}

// == Expiry Mode ==
/// How the expiry of newly cached entries is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryMode {
    /// One expiry instant, construction time plus lead time, for every write
    #[default]
    FixedAtStartup,
    /// Each write expires lead time after it happens
    Sliding,
}

impl FromStr for ExpiryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" | "fixed_at_startup" => Ok(ExpiryMode::FixedAtStartup),
            "sliding" => Ok(ExpiryMode::Sliding),
            other => Err(format!("unknown cache expiry mode '{}'", other)),
        }
    }
}

// == Lookup Settings ==
/// Immutable orchestrator settings, read once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupSettings {
    /// Primary attempts per lookup, at least 1
    pub retry_count: u32,
    /// Pause between primary attempts
    pub retry_delay: Duration,
    /// Fresh failures tolerated before the circuit opens
    pub error_threshold: usize,
    /// Lifetime given to cached entries
    pub cache_lead_time: Duration,
    /// How far back primary failures count towards the circuit
    pub circuit_window: Duration,
    pub expiry_mode: ExpiryMode,
}

/// Failures older than this no longer count towards the circuit.
pub const DEFAULT_CIRCUIT_WINDOW: Duration = Duration::from_secs(60 * 60);

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            retry_count: 3,
            retry_delay: Duration::from_millis(1000),
            error_threshold: 10,
            cache_lead_time: Duration::from_secs(5 * 60),
            circuit_window: DEFAULT_CIRCUIT_WINDOW,
            expiry_mode: ExpiryMode::FixedAtStartup,
        }
    }
}
