//! Response DTOs for the lookup service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use super::Advertisement;
use crate::cache::CacheStats;
use crate::lookup::{LookupStats, Resolved, Tier};

/// Response body for GET /adv/:id
#[derive(Debug, Clone, Serialize)]
pub struct LookupResponse {
    /// The requested id
    pub id: String,
    /// Tier that produced the advertisement
    pub source: Tier,
    pub advertisement: Advertisement,
}

impl LookupResponse {
    pub fn new(id: impl Into<String>, resolved: Resolved<Advertisement>) -> Self {
        Self {
            id: id.into(),
            source: resolved.tier,
            advertisement: resolved.value,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub cache: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub cache_hit_rate: f64,
    pub lookups: LookupStats,
    /// Primary failures currently inside the circuit window
    pub ledger_size: usize,
    /// Whether lookups currently bypass the primary provider
    pub circuit_open: bool,
}

impl StatsResponse {
    pub fn new(cache: CacheStats, lookups: LookupStats, ledger_size: usize, circuit_open: bool) -> Self {
        Self {
            cache_hit_rate: cache.hit_rate(),
            cache,
            lookups,
            ledger_size,
            circuit_open,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
