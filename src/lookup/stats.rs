//! Lookup Statistics Module
//!
//! Counts how lookups were answered.

use serde::Serialize;

use super::Tier;

// == Lookup Stats ==
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LookupStats {
    /// Number of lookups started
    pub lookups: u64,
    /// Lookups answered from the cache
    pub cache_hits: u64,
    /// Lookups answered by the primary provider
    pub primary_hits: u64,
    /// Lookups answered by the secondary provider
    pub secondary_hits: u64,
    /// Lookups where no tier had the entity
    pub not_found: u64,
    /// Transient primary failures, one per failed attempt
    pub primary_failures: u64,
    /// Lookups that skipped the primary tier because the circuit was open
    pub circuit_skips: u64,
    /// Lookups that ended with a secondary provider failure
    pub secondary_failures: u64,
}

impl LookupStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_lookup(&mut self) {
        self.lookups += 1;
    }

    /// Records which tier answered a lookup.
    pub fn record_answer(&mut self, tier: Tier) {
        match tier {
            Tier::Cache => self.cache_hits += 1,
            Tier::Primary => self.primary_hits += 1,
            Tier::Secondary => self.secondary_hits += 1,
        }
    }

    pub fn record_not_found(&mut self) {
        self.not_found += 1;
    }

    pub fn record_primary_failure(&mut self) {
        self.primary_failures += 1;
    }

    pub fn record_circuit_skip(&mut self) {
        self.circuit_skips += 1;
    }

    pub fn record_secondary_failure(&mut self) {
        self.secondary_failures += 1;
    }
}
