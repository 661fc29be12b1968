//! Lookup Orchestrator
//!
//! Decides which tier answers a lookup, retries the primary provider, trips
//! the circuit breaker and writes results through to the cache.
//!
//! # Concurrency
//! One lock per orchestrator is held for the whole lookup, provider calls and
//! retry pauses included. Lookups are fully serialized; this is the known
//! throughput ceiling of the design.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use super::{cache_key, ErrorLedger, ExpiryMode, LookupSettings, LookupStats, Resolved, Tier};
use crate::cache::ExpiringCache;
use crate::clock::Clock;
use crate::error::{LookupError, Result};
use crate::providers::{PrimaryProvider, SecondaryProvider};

/// State mutated only while the lookup lock is held.
#[derive(Debug, Default)]
struct LookupState {
    ledger: ErrorLedger,
    stats: LookupStats,
}

/// Point-in-time view of the orchestrator, read under a single lock.
#[derive(Debug, Clone)]
pub struct LookupDiagnostics {
    pub stats: LookupStats,
    /// Failures left in the ledger after pruning
    pub ledger_size: usize,
    pub circuit_open: bool,
}

// == Lookup Orchestrator ==
/// Resolves entities through cache, primary provider and secondary provider.
pub struct LookupOrchestrator<V> {
    cache: Arc<dyn ExpiringCache<V>>,
    primary: Arc<dyn PrimaryProvider<V>>,
    secondary: Arc<dyn SecondaryProvider<V>>,
    clock: Arc<dyn Clock>,
    retry_count: u32,
    retry_delay: Duration,
    error_threshold: usize,
    circuit_window: chrono::Duration,
    lead_time: chrono::Duration,
    expiry_mode: ExpiryMode,
    /// Expiry used by every write in `ExpiryMode::FixedAtStartup`
    startup_expiry: DateTime<Utc>,
    state: Mutex<LookupState>,
}

impl<V> LookupOrchestrator<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an orchestrator that owns `ledger` from now on.
    ///
    /// # Errors
    /// `LookupError::InvalidConfig` when `retry_count` is zero or a duration
    /// does not fit in the clock's date range.
    pub fn new(
        settings: LookupSettings,
        clock: Arc<dyn Clock>,
        cache: Arc<dyn ExpiringCache<V>>,
        primary: Arc<dyn PrimaryProvider<V>>,
        secondary: Arc<dyn SecondaryProvider<V>>,
        ledger: ErrorLedger,
    ) -> Result<Self> {
        if settings.retry_count == 0 {
            return Err(LookupError::InvalidConfig(
                "retry_count must be at least 1".to_string(),
            ));
        }
        let circuit_window = to_chrono("circuit_window", settings.circuit_window)?;
        let lead_time = to_chrono("cache_lead_time", settings.cache_lead_time)?;
        let startup_expiry = clock
            .offset(lead_time)
            .ok_or_else(|| out_of_range("cache_lead_time"))?;
        if clock.now().checked_sub_signed(circuit_window).is_none() {
            return Err(out_of_range("circuit_window"));
        }

        Ok(Self {
            cache,
            primary,
            secondary,
            clock,
            retry_count: settings.retry_count,
            retry_delay: settings.retry_delay,
            error_threshold: settings.error_threshold,
            circuit_window,
            lead_time,
            expiry_mode: settings.expiry_mode,
            startup_expiry,
            state: Mutex::new(LookupState {
                ledger,
                stats: LookupStats::new(),
            }),
        })
    }

    // == Lookup ==
    /// Returns the entity for `id`, or `None` when no tier has it.
    ///
    /// # Errors
    /// `LookupError::Secondary` when the secondary provider fails.
    pub async fn lookup(&self, id: &str) -> Result<Option<V>> {
        Ok(self.resolve(id).await?.map(|resolved| resolved.value))
    }

    // == Resolve ==
    /// Like [`lookup`](Self::lookup), also reporting which tier answered.
    pub async fn resolve(&self, id: &str) -> Result<Option<Resolved<V>>> {
        let mut state = self.state.lock().await;
        state.stats.record_lookup();
        let key = cache_key(id);

        if let Some(value) = self.cache.get(&key).await {
            debug!("Cache hit for {}", key);
            return Ok(Some(self.answered(&mut state, value, Tier::Cache)));
        }
        debug!("Cache miss for {}", key);

        let now = self.clock.now();
        if state
            .ledger
            .is_tripped(now, self.circuit_window, self.error_threshold)
        {
            warn!(
                "Circuit open: {} primary failures in window, routing {} to secondary",
                state.ledger.len(),
                id
            );
            state.stats.record_circuit_skip();
        } else if let Some(value) = self.fetch_primary(id, &mut state).await {
            self.write_through(&key, value.clone()).await;
            return Ok(Some(self.answered(&mut state, value, Tier::Primary)));
        }

        match self.secondary.fetch(id).await {
            Ok(Some(value)) => {
                self.write_through(&key, value.clone()).await;
                Ok(Some(self.answered(&mut state, value, Tier::Secondary)))
            }
            Ok(None) => {
                debug!("No tier has {}", id);
                state.stats.record_not_found();
                Ok(None)
            }
            Err(e) => {
                error!("Secondary provider failed for {}: {}", id, e);
                state.stats.record_secondary_failure();
                Err(LookupError::Secondary(e))
            }
        }
    }

    /// Tries the primary provider up to `retry_count` times.
    ///
    /// Stops at the first answer; `Ok(None)` is an answer and is not retried.
    async fn fetch_primary(&self, id: &str, state: &mut LookupState) -> Option<V> {
        for attempt in 1..=self.retry_count {
            match self.primary.fetch(id).await {
                Ok(Some(value)) => return Some(value),
                Ok(None) => {
                    debug!("Primary provider has no {}", id);
                    return None;
                }
                Err(e) => {
                    state.ledger.record(self.clock.now());
                    state.stats.record_primary_failure();
                    warn!(
                        "Primary fetch for {} failed (attempt {}/{}): {}",
                        id, attempt, self.retry_count, e
                    );
                    if attempt < self.retry_count {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }
        None
    }

    async fn write_through(&self, key: &str, value: V) {
        let expires_at = match self.expiry_mode {
            ExpiryMode::FixedAtStartup => self.startup_expiry,
            ExpiryMode::Sliding => self
                .clock
                .offset(self.lead_time)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.cache.set(key, value, expires_at).await;
    }

    fn answered(&self, state: &mut LookupState, value: V, tier: Tier) -> Resolved<V> {
        state.stats.record_answer(tier);
        Resolved { value, tier }
    }

    // == Diagnostics ==
    /// Whether the next lookup would skip the primary provider.
    pub async fn circuit_open(&self) -> bool {
        let mut state = self.state.lock().await;
        let now = self.clock.now();
        state
            .ledger
            .is_tripped(now, self.circuit_window, self.error_threshold)
    }

    /// Stats, ledger size and circuit state taken together.
    ///
    /// The circuit is evaluated first, so the ledger size excludes failures
    /// that have aged out of the window.
    pub async fn diagnostics(&self) -> LookupDiagnostics {
        let mut state = self.state.lock().await;
        let now = self.clock.now();
        let circuit_open = state
            .ledger
            .is_tripped(now, self.circuit_window, self.error_threshold);

        LookupDiagnostics {
            stats: state.stats.clone(),
            ledger_size: state.ledger.len(),
            circuit_open,
        }
    }

    /// Failure timestamps currently held by the ledger, oldest first.
    pub async fn ledger_snapshot(&self) -> Vec<DateTime<Utc>> {
        self.state.lock().await.ledger.snapshot()
    }

    pub async fn stats(&self) -> LookupStats {
        self.state.lock().await.stats.clone()
    }

    /// Expiry given to cache writes in `ExpiryMode::FixedAtStartup`.
    pub fn startup_expiry(&self) -> DateTime<Utc> {
        self.startup_expiry
    }
}

fn to_chrono(name: &str, duration: Duration) -> Result<chrono::Duration> {
    chrono::Duration::from_std(duration).map_err(|_| out_of_range(name))
}

fn out_of_range(name: &str) -> LookupError {
    LookupError::InvalidConfig(format!("{} is out of range", name))
}
