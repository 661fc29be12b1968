//! API Handlers
//!
//! HTTP request handlers for each lookup service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::cache::{shared_cache, SharedCache};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{LookupError, Result};
use crate::lookup::{ErrorLedger, LookupOrchestrator};
use crate::models::{Advertisement, HealthResponse, LookupResponse, StatsResponse};
use crate::providers::{CatalogProvider, HttpProvider};

/// Application state shared across all handlers.
///
/// The cache is shared with the orchestrator so handlers and the sweep task
/// see the same entries.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<LookupOrchestrator<Advertisement>>,
    pub cache: SharedCache<Advertisement>,
}

impl AppState {
    /// Creates a new AppState around an existing orchestrator and its cache.
    pub fn new(
        orchestrator: LookupOrchestrator<Advertisement>,
        cache: SharedCache<Advertisement>,
    ) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            cache,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Wires the wall clock, the HTTP primary provider and the catalogue
    /// secondary provider into a fresh orchestrator.
    pub fn from_config(config: &Config) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let cache: SharedCache<Advertisement> = shared_cache(clock.clone());

        let primary = HttpProvider::new(&config.primary_url, config.primary_timeout)?;
        let secondary = CatalogProvider::load(&config.catalog_path)
            .map_err(|e| LookupError::InvalidConfig(format!("catalog: {}", e)))?;
        info!("Secondary catalog holds {} advertisements", secondary.len());

        let orchestrator = LookupOrchestrator::<Advertisement>::new(
            config.lookup_settings(),
            clock,
            cache.clone(),
            Arc::new(primary),
            Arc::new(secondary),
            ErrorLedger::new(),
        )?;

        Ok(Self::new(orchestrator, cache))
    }
}

/// Handler for GET /adv/:id
///
/// Resolves an advertisement through cache, primary and secondary tiers.
pub async fn lookup_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LookupResponse>> {
    if id.trim().is_empty() {
        return Err(LookupError::InvalidRequest("id cannot be blank".to_string()));
    }

    match state.orchestrator.resolve(&id).await? {
        Some(resolved) => Ok(Json(LookupResponse::new(id, resolved))),
        None => Err(LookupError::NotFound(id)),
    }
}

/// Handler for GET /stats
///
/// Returns cache, lookup and circuit breaker statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache_stats = state.cache.read().await.stats();
    let diagnostics = state.orchestrator.diagnostics().await;

    Json(StatsResponse::new(
        cache_stats,
        diagnostics.stats,
        diagnostics.ledger_size,
        diagnostics.circuit_open,
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
