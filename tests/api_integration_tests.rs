//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle through the router, with in-process
//! stand-ins for the primary and secondary providers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use adv_lookup::{
    api::create_router,
    cache::{shared_cache, SharedCache},
    clock::{Clock, SystemClock},
    lookup::{ErrorLedger, LookupOrchestrator, LookupSettings},
    models::Advertisement,
    providers::{PrimaryProvider, ProviderError, SecondaryProvider},
    AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

// == Stand-in Providers ==

/// How a stand-in provider answers every fetch.
enum Behavior {
    Found,
    Missing,
    Failing,
}

struct StubProvider {
    name: &'static str,
    behavior: Behavior,
    calls: AtomicUsize,
}

impl StubProvider {
    fn new(name: &'static str, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            name,
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer(&self, id: &str) -> Result<Option<Advertisement>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Found => Ok(Some(Advertisement::new(id, self.name, "integration"))),
            Behavior::Missing => Ok(None),
            Behavior::Failing => Err(ProviderError::Connection("refused".to_string())),
        }
    }
}

#[async_trait]
impl PrimaryProvider<Advertisement> for StubProvider {
    async fn fetch(&self, id: &str) -> Result<Option<Advertisement>, ProviderError> {
        self.answer(id)
    }
}

#[async_trait]
impl SecondaryProvider<Advertisement> for StubProvider {
    async fn fetch(&self, id: &str) -> Result<Option<Advertisement>, ProviderError> {
        self.answer(id)
    }
}

// == Helper Functions ==

fn create_test_app(
    primary: Arc<StubProvider>,
    secondary: Arc<StubProvider>,
    ledger: ErrorLedger,
) -> Router {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let cache: SharedCache<Advertisement> = shared_cache(clock.clone());
    let settings = LookupSettings {
        retry_count: 3,
        retry_delay: Duration::ZERO,
        error_threshold: 3,
        ..LookupSettings::default()
    };
    let orchestrator = LookupOrchestrator::<Advertisement>::new(
        settings,
        clock,
        cache.clone(),
        primary,
        secondary,
        ledger,
    )
    .unwrap();
    create_router(AppState::new(orchestrator, cache))
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// == Lookup Endpoint Tests ==

#[tokio::test]
async fn test_lookup_from_primary_then_cache() {
    let primary = StubProvider::new("primary", Behavior::Found);
    let secondary = StubProvider::new("secondary", Behavior::Found);
    let app = create_test_app(primary.clone(), secondary.clone(), ErrorLedger::new());

    let (status, json) = get_json(&app, "/adv/42").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], "42");
    assert_eq!(json["source"], "primary");
    assert_eq!(json["advertisement"]["web_id"], "42");
    assert_eq!(json["advertisement"]["name"], "primary");

    let (status, json) = get_json(&app, "/adv/42").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "cache");

    assert_eq!(primary.calls(), 1);
    assert_eq!(secondary.calls(), 0);
}

#[tokio::test]
async fn test_long_id_is_cached() {
    let primary = StubProvider::new("primary", Behavior::Found);
    let secondary = StubProvider::new("secondary", Behavior::Found);
    let app = create_test_app(primary.clone(), secondary, ErrorLedger::new());
    let uri = format!("/adv/{}", "a".repeat(300));

    let (status, _) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "cache");
    assert_eq!(primary.calls(), 1);
}

#[tokio::test]
async fn test_lookup_falls_back_after_primary_failures() {
    let primary = StubProvider::new("primary", Behavior::Failing);
    let secondary = StubProvider::new("secondary", Behavior::Found);
    let app = create_test_app(primary.clone(), secondary.clone(), ErrorLedger::new());

    let (status, json) = get_json(&app, "/adv/7").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "secondary");
    assert_eq!(primary.calls(), 3);
    assert_eq!(secondary.calls(), 1);
}

#[tokio::test]
async fn test_open_circuit_bypasses_primary() {
    let now = SystemClock.now();
    let ledger = ErrorLedger::with_failures((0..4).map(|_| now - chrono::Duration::minutes(10)));
    let primary = StubProvider::new("primary", Behavior::Found);
    let secondary = StubProvider::new("secondary", Behavior::Missing);
    let app = create_test_app(primary.clone(), secondary.clone(), ledger);

    let (status, json) = get_json(&app, "/adv/1").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains('1'));
    assert_eq!(primary.calls(), 0);
    assert_eq!(secondary.calls(), 1);

    let (_, stats) = get_json(&app, "/stats").await;
    assert_eq!(stats["circuit_open"], true);
    assert_eq!(stats["lookups"]["circuit_skips"], 1);
}

#[tokio::test]
async fn test_lookup_not_found() {
    let primary = StubProvider::new("primary", Behavior::Missing);
    let secondary = StubProvider::new("secondary", Behavior::Missing);
    let app = create_test_app(primary.clone(), secondary, ErrorLedger::new());

    let (status, json) = get_json(&app, "/adv/nonexistent").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());
    // Not found is never retried
    assert_eq!(primary.calls(), 1);
}

#[tokio::test]
async fn test_secondary_failure_is_bad_gateway() {
    let primary = StubProvider::new("primary", Behavior::Missing);
    let secondary = StubProvider::new("secondary", Behavior::Failing);
    let app = create_test_app(primary, secondary, ErrorLedger::new());

    let (status, json) = get_json(&app, "/adv/1").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("Secondary provider failed"));
}

// == Stats Endpoint Tests ==

#[tokio::test]
async fn test_stats_after_lookups() {
    let primary = StubProvider::new("primary", Behavior::Found);
    let secondary = StubProvider::new("secondary", Behavior::Found);
    let app = create_test_app(primary, secondary, ErrorLedger::new());

    get_json(&app, "/adv/1").await;
    get_json(&app, "/adv/1").await;
    get_json(&app, "/adv/2").await;

    let (status, json) = get_json(&app, "/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["lookups"]["lookups"], 3);
    assert_eq!(json["lookups"]["primary_hits"], 2);
    assert_eq!(json["lookups"]["cache_hits"], 1);
    assert_eq!(json["cache"]["total_entries"], 2);
    assert_eq!(json["ledger_size"], 0);
    assert_eq!(json["circuit_open"], false);
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(
        StubProvider::new("primary", Behavior::Missing),
        StubProvider::new("secondary", Behavior::Missing),
        ErrorLedger::new(),
    );

    let (status, json) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
