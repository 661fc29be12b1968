//! Advertisement Lookup - read-through lookup service
//!
//! Resolves advertisements from an expiring cache, a retried primary provider
//! guarded by a circuit breaker, and a reliable secondary provider.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod lookup;
pub mod models;
pub mod providers;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use lookup::{LookupOrchestrator, LookupSettings};
pub use tasks::spawn_cleanup_task;
