//! Entity and response models for the lookup service
//!
//! This module defines the advertisement entity and the DTOs used for
//! serializing HTTP response bodies.

pub mod advertisement;
pub mod responses;

// Re-export commonly used types
pub use advertisement::Advertisement;
pub use responses::{ErrorResponse, HealthResponse, LookupResponse, StatsResponse};
