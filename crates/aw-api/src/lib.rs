//! HTTP API for the asset governance engine.
//!
//! Exposes the lifecycle, review queue, and disposition operations of
//! [`aw_core::GovernanceEngine`] over a REST surface built on axum, with
//! OpenAPI documentation served via Swagger UI.

pub mod auth;
pub mod dto;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::{ApiServer, ApiServerConfig};
pub use state::AppState;
