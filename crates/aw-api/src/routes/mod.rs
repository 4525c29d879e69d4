//! API routes.

pub mod assets;
pub mod health;
pub mod reviewers;

use crate::state::AppState;
use axum::Router;

/// Creates the main API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .merge(health::routes())
        .with_state(state)
}

/// API routes under the /api prefix.
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/assets", assets::routes())
        .nest("/reviewers", reviewers::routes())
}
