//! Application state shared across handlers.

use aw_core::db::{DbPool, UserRepository};
use aw_core::GovernanceEngine;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The governance engine all handlers delegate to.
    pub engine: GovernanceEngine,
    /// User repository for actor resolution.
    pub users: Arc<dyn UserRepository>,
    /// Database pool; absent when the state is backed by mocks.
    pub db: Option<Arc<DbPool>>,
}

impl AppState {
    /// Creates application state backed by a database pool.
    pub fn from_pool(pool: DbPool) -> Self {
        Self {
            engine: GovernanceEngine::from_pool(&pool),
            users: aw_core::db::create_user_repository(&pool).into(),
            db: Some(Arc::new(pool)),
        }
    }

    /// Creates application state from explicit parts (mock-backed tests).
    pub fn new(engine: GovernanceEngine, users: Arc<dyn UserRepository>) -> Self {
        Self {
            engine,
            users,
            db: None,
        }
    }
}
