//! Engine error taxonomy.

use crate::asset::{AssetStatus, LifecycleOp};
use crate::db::DbError;
use thiserror::Error;

/// Typed failures surfaced by every governance operation.
///
/// None of these are retried internally; retry policy belongs to the
/// caller. A rejected operation never writes an audit entry.
#[derive(Error, Debug)]
pub enum EngineError {
    /// No resolvable (or active) actor identity.
    #[error("Unauthorized")]
    Unauthorized,

    /// Actor resolved but not allowed to perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Referenced entity does not exist.
    #[error("{entity} not found")]
    NotFound {
        /// Entity type, e.g. "Asset".
        entity: &'static str,
    },

    /// Malformed input, rejected before any store access.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// State-machine precondition violated.
    #[error("Invalid transition: cannot {op} asset in {status} status")]
    InvalidTransition {
        status: AssetStatus,
        op: LifecycleOp,
        /// Caller-facing explanation, e.g. "Only pending assets can be claimed".
        reason: String,
    },

    /// Lost a race against a concurrent writer; the store-level conditional
    /// update matched zero rows even though the entity exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Store failure.
    #[error("Database error: {0}")]
    Db(#[from] DbError),
}

impl EngineError {
    pub(crate) fn not_found(entity: &'static str) -> Self {
        EngineError::NotFound { entity }
    }

    pub(crate) fn invalid_transition(
        status: AssetStatus,
        op: LifecycleOp,
        reason: impl Into<String>,
    ) -> Self {
        EngineError::InvalidTransition {
            status,
            op,
            reason: reason.into(),
        }
    }
}
