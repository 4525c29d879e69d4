//! Persistence error type.

use thiserror::Error;

/// Errors surfaced by the repositories and pool.
#[derive(Error, Debug)]
pub enum DbError {
    /// A row expected to exist was missing.
    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// Unique or foreign key constraint violated.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A stored value failed to parse back into its domain type.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Query execution failed.
    #[error("Query error: {0}")]
    Query(String),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(String),

    /// No free connection within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Bad database URL or pool settings.
    #[error("Invalid database configuration: {0}")]
    Configuration(String),
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "unknown".to_string(),
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::Constraint(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) => DbError::Query(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::Configuration(msg) => DbError::Configuration(msg.to_string()),
            other => DbError::Query(other.to_string()),
        }
    }
}

#[cfg(feature = "database")]
impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Serialization(err.to_string())
    }
}
