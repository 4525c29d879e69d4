//! Connection pooling over the supported backends.

use super::DbError;
use std::time::Duration;

/// Escapes LIKE wildcards in a search term so it matches literally.
///
/// Queries using the result must declare `ESCAPE '\'`.
pub fn escape_like_pattern(term: &str) -> String {
    term.chars()
        .flat_map(|c| {
            let escape = matches!(c, '%' | '_' | '[' | ']' | '\\');
            escape.then_some('\\').into_iter().chain(Some(c))
        })
        .collect()
}

/// Builds a contains-anywhere LIKE pattern from an escaped term.
pub fn make_like_pattern(search: &str) -> String {
    format!("%{}%", escape_like_pattern(search))
}

#[cfg(feature = "database")]
use sqlx::{Pool, Postgres, Sqlite};

/// A pool for either supported backend. SQLite carries development
/// and tests; PostgreSQL carries production.
#[cfg(feature = "database")]
pub enum DbPool {
    Sqlite(Pool<Sqlite>),
    Postgres(Pool<Postgres>),
}

#[cfg(not(feature = "database"))]
pub struct DbPool;

/// Pool sizing and timeout knobs.
#[derive(Debug, Clone)]
pub struct PoolOptions {
    pub max_connections: u32,
    pub min_connections: u32,
    /// Maximum time to wait for a free connection.
    pub acquire_timeout: Duration,
    pub max_lifetime: Option<Duration>,
    pub idle_timeout: Option<Duration>,
}

fn env_parsed<T: std::str::FromStr>(name: &str, fallback: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(fallback)
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: env_parsed("AW_DB_MAX_CONNECTIONS", 20),
            min_connections: env_parsed("AW_DB_MIN_CONNECTIONS", 2),
            acquire_timeout: Duration::from_secs(env_parsed("AW_DB_ACQUIRE_TIMEOUT_SECS", 30)),
            max_lifetime: Some(Duration::from_secs(1800)),
            idle_timeout: Some(Duration::from_secs(600)),
        }
    }
}

/// Creates a connection pool from a database URL with default options.
///
/// The URL scheme selects the backend: `sqlite:` for SQLite,
/// `postgres://` or `postgresql://` for PostgreSQL.
#[cfg(feature = "database")]
pub async fn create_pool(database_url: &str) -> Result<DbPool, DbError> {
    create_pool_with_options(database_url, PoolOptions::default()).await
}

/// Creates a connection pool with explicit options.
#[cfg(feature = "database")]
pub async fn create_pool_with_options(
    database_url: &str,
    options: PoolOptions,
) -> Result<DbPool, DbError> {
    use tracing::info;

    if database_url.starts_with("sqlite:") {
        info!(max_connections = options.max_connections, "Opening SQLite pool");
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(options.max_connections)
            .min_connections(options.min_connections)
            .acquire_timeout(options.acquire_timeout)
            .max_lifetime(options.max_lifetime)
            .idle_timeout(options.idle_timeout)
            .connect(database_url)
            .await?;
        Ok(DbPool::Sqlite(pool))
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!(max_connections = options.max_connections, "Opening PostgreSQL pool");
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(options.max_connections)
            .min_connections(options.min_connections)
            .acquire_timeout(options.acquire_timeout)
            .max_lifetime(options.max_lifetime)
            .idle_timeout(options.idle_timeout)
            .connect(database_url)
            .await?;
        Ok(DbPool::Postgres(pool))
    } else {
        let scheme = database_url.split(':').next().unwrap_or("<empty>");
        Err(DbError::Configuration(format!(
            "Unsupported database URL scheme '{scheme}', expected sqlite: or postgres://"
        )))
    }
}

#[cfg(feature = "database")]
impl DbPool {
    /// Checks connectivity with a trivial query.
    pub async fn is_healthy(&self) -> bool {
        match self {
            DbPool::Sqlite(pool) => sqlx::query("SELECT 1").execute(pool).await.is_ok(),
            DbPool::Postgres(pool) => sqlx::query("SELECT 1").execute(pool).await.is_ok(),
        }
    }

    /// Current number of connections in the pool.
    pub fn pool_size(&self) -> u32 {
        match self {
            DbPool::Sqlite(pool) => pool.size(),
            DbPool::Postgres(pool) => pool.size(),
        }
    }

    /// Number of idle connections in the pool.
    pub fn idle_connections(&self) -> u32 {
        match self {
            DbPool::Sqlite(pool) => pool.num_idle() as u32,
            DbPool::Postgres(pool) => pool.num_idle() as u32,
        }
    }
}

#[cfg(feature = "database")]
impl Clone for DbPool {
    fn clone(&self) -> Self {
        match self {
            DbPool::Sqlite(pool) => DbPool::Sqlite(pool.clone()),
            DbPool::Postgres(pool) => DbPool::Postgres(pool.clone()),
        }
    }
}
