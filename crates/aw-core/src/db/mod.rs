//! Database layer for Asset Warden.
//!
//! Persistence for assets, reviews, audit log entries, and users using
//! SQLx, with SQLite for development and PostgreSQL for production.
//! Repositories are trait objects so the engine can run against in-memory
//! mocks in tests.

mod error;
pub mod mocks;
mod pagination;
mod pool;
mod schema;

pub mod asset_repo;
pub mod audit_repo;
pub mod seed;
pub mod user_repo;

pub use error::DbError;
pub use pagination::{CursorPage, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use pool::{escape_like_pattern, make_like_pattern, DbPool, PoolOptions};
pub use schema::run_migrations;

#[cfg(feature = "database")]
pub use pool::{create_pool, create_pool_with_options};

pub use asset_repo::{AssetRepository, QueueFilter, QueueSort, SortOrder, StatusCounts};
pub use audit_repo::AuditRepository;
pub use user_repo::UserRepository;

#[cfg(feature = "database")]
pub use asset_repo::create_asset_repository;
#[cfg(feature = "database")]
pub use audit_repo::create_audit_repository;
#[cfg(feature = "database")]
pub use user_repo::create_user_repository;

pub use seed::ensure_admin_user;
