//! Asset Warden core: a role-gated asset governance engine.
//!
//! Governed artifacts (designs, specifications, prototypes,
//! documentation) move through a fixed lifecycle from draft to a
//! reviewed disposition. Every state change is gated by a role policy,
//! validated by the lifecycle machine, and recorded in an append-only
//! audit trail in the same transaction as the change itself.
//!
//! The crate is organized as:
//!
//! - [`asset`]: data model and the lifecycle state machine
//! - [`auth`]: actor identity, role hierarchy, and the policy gate
//! - [`audit`]: audit action vocabulary and entry records
//! - [`engine`]: governance coordinators (queue, claim/release,
//!   dispositions, lifecycle transitions)
//! - [`db`]: sqlx repositories (SQLite and PostgreSQL) behind traits,
//!   plus in-memory mocks for tests
//!
//! Persistence is feature-gated behind `database` (on by default);
//! without it the domain types, state machine, and mocks remain usable.

pub mod asset;
pub mod audit;
pub mod auth;
pub mod db;
pub mod engine;
pub mod error;

pub use asset::{Asset, AssetDetail, AssetKind, AssetStatus, LifecycleOp, Review, ReviewDecision};
pub use audit::{AuditAction, AuditEntryWithActor, AuditLogEntry};
pub use auth::{require_min_role, Role, User, UserSummary};
pub use engine::GovernanceEngine;
pub use error::EngineError;
