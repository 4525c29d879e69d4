//! In-memory repository implementations for testing.
//!
//! The three mock repositories share one [`MemoryStore`] so tests can
//! observe cross-entity effects (a claim writing its audit entry, a bulk
//! disposition inserting reviews) the way they happen against a real
//! database.

mod asset_repo;
mod audit_repo;
mod user_repo;

pub use asset_repo::MockAssetRepository;
pub use audit_repo::MockAuditRepository;
pub use user_repo::MockUserRepository;

use crate::asset::{Asset, Review};
use crate::audit::AuditLogEntry;
use crate::auth::User;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub(crate) struct StoreInner {
    pub assets: HashMap<Uuid, Asset>,
    pub reviews: Vec<Review>,
    pub audit: Vec<AuditLogEntry>,
    pub users: HashMap<Uuid, User>,
}

/// Shared in-memory backing store for the mock repositories.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub(crate) inner: Arc<RwLock<StoreInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock repositories over this store.
    pub fn asset_repo(&self) -> MockAssetRepository {
        MockAssetRepository::new(self.clone())
    }

    pub fn audit_repo(&self) -> MockAuditRepository {
        MockAuditRepository::new(self.clone())
    }

    pub fn user_repo(&self) -> MockUserRepository {
        MockUserRepository::new(self.clone())
    }

    /// Inserts a user directly, bypassing repositories.
    pub async fn insert_user(&self, user: User) {
        self.inner.write().await.users.insert(user.id, user);
    }

    /// Inserts an asset directly, bypassing repositories.
    pub async fn insert_asset(&self, asset: Asset) {
        self.inner.write().await.assets.insert(asset.id, asset);
    }

    /// Snapshot of an asset's current state.
    pub async fn asset(&self, id: Uuid) -> Option<Asset> {
        self.inner.read().await.assets.get(&id).cloned()
    }

    /// Snapshot of all audit entries, in insertion order.
    pub async fn audit_entries(&self) -> Vec<AuditLogEntry> {
        self.inner.read().await.audit.clone()
    }

    /// Snapshot of all reviews, in insertion order.
    pub async fn reviews(&self) -> Vec<Review> {
        self.inner.read().await.reviews.clone()
    }
}
