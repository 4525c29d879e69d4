//! In-memory audit repository.

use super::MemoryStore;
use crate::audit::{AuditEntryWithActor, AuditLogEntry};
use crate::db::audit_repo::AuditRepository;
use crate::db::error::DbError;
use crate::db::pagination::CursorPage;
use async_trait::async_trait;
use uuid::Uuid;

/// Mock implementation of AuditRepository over a shared [`MemoryStore`].
#[derive(Clone)]
pub struct MockAuditRepository {
    store: MemoryStore,
}

impl MockAuditRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuditRepository for MockAuditRepository {
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), DbError> {
        self.store.inner.write().await.audit.push(entry.clone());
        Ok(())
    }

    async fn trail_for_asset(
        &self,
        asset_id: Uuid,
        page: &CursorPage,
    ) -> Result<Vec<AuditEntryWithActor>, DbError> {
        let inner = self.store.inner.read().await;
        let mut trail: Vec<&AuditLogEntry> = inner
            .audit
            .iter()
            .filter(|e| e.asset_id == Some(asset_id))
            .collect();
        trail.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        let start = match page.cursor {
            Some(cursor_id) => match trail.iter().position(|e| e.id == cursor_id) {
                Some(pos) => pos + 1,
                None => trail.len(),
            },
            None => 0,
        };
        Ok(trail
            .into_iter()
            .skip(start)
            .take(page.fetch_limit() as usize)
            .map(|entry| AuditEntryWithActor {
                actor: entry
                    .actor_id
                    .and_then(|id| inner.users.get(&id).map(|u| u.summary())),
                entry: entry.clone(),
            })
            .collect())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<AuditLogEntry>, DbError> {
        let inner = self.store.inner.read().await;
        let mut all: Vec<AuditLogEntry> = inner.audit.clone();
        all.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        all.truncate(limit as usize);
        Ok(all)
    }
}
