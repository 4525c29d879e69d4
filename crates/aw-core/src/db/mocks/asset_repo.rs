//! In-memory asset repository.
//!
//! Mirrors the conditional-update contract of the SQL implementations:
//! every transition checks the precondition and mutates under one write
//! lock, returns `Ok(None)` without side effects when the precondition
//! fails, and appends its audit entry only on success.

use super::MemoryStore;
use crate::asset::{
    Asset, AssetDetail, AssetStatus, QueueItem, Review, ReviewWithReviewer,
};
use crate::audit::AuditLogEntry;
use crate::auth::UserSummary;
use crate::db::asset_repo::{
    AssetRepository, QueueFilter, QueueSort, SortOrder, StatusCounts,
};
use crate::db::error::DbError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Mock implementation of AssetRepository over a shared [`MemoryStore`].
#[derive(Clone)]
pub struct MockAssetRepository {
    store: MemoryStore,
}

impl MockAssetRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

/// Comparable sort key matching the SQL `ORDER BY` expressions.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Time(DateTime<Utc>),
    Text(String),
}

fn sort_key(asset: &Asset, sort_by: QueueSort) -> SortKey {
    match sort_by {
        QueueSort::CreatedAt => SortKey::Time(asset.created_at),
        QueueSort::SubmittedAt => {
            SortKey::Time(asset.submitted_at.unwrap_or(asset.created_at))
        }
        QueueSort::Title => SortKey::Text(asset.title.clone()),
        QueueSort::Kind => SortKey::Text(asset.kind.as_str().to_string()),
    }
}

fn matches_filter(asset: &Asset, filter: &QueueFilter) -> bool {
    if let Some(statuses) = &filter.status {
        if !statuses.contains(&asset.status) {
            return false;
        }
    }
    if let Some(kinds) = &filter.kinds {
        if !kinds.contains(&asset.kind) {
            return false;
        }
    }
    if let Some(assignee_id) = filter.assignee_id {
        if asset.assignee_id != Some(assignee_id) {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let in_title = asset.title.to_lowercase().contains(&needle);
        let in_description = asset
            .description
            .as_deref()
            .map(|d| d.to_lowercase().contains(&needle))
            .unwrap_or(false);
        if !in_title && !in_description {
            return false;
        }
    }
    true
}

#[async_trait]
impl AssetRepository for MockAssetRepository {
    async fn create(&self, asset: &Asset, entry: &AuditLogEntry) -> Result<Asset, DbError> {
        let mut inner = self.store.inner.write().await;
        inner.assets.insert(asset.id, asset.clone());
        inner.audit.push(entry.clone());
        Ok(asset.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Asset>, DbError> {
        Ok(self.store.inner.read().await.assets.get(&id).cloned())
    }

    async fn get_detail(&self, id: Uuid) -> Result<Option<AssetDetail>, DbError> {
        let inner = self.store.inner.read().await;
        let Some(asset) = inner.assets.get(&id).cloned() else {
            return Ok(None);
        };
        let summary = |id: Uuid| -> Option<UserSummary> {
            inner.users.get(&id).map(|u| u.summary())
        };
        let mut reviews: Vec<ReviewWithReviewer> = inner
            .reviews
            .iter()
            .filter(|r| r.asset_id == id)
            .map(|r| ReviewWithReviewer {
                review: r.clone(),
                reviewer: summary(r.reviewer_id),
            })
            .collect();
        reviews.sort_by(|a, b| b.review.created_at.cmp(&a.review.created_at));
        Ok(Some(AssetDetail {
            owner: summary(asset.owner_id),
            assignee: asset.assignee_id.and_then(summary),
            reviews,
            asset,
        }))
    }

    async fn queue(
        &self,
        filter: &QueueFilter,
        fetch_limit: u32,
        cursor: Option<Uuid>,
    ) -> Result<Vec<QueueItem>, DbError> {
        let inner = self.store.inner.read().await;
        let mut matched: Vec<&Asset> = inner
            .assets
            .values()
            .filter(|a| matches_filter(a, filter))
            .collect();
        matched.sort_by(|a, b| {
            let ord = sort_key(a, filter.sort_by)
                .cmp(&sort_key(b, filter.sort_by))
                .then(a.id.cmp(&b.id));
            match filter.sort_order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        let start = match cursor {
            Some(cursor_id) => match matched.iter().position(|a| a.id == cursor_id) {
                Some(pos) => pos + 1,
                // Cursor row no longer matches the filter; same as the SQL
                // row-value comparison finding nothing after it.
                None => matched.len(),
            },
            None => 0,
        };
        let items = matched
            .into_iter()
            .skip(start)
            .take(fetch_limit as usize)
            .map(|asset| QueueItem {
                owner: inner.users.get(&asset.owner_id).map(|u| u.summary()),
                assignee: asset
                    .assignee_id
                    .and_then(|id| inner.users.get(&id).map(|u| u.summary())),
                review_count: inner
                    .reviews
                    .iter()
                    .filter(|r| r.asset_id == asset.id)
                    .count() as u64,
                asset: asset.clone(),
            })
            .collect();
        Ok(items)
    }

    async fn status_counts(&self) -> Result<StatusCounts, DbError> {
        let inner = self.store.inner.read().await;
        let mut counts = StatusCounts::default();
        for asset in inner.assets.values() {
            match asset.status {
                AssetStatus::PendingReview => counts.pending_review += 1,
                AssetStatus::InReview => counts.in_review += 1,
                AssetStatus::Approved => counts.approved += 1,
                AssetStatus::Rejected => counts.rejected += 1,
                AssetStatus::Draft | AssetStatus::Archived => {}
            }
        }
        Ok(counts)
    }

    async fn list_reviewable(&self, ids: &[Uuid]) -> Result<Vec<Asset>, DbError> {
        let inner = self.store.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.assets.get(id))
            .filter(|a| a.status.is_reviewable())
            .cloned()
            .collect())
    }

    async fn claim(
        &self,
        id: Uuid,
        assignee_id: Uuid,
        entry: &AuditLogEntry,
    ) -> Result<Option<Asset>, DbError> {
        let mut inner = self.store.inner.write().await;
        let Some(asset) = inner.assets.get_mut(&id) else {
            return Ok(None);
        };
        if asset.status != AssetStatus::PendingReview {
            return Ok(None);
        }
        asset.status = AssetStatus::InReview;
        asset.assignee_id = Some(assignee_id);
        asset.updated_at = Utc::now();
        let updated = asset.clone();
        inner.audit.push(entry.clone());
        Ok(Some(updated))
    }

    async fn release(
        &self,
        id: Uuid,
        expected_assignee: Uuid,
        entry: &AuditLogEntry,
    ) -> Result<Option<Asset>, DbError> {
        let mut inner = self.store.inner.write().await;
        let Some(asset) = inner.assets.get_mut(&id) else {
            return Ok(None);
        };
        if asset.status != AssetStatus::InReview || asset.assignee_id != Some(expected_assignee) {
            return Ok(None);
        }
        asset.status = AssetStatus::PendingReview;
        asset.assignee_id = None;
        asset.updated_at = Utc::now();
        let updated = asset.clone();
        inner.audit.push(entry.clone());
        Ok(Some(updated))
    }

    async fn submit(
        &self,
        id: Uuid,
        submitted_at: DateTime<Utc>,
        entry: &AuditLogEntry,
    ) -> Result<Option<Asset>, DbError> {
        let mut inner = self.store.inner.write().await;
        let Some(asset) = inner.assets.get_mut(&id) else {
            return Ok(None);
        };
        if asset.status != AssetStatus::Draft {
            return Ok(None);
        }
        asset.status = AssetStatus::PendingReview;
        asset.submitted_at = Some(submitted_at);
        asset.updated_at = Utc::now();
        let updated = asset.clone();
        inner.audit.push(entry.clone());
        Ok(Some(updated))
    }

    async fn archive(&self, id: Uuid, entry: &AuditLogEntry) -> Result<Option<Asset>, DbError> {
        let mut inner = self.store.inner.write().await;
        let Some(asset) = inner.assets.get_mut(&id) else {
            return Ok(None);
        };
        if asset.status == AssetStatus::Archived {
            return Ok(None);
        }
        asset.status = AssetStatus::Archived;
        asset.assignee_id = None;
        asset.updated_at = Utc::now();
        let updated = asset.clone();
        inner.audit.push(entry.clone());
        Ok(Some(updated))
    }

    async fn restore(&self, id: Uuid, entry: &AuditLogEntry) -> Result<Option<Asset>, DbError> {
        let mut inner = self.store.inner.write().await;
        let Some(asset) = inner.assets.get_mut(&id) else {
            return Ok(None);
        };
        if asset.status != AssetStatus::Archived {
            return Ok(None);
        }
        asset.status = AssetStatus::Draft;
        asset.updated_at = Utc::now();
        let updated = asset.clone();
        inner.audit.push(entry.clone());
        Ok(Some(updated))
    }

    async fn record_review(
        &self,
        review: &Review,
        new_status: AssetStatus,
        entry: &AuditLogEntry,
    ) -> Result<Option<Asset>, DbError> {
        let mut inner = self.store.inner.write().await;
        let Some(asset) = inner.assets.get_mut(&review.asset_id) else {
            return Ok(None);
        };
        if !asset.status.is_reviewable() {
            return Ok(None);
        }
        asset.status = new_status;
        asset.assignee_id = None;
        asset.reviewed_at = Some(review.created_at);
        asset.updated_at = Utc::now();
        let updated = asset.clone();
        inner.reviews.push(review.clone());
        inner.audit.push(entry.clone());
        Ok(Some(updated))
    }

    async fn record_bulk_reviews(
        &self,
        reviews: &[Review],
        new_status: AssetStatus,
        entries: &[AuditLogEntry],
    ) -> Result<u64, DbError> {
        let mut inner = self.store.inner.write().await;
        let mut transitioned = 0u64;
        for (review, entry) in reviews.iter().zip(entries) {
            let Some(asset) = inner.assets.get_mut(&review.asset_id) else {
                continue;
            };
            if !asset.status.is_reviewable() {
                continue;
            }
            asset.status = new_status;
            asset.assignee_id = None;
            asset.reviewed_at = Some(review.created_at);
            asset.updated_at = Utc::now();
            inner.reviews.push(review.clone());
            inner.audit.push(entry.clone());
            transitioned += 1;
        }
        Ok(transitioned)
    }
}
