//! The approval queue.
//!
//! A reviewer-facing, filterable, cursor-paginated view over assets
//! with actionable work. The default scope is {PENDING_REVIEW,
//! IN_REVIEW}; terminal and draft assets appear only under an explicit
//! status filter.

use super::GovernanceEngine;
use crate::asset::{AssetStatus, QueueItem};
use crate::auth::{require_min_role, Role, User};
use crate::db::{CursorPage, QueueFilter, StatusCounts};
use crate::error::EngineError;
use tracing::instrument;
use uuid::Uuid;

/// A queue query: filter plus page bounds.
#[derive(Debug, Clone, Default)]
pub struct QueueRequest {
    pub filter: QueueFilter,
    pub page: CursorPage,
}

/// One page of the queue, with counts spanning the whole store.
#[derive(Debug, serde::Serialize)]
pub struct QueuePage {
    pub items: Vec<QueueItem>,
    /// Continuation token; present iff more rows match the filter.
    pub next_cursor: Option<Uuid>,
    /// Per-status totals, independent of filter and pagination.
    pub status_counts: StatusCounts,
}

impl GovernanceEngine {
    /// Lists the approval queue for `actor`.
    #[instrument(skip(self, actor, request), fields(actor = %actor.id))]
    pub async fn queue(
        &self,
        actor: &User,
        request: QueueRequest,
    ) -> Result<QueuePage, EngineError> {
        require_min_role(actor, Role::Reviewer)?;

        let mut filter = request.filter;
        if filter.status.is_none() {
            filter.status = Some(vec![AssetStatus::PendingReview, AssetStatus::InReview]);
        }

        let page = request.page;
        let mut items = self
            .assets
            .queue(&filter, page.fetch_limit(), page.cursor)
            .await?;
        let next_cursor = page.trim(&mut items, |item| item.asset.id);
        let status_counts = self.assets.status_counts().await?;

        Ok(QueuePage {
            items,
            next_cursor,
            status_counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::harness::*;
    use super::*;
    use crate::asset::AssetKind;
    use crate::db::{QueueSort, SortOrder};

    fn request(filter: QueueFilter, limit: u32, cursor: Option<Uuid>) -> QueueRequest {
        QueueRequest {
            filter,
            page: CursorPage::new(limit, cursor),
        }
    }

    #[tokio::test]
    async fn queue_requires_reviewer() {
        let (engine, store) = engine();
        let contributor = user(&store, "carol", Role::Contributor).await;
        let err = engine
            .queue(&contributor, QueueRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Forbidden(_)));
    }

    #[tokio::test]
    async fn default_scope_is_actionable_work_only() {
        let (engine, store) = engine();
        let owner = user(&store, "carol", Role::Contributor).await;
        let reviewer = user(&store, "rita", Role::Reviewer).await;
        asset(&store, "draft", AssetStatus::Draft, &owner).await;
        asset(&store, "pending", AssetStatus::PendingReview, &owner).await;
        asset(&store, "working", AssetStatus::InReview, &owner).await;
        asset(&store, "done", AssetStatus::Approved, &owner).await;

        let page = engine
            .queue(&reviewer, QueueRequest::default())
            .await
            .unwrap();
        let titles: Vec<&str> = page.items.iter().map(|i| i.asset.title.as_str()).collect();
        assert_eq!(titles.len(), 2);
        assert!(titles.contains(&"pending"));
        assert!(titles.contains(&"working"));
    }

    #[tokio::test]
    async fn explicit_status_filter_widens_the_scope() {
        let (engine, store) = engine();
        let owner = user(&store, "carol", Role::Contributor).await;
        let reviewer = user(&store, "rita", Role::Reviewer).await;
        asset(&store, "done", AssetStatus::Approved, &owner).await;
        asset(&store, "pending", AssetStatus::PendingReview, &owner).await;

        let filter = QueueFilter {
            status: Some(vec![AssetStatus::Approved]),
            ..Default::default()
        };
        let page = engine
            .queue(&reviewer, request(filter, 25, None))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].asset.title, "done");
    }

    #[tokio::test]
    async fn kind_and_search_filters_compose() {
        let (engine, store) = engine();
        let owner = user(&store, "carol", Role::Contributor).await;
        let reviewer = user(&store, "rita", Role::Reviewer).await;
        let mut spec =
            crate::asset::Asset::new_draft(AssetKind::Specification, "Pump Spec", owner.id);
        spec.status = AssetStatus::PendingReview;
        spec.description = Some("hydraulic pump".to_string());
        store.insert_asset(spec).await;
        asset(&store, "Pump Design", AssetStatus::PendingReview, &owner).await;

        let filter = QueueFilter {
            kinds: Some(vec![AssetKind::Specification]),
            search: Some("PUMP".to_string()),
            ..Default::default()
        };
        let page = engine
            .queue(&reviewer, request(filter, 25, None))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].asset.title, "Pump Spec");
    }

    #[tokio::test]
    async fn cursor_walks_the_queue_without_overlap() {
        let (engine, store) = engine();
        let owner = user(&store, "carol", Role::Contributor).await;
        let reviewer = user(&store, "rita", Role::Reviewer).await;
        for i in 0..5 {
            asset(
                &store,
                &format!("asset-{i}"),
                AssetStatus::PendingReview,
                &owner,
            )
            .await;
        }

        let filter = QueueFilter {
            sort_by: QueueSort::Title,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };

        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let page = engine
                .queue(&reviewer, request(filter.clone(), 2, cursor))
                .await
                .unwrap();
            assert!(page.items.len() <= 2);
            seen.extend(page.items.iter().map(|i| i.asset.title.clone()));
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        assert_eq!(
            seen,
            vec!["asset-0", "asset-1", "asset-2", "asset-3", "asset-4"]
        );
    }

    #[tokio::test]
    async fn status_counts_ignore_the_filter() {
        let (engine, store) = engine();
        let owner = user(&store, "carol", Role::Contributor).await;
        let reviewer = user(&store, "rita", Role::Reviewer).await;
        asset(&store, "pending", AssetStatus::PendingReview, &owner).await;
        asset(&store, "done", AssetStatus::Approved, &owner).await;
        asset(&store, "nope", AssetStatus::Rejected, &owner).await;

        let page = engine
            .queue(&reviewer, QueueRequest::default())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.status_counts.pending_review, 1);
        assert_eq!(page.status_counts.approved, 1);
        assert_eq!(page.status_counts.rejected, 1);
        assert_eq!(page.status_counts.in_review, 0);
    }

    #[tokio::test]
    async fn assignee_filter_narrows_to_one_reviewer() {
        let (engine, store) = engine();
        let owner = user(&store, "carol", Role::Contributor).await;
        let rita = user(&store, "rita", Role::Reviewer).await;
        let zoe = user(&store, "zoe", Role::Reviewer).await;
        claimed_asset(&store, "mine", &owner, &rita).await;
        claimed_asset(&store, "theirs", &owner, &zoe).await;

        let filter = QueueFilter {
            assignee_id: Some(rita.id),
            ..Default::default()
        };
        let page = engine.queue(&rita, request(filter, 25, None)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].asset.title, "mine");
        assert_eq!(page.items[0].assignee.as_ref().unwrap().name, "rita");
    }
}
