//! Claim/release coordination.
//!
//! A claim is an advisory lock: it routes work by marking the asset
//! IN_REVIEW with an assignee, but any reviewer may still record a
//! disposition. There is no lease or automatic expiry; a stuck claim
//! is released by the assignee or forced by an admin.

use super::{is_self_or_admin, GovernanceEngine};
use crate::asset::{Asset, AssetStatus, LifecycleOp};
use crate::audit::{AuditAction, AuditLogEntry};
use crate::auth::{require_min_role, Role, User};
use crate::error::EngineError;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

impl GovernanceEngine {
    /// Claims a pending asset for `actor`.
    ///
    /// The PENDING_REVIEW precondition rides inside the store's
    /// conditional update, so two concurrent claims cannot both
    /// succeed; the loser observes zero rows and gets `Conflict`.
    #[instrument(skip(self, actor), fields(asset_id = %asset_id, actor = %actor.id))]
    pub async fn claim(&self, actor: &User, asset_id: Uuid) -> Result<Asset, EngineError> {
        require_min_role(actor, Role::Reviewer)?;

        let entry = AuditLogEntry::for_asset(
            AuditAction::AssetReviewed,
            asset_id,
            actor,
            json!({
                "action": "claimed",
                "previous_status": AssetStatus::PendingReview,
                "new_status": AssetStatus::InReview,
            }),
        );

        match self.assets.claim(asset_id, actor.id, &entry).await? {
            Some(asset) => {
                info!(status = %asset.status, "asset claimed");
                Ok(asset)
            }
            None => Err(self.explain_claim_failure(asset_id).await),
        }
    }

    /// Releases a claimed asset back to the queue.
    ///
    /// Only the current assignee may release; an admin may force it.
    #[instrument(skip(self, actor), fields(asset_id = %asset_id, actor = %actor.id))]
    pub async fn release(&self, actor: &User, asset_id: Uuid) -> Result<Asset, EngineError> {
        require_min_role(actor, Role::Reviewer)?;

        let asset = self.load_asset(asset_id).await?;
        if asset.status != AssetStatus::InReview {
            return Err(EngineError::invalid_transition(
                asset.status,
                LifecycleOp::Release,
                "Only assets in review can be released",
            ));
        }
        let Some(assignee_id) = asset.assignee_id else {
            // InReview without an assignee should not happen; treat it
            // as a conflict rather than guessing.
            return Err(EngineError::Conflict(
                "Asset is in review but has no assignee".to_string(),
            ));
        };
        if !is_self_or_admin(actor, assignee_id) {
            return Err(EngineError::Forbidden(
                "Only the assignee or an admin can release this asset".to_string(),
            ));
        }

        let entry = AuditLogEntry::for_asset(
            AuditAction::AssetReviewed,
            asset_id,
            actor,
            json!({
                "action": "released",
                "previous_status": AssetStatus::InReview,
                "new_status": AssetStatus::PendingReview,
                "released_assignee": assignee_id,
            }),
        );

        match self.assets.release(asset_id, assignee_id, &entry).await? {
            Some(asset) => {
                info!(status = %asset.status, "asset released");
                Ok(asset)
            }
            None => Err(EngineError::Conflict(
                "Asset changed while releasing".to_string(),
            )),
        }
    }

    /// A zero-row claim either raced another claim or targeted an
    /// asset outside PENDING_REVIEW.
    async fn explain_claim_failure(&self, asset_id: Uuid) -> EngineError {
        match self.assets.get(asset_id).await {
            Ok(Some(asset)) if asset.status == AssetStatus::InReview => {
                EngineError::Conflict("Asset was claimed by another reviewer".to_string())
            }
            Ok(Some(asset)) => EngineError::invalid_transition(
                asset.status,
                LifecycleOp::Claim,
                "Only pending assets can be claimed",
            ),
            Ok(None) => EngineError::not_found("Asset"),
            Err(e) => EngineError::Db(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::harness::*;
    use super::*;

    #[tokio::test]
    async fn claim_moves_pending_to_in_review_and_assigns() {
        let (engine, store) = engine();
        let owner = user(&store, "carol", Role::Contributor).await;
        let reviewer = user(&store, "rita", Role::Reviewer).await;
        let a = asset(&store, "widget", AssetStatus::PendingReview, &owner).await;

        let claimed = engine.claim(&reviewer, a.id).await.unwrap();
        assert_eq!(claimed.status, AssetStatus::InReview);
        assert_eq!(claimed.assignee_id, Some(reviewer.id));

        let entries = store.audit_entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::AssetReviewed);
        assert_eq!(entries[0].metadata.as_ref().unwrap()["action"], "claimed");
    }

    #[tokio::test]
    async fn claim_requires_reviewer() {
        let (engine, store) = engine();
        let contributor = user(&store, "carol", Role::Contributor).await;
        let a = asset(&store, "widget", AssetStatus::PendingReview, &contributor).await;

        let err = engine.claim(&contributor, a.id).await.unwrap_err();
        assert!(matches!(err, EngineError::Forbidden(_)));
        assert!(store.audit_entries().await.is_empty());
    }

    #[tokio::test]
    async fn second_claim_loses_with_conflict() {
        let (engine, store) = engine();
        let owner = user(&store, "carol", Role::Contributor).await;
        let rita = user(&store, "rita", Role::Reviewer).await;
        let zoe = user(&store, "zoe", Role::Reviewer).await;
        let a = asset(&store, "widget", AssetStatus::PendingReview, &owner).await;

        engine.claim(&rita, a.id).await.unwrap();
        let err = engine.claim(&zoe, a.id).await.unwrap_err();
        assert!(matches!(err, EngineError::Conflict(_)));

        let current = store.asset(a.id).await.unwrap();
        assert_eq!(current.assignee_id, Some(rita.id));
        assert_eq!(store.audit_entries().await.len(), 1);
    }

    #[tokio::test]
    async fn claim_outside_pending_is_invalid_transition() {
        let (engine, store) = engine();
        let owner = user(&store, "carol", Role::Contributor).await;
        let reviewer = user(&store, "rita", Role::Reviewer).await;
        let a = asset(&store, "widget", AssetStatus::Approved, &owner).await;

        let err = engine.claim(&reviewer, a.id).await.unwrap_err();
        match err {
            EngineError::InvalidTransition { status, op, .. } => {
                assert_eq!(status, AssetStatus::Approved);
                assert_eq!(op, LifecycleOp::Claim);
            }
            other => panic!("expected InvalidTransition, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn claim_unknown_asset_is_not_found() {
        let (engine, store) = engine();
        let reviewer = user(&store, "rita", Role::Reviewer).await;
        let err = engine.claim(&reviewer, missing_id()).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[tokio::test]
    async fn assignee_can_release_back_to_pending() {
        let (engine, store) = engine();
        let owner = user(&store, "carol", Role::Contributor).await;
        let rita = user(&store, "rita", Role::Reviewer).await;
        let a = claimed_asset(&store, "widget", &owner, &rita).await;

        let released = engine.release(&rita, a.id).await.unwrap();
        assert_eq!(released.status, AssetStatus::PendingReview);
        assert_eq!(released.assignee_id, None);

        let entries = store.audit_entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].metadata.as_ref().unwrap()["action"], "released");
    }

    #[tokio::test]
    async fn non_assignee_reviewer_cannot_release() {
        let (engine, store) = engine();
        let owner = user(&store, "carol", Role::Contributor).await;
        let rita = user(&store, "rita", Role::Reviewer).await;
        let zoe = user(&store, "zoe", Role::Reviewer).await;
        let a = claimed_asset(&store, "widget", &owner, &rita).await;

        let err = engine.release(&zoe, a.id).await.unwrap_err();
        assert!(matches!(err, EngineError::Forbidden(_)));
        assert_eq!(
            store.asset(a.id).await.unwrap().assignee_id,
            Some(rita.id)
        );
    }

    #[tokio::test]
    async fn admin_can_force_release() {
        let (engine, store) = engine();
        let owner = user(&store, "carol", Role::Contributor).await;
        let rita = user(&store, "rita", Role::Reviewer).await;
        let admin = user(&store, "zoe", Role::Admin).await;
        let a = claimed_asset(&store, "widget", &owner, &rita).await;

        let released = engine.release(&admin, a.id).await.unwrap();
        assert_eq!(released.status, AssetStatus::PendingReview);
        assert_eq!(released.assignee_id, None);
    }

    #[tokio::test]
    async fn release_outside_in_review_is_invalid_transition() {
        let (engine, store) = engine();
        let owner = user(&store, "carol", Role::Contributor).await;
        let reviewer = user(&store, "rita", Role::Reviewer).await;
        let a = asset(&store, "widget", AssetStatus::PendingReview, &owner).await;

        let err = engine.release(&reviewer, a.id).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition {
                op: LifecycleOp::Release,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn claim_release_claim_round_trip() {
        let (engine, store) = engine();
        let owner = user(&store, "carol", Role::Contributor).await;
        let rita = user(&store, "rita", Role::Reviewer).await;
        let zoe = user(&store, "zoe", Role::Reviewer).await;
        let a = asset(&store, "widget", AssetStatus::PendingReview, &owner).await;

        engine.claim(&rita, a.id).await.unwrap();
        engine.release(&rita, a.id).await.unwrap();
        let reclaimed = engine.claim(&zoe, a.id).await.unwrap();
        assert_eq!(reclaimed.assignee_id, Some(zoe.id));
        assert_eq!(store.audit_entries().await.len(), 3);
    }
}
