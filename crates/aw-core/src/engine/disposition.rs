//! Disposition coordination: single reviews and bulk actions.

use super::GovernanceEngine;
use crate::asset::{Asset, AssetStatus, LifecycleOp, Review, ReviewDecision};
use crate::audit::{AuditAction, AuditLogEntry};
use crate::auth::{require_min_role, Role, User};
use crate::error::EngineError;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

/// Maximum number of assets in one bulk disposition.
pub const MAX_BULK_SIZE: usize = 50;

/// Result of a single disposition.
#[derive(Debug, serde::Serialize)]
pub struct ReviewOutcome {
    pub asset: Asset,
    pub review: Review,
}

/// Result of a bulk disposition.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct BulkOutcome {
    /// Assets actually transitioned. Requested ids that were not in a
    /// reviewable status are skipped, not failed.
    pub affected: u64,
}

fn action_for(decision: ReviewDecision) -> AuditAction {
    match decision.target_status() {
        AssetStatus::Approved => AuditAction::AssetApproved,
        _ => AuditAction::AssetRejected,
    }
}

fn validate_bulk_ids(ids: &[Uuid]) -> Result<(), EngineError> {
    if ids.is_empty() {
        return Err(EngineError::BadRequest(
            "At least one asset id is required".to_string(),
        ));
    }
    if ids.len() > MAX_BULK_SIZE {
        return Err(EngineError::BadRequest(format!(
            "At most {MAX_BULK_SIZE} assets per bulk action"
        )));
    }
    Ok(())
}

impl GovernanceEngine {
    /// Records one reviewer's disposition of one asset.
    ///
    /// The review row, the status change, and the audit entry land in
    /// a single transaction, conditional on the asset still being
    /// reviewable at write time.
    #[instrument(
        skip(self, actor, comments),
        fields(asset_id = %asset_id, actor = %actor.id, decision = %decision)
    )]
    pub async fn review(
        &self,
        actor: &User,
        asset_id: Uuid,
        decision: ReviewDecision,
        comments: Option<String>,
    ) -> Result<ReviewOutcome, EngineError> {
        require_min_role(actor, Role::Reviewer)?;

        let asset = self.load_asset(asset_id).await?;
        if !asset.status.is_reviewable() {
            return Err(EngineError::invalid_transition(
                asset.status,
                LifecycleOp::Review,
                "Only pending or in-review assets can be reviewed",
            ));
        }

        let new_status = decision.target_status();
        let review = Review::new(asset_id, actor.id, decision, comments);
        let entry = AuditLogEntry::for_asset(
            action_for(decision),
            asset_id,
            actor,
            json!({
                "decision": decision,
                "comments": review.comments,
                "previous_status": asset.status,
                "new_status": new_status,
            }),
        );

        match self.assets.record_review(&review, new_status, &entry).await? {
            Some(asset) => {
                info!(status = %asset.status, "disposition recorded");
                Ok(ReviewOutcome { asset, review })
            }
            None => Err(self
                .explain_failed_transition(
                    asset_id,
                    LifecycleOp::Review,
                    "Only pending or in-review assets can be reviewed",
                )
                .await),
        }
    }

    /// Approves every reviewable asset among `ids`.
    #[instrument(skip(self, actor, ids, comments), fields(actor = %actor.id, requested = ids.len()))]
    pub async fn bulk_approve(
        &self,
        actor: &User,
        ids: &[Uuid],
        comments: Option<String>,
    ) -> Result<BulkOutcome, EngineError> {
        validate_bulk_ids(ids)?;
        require_min_role(actor, Role::Admin)?;
        self.bulk_disposition(actor, ids, ReviewDecision::Approved, comments)
            .await
    }

    /// Rejects every reviewable asset among `ids`. A non-empty reason
    /// is required and recorded as the review comment.
    #[instrument(skip(self, actor, ids, reason), fields(actor = %actor.id, requested = ids.len()))]
    pub async fn bulk_reject(
        &self,
        actor: &User,
        ids: &[Uuid],
        reason: &str,
    ) -> Result<BulkOutcome, EngineError> {
        validate_bulk_ids(ids)?;
        if reason.trim().is_empty() {
            return Err(EngineError::BadRequest(
                "A rejection reason is required".to_string(),
            ));
        }
        require_min_role(actor, Role::Admin)?;
        self.bulk_disposition(actor, ids, ReviewDecision::Rejected, Some(reason.to_string()))
            .await
    }

    async fn bulk_disposition(
        &self,
        actor: &User,
        ids: &[Uuid],
        decision: ReviewDecision,
        comments: Option<String>,
    ) -> Result<BulkOutcome, EngineError> {
        let qualifying = self.assets.list_reviewable(ids).await?;
        if qualifying.is_empty() {
            return Err(EngineError::BadRequest(
                "No requested assets are in a reviewable status".to_string(),
            ));
        }

        let new_status = decision.target_status();
        let batch_size = qualifying.len();
        let mut reviews = Vec::with_capacity(batch_size);
        let mut entries = Vec::with_capacity(batch_size);
        for asset in &qualifying {
            let review = Review::new(asset.id, actor.id, decision, comments.clone());
            entries.push(AuditLogEntry::for_asset(
                action_for(decision),
                asset.id,
                actor,
                json!({
                    "decision": decision,
                    "comments": review.comments,
                    "previous_status": asset.status,
                    "new_status": new_status,
                    "bulk_action": true,
                    "batch_size": batch_size,
                }),
            ));
            reviews.push(review);
        }

        let affected = self
            .assets
            .record_bulk_reviews(&reviews, new_status, &entries)
            .await?;
        info!(affected, requested = ids.len(), "bulk disposition recorded");
        Ok(BulkOutcome { affected })
    }
}
