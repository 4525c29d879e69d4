//! Authoring-side lifecycle transitions: create, submit, archive,
//! restore. Claiming and dispositions live in their own modules.

use super::{is_self_or_admin, GovernanceEngine};
use crate::asset::{Asset, AssetKind, AssetStatus, LifecycleOp};
use crate::audit::{AuditAction, AuditLogEntry};
use crate::auth::{require_min_role, Role, User};
use crate::error::EngineError;
use chrono::Utc;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

/// Maximum title length, in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Input for creating a draft asset.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub kind: AssetKind,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<serde_json::Value>,
    pub parent_id: Option<Uuid>,
}

fn validate_title(title: &str) -> Result<(), EngineError> {
    let len = title.chars().count();
    if title.trim().is_empty() {
        return Err(EngineError::BadRequest("Title is required".to_string()));
    }
    if len > MAX_TITLE_LEN {
        return Err(EngineError::BadRequest(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

impl GovernanceEngine {
    /// Creates a draft asset owned by `actor`.
    #[instrument(skip(self, actor, input), fields(actor = %actor.id, kind = %input.kind))]
    pub async fn create_asset(
        &self,
        actor: &User,
        input: NewAsset,
    ) -> Result<Asset, EngineError> {
        validate_title(&input.title)?;
        require_min_role(actor, Role::Contributor)?;

        let mut asset = Asset::new_draft(input.kind, input.title, actor.id);
        asset.description = input.description;
        asset.content = input.content;
        asset.parent_id = input.parent_id;

        let entry = AuditLogEntry::for_asset(
            AuditAction::AssetCreated,
            asset.id,
            actor,
            json!({
                "kind": asset.kind,
                "title": asset.title,
            }),
        );
        let created = self.assets.create(&asset, &entry).await?;
        info!(asset_id = %created.id, "asset created");
        Ok(created)
    }

    /// Submits a draft for review. Owner or admin only.
    #[instrument(skip(self, actor), fields(asset_id = %asset_id, actor = %actor.id))]
    pub async fn submit(&self, actor: &User, asset_id: Uuid) -> Result<Asset, EngineError> {
        require_min_role(actor, Role::Contributor)?;

        let asset = self.load_asset(asset_id).await?;
        if !is_self_or_admin(actor, asset.owner_id) {
            return Err(EngineError::Forbidden(
                "Only the owner or an admin can submit this asset".to_string(),
            ));
        }

        let submitted_at = Utc::now();
        let entry = AuditLogEntry::for_asset(
            AuditAction::AssetSubmitted,
            asset_id,
            actor,
            json!({
                "previous_status": AssetStatus::Draft,
                "new_status": AssetStatus::PendingReview,
            }),
        );

        match self.assets.submit(asset_id, submitted_at, &entry).await? {
            Some(asset) => {
                info!(status = %asset.status, "asset submitted for review");
                Ok(asset)
            }
            None => Err(self
                .explain_failed_transition(
                    asset_id,
                    LifecycleOp::Submit,
                    "Only draft assets can be submitted",
                )
                .await),
        }
    }

    /// Soft-archives an asset from any non-archived state. Admin only.
    #[instrument(skip(self, actor), fields(asset_id = %asset_id, actor = %actor.id))]
    pub async fn archive(&self, actor: &User, asset_id: Uuid) -> Result<Asset, EngineError> {
        require_min_role(actor, Role::Admin)?;

        let previous = self.load_asset(asset_id).await?;
        let entry = AuditLogEntry::for_asset(
            AuditAction::AssetArchived,
            asset_id,
            actor,
            json!({
                "previous_status": previous.status,
                "new_status": AssetStatus::Archived,
            }),
        );

        match self.assets.archive(asset_id, &entry).await? {
            Some(asset) => {
                info!("asset archived");
                Ok(asset)
            }
            None => Err(self
                .explain_failed_transition(
                    asset_id,
                    LifecycleOp::Archive,
                    "Asset is already archived",
                )
                .await),
        }
    }

    /// Restores an archived asset back to draft. Admin only.
    #[instrument(skip(self, actor), fields(asset_id = %asset_id, actor = %actor.id))]
    pub async fn restore(&self, actor: &User, asset_id: Uuid) -> Result<Asset, EngineError> {
        require_min_role(actor, Role::Admin)?;

        let entry = AuditLogEntry::for_asset(
            AuditAction::AssetRestored,
            asset_id,
            actor,
            json!({
                "previous_status": AssetStatus::Archived,
                "new_status": AssetStatus::Draft,
            }),
        );

        match self.assets.restore(asset_id, &entry).await? {
            Some(asset) => {
                info!("asset restored to draft");
                Ok(asset)
            }
            None => Err(self
                .explain_failed_transition(
                    asset_id,
                    LifecycleOp::Restore,
                    "Only archived assets can be restored",
                )
                .await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::harness::*;
    use super::*;

    fn draft_input(title: &str) -> NewAsset {
        NewAsset {
            kind: AssetKind::Design,
            title: title.to_string(),
            description: None,
            content: None,
            parent_id: None,
        }
    }

    #[tokio::test]
    async fn create_starts_as_draft_version_one() {
        let (engine, store) = engine();
        let carol = user(&store, "carol", Role::Contributor).await;

        let asset = engine
            .create_asset(&carol, draft_input("widget"))
            .await
            .unwrap();
        assert_eq!(asset.status, AssetStatus::Draft);
        assert_eq!(asset.version, 1);
        assert_eq!(asset.owner_id, carol.id);

        let entries = store.audit_entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::AssetCreated);
        assert_eq!(entries[0].asset_id, Some(asset.id));
    }

    #[tokio::test]
    async fn create_rejects_bad_titles_before_the_store() {
        let (engine, store) = engine();
        let carol = user(&store, "carol", Role::Contributor).await;

        let err = engine
            .create_asset(&carol, draft_input("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::BadRequest(_)));

        let err = engine
            .create_asset(&carol, draft_input(&"x".repeat(MAX_TITLE_LEN + 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::BadRequest(_)));
        assert!(store.audit_entries().await.is_empty());
    }

    #[tokio::test]
    async fn viewers_cannot_create() {
        let (engine, store) = engine();
        let viewer = user(&store, "vic", Role::Viewer).await;
        let err = engine
            .create_asset(&viewer, draft_input("widget"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Forbidden(_)));
    }

    #[tokio::test]
    async fn owner_submits_draft_for_review() {
        let (engine, store) = engine();
        let carol = user(&store, "carol", Role::Contributor).await;
        let a = asset(&store, "widget", AssetStatus::Draft, &carol).await;

        let submitted = engine.submit(&carol, a.id).await.unwrap();
        assert_eq!(submitted.status, AssetStatus::PendingReview);
        assert!(submitted.submitted_at.is_some());
        assert_eq!(
            store.audit_entries().await[0].action,
            AuditAction::AssetSubmitted
        );
    }

    #[tokio::test]
    async fn only_owner_or_admin_submits() {
        let (engine, store) = engine();
        let carol = user(&store, "carol", Role::Contributor).await;
        let other = user(&store, "omar", Role::Contributor).await;
        let admin = user(&store, "zoe", Role::Admin).await;
        let a = asset(&store, "widget", AssetStatus::Draft, &carol).await;

        let err = engine.submit(&other, a.id).await.unwrap_err();
        assert!(matches!(err, EngineError::Forbidden(_)));

        let submitted = engine.submit(&admin, a.id).await.unwrap();
        assert_eq!(submitted.status, AssetStatus::PendingReview);
    }

    #[tokio::test]
    async fn submit_outside_draft_is_invalid_transition() {
        let (engine, store) = engine();
        let carol = user(&store, "carol", Role::Contributor).await;
        let a = asset(&store, "widget", AssetStatus::PendingReview, &carol).await;

        let err = engine.submit(&carol, a.id).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition {
                op: LifecycleOp::Submit,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn archive_clears_assignee_and_is_reversible() {
        let (engine, store) = engine();
        let carol = user(&store, "carol", Role::Contributor).await;
        let rita = user(&store, "rita", Role::Reviewer).await;
        let admin = user(&store, "zoe", Role::Admin).await;
        let a = claimed_asset(&store, "widget", &carol, &rita).await;

        let archived = engine.archive(&admin, a.id).await.unwrap();
        assert_eq!(archived.status, AssetStatus::Archived);
        assert_eq!(archived.assignee_id, None);

        let err = engine.archive(&admin, a.id).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition {
                op: LifecycleOp::Archive,
                ..
            }
        ));

        let restored = engine.restore(&admin, a.id).await.unwrap();
        assert_eq!(restored.status, AssetStatus::Draft);

        let actions: Vec<_> = store
            .audit_entries()
            .await
            .iter()
            .map(|e| e.action)
            .collect();
        assert_eq!(
            actions,
            vec![AuditAction::AssetArchived, AuditAction::AssetRestored]
        );
    }

    #[tokio::test]
    async fn archive_and_restore_are_admin_only() {
        let (engine, store) = engine();
        let carol = user(&store, "carol", Role::Contributor).await;
        let rita = user(&store, "rita", Role::Reviewer).await;
        let a = asset(&store, "widget", AssetStatus::Approved, &carol).await;

        let err = engine.archive(&rita, a.id).await.unwrap_err();
        assert!(matches!(err, EngineError::Forbidden(_)));

        let err = engine.restore(&rita, a.id).await.unwrap_err();
        assert!(matches!(err, EngineError::Forbidden(_)));
    }

    #[tokio::test]
    async fn restore_of_non_archived_is_invalid_transition() {
        let (engine, store) = engine();
        let carol = user(&store, "carol", Role::Contributor).await;
        let admin = user(&store, "zoe", Role::Admin).await;
        let a = asset(&store, "widget", AssetStatus::Draft, &carol).await;

        let err = engine.restore(&admin, a.id).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTransition {
                op: LifecycleOp::Restore,
                ..
            }
        ));
    }
}
