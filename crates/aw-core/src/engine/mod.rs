//! Governance coordinators.
//!
//! [`GovernanceEngine`] owns the repositories and sequences every
//! operation the same way: role gate, input validation, then a
//! conditional store mutation that writes its audit entry in the same
//! transaction. Role enforcement lives here, not at the HTTP boundary,
//! so the rules hold for any caller.

mod claim;
mod disposition;
mod lifecycle;
mod queue;

pub use disposition::{BulkOutcome, ReviewOutcome, MAX_BULK_SIZE};
pub use lifecycle::{NewAsset, MAX_TITLE_LEN};
pub use queue::{QueuePage, QueueRequest};

use crate::asset::{Asset, AssetDetail, LifecycleOp};
use crate::audit::AuditEntryWithActor;
use crate::auth::{require_min_role, Role, User};
use crate::db::{
    AssetRepository, AuditRepository, CursorPage, UserRepository,
};
use crate::error::EngineError;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Paged slice of an asset's audit trail, newest first.
#[derive(Debug, serde::Serialize)]
pub struct TrailPage {
    pub entries: Vec<AuditEntryWithActor>,
    pub next_cursor: Option<Uuid>,
}

/// The governance engine: repositories plus the coordinators in this
/// module's submodules.
#[derive(Clone)]
pub struct GovernanceEngine {
    assets: Arc<dyn AssetRepository>,
    audit: Arc<dyn AuditRepository>,
    users: Arc<dyn UserRepository>,
}

impl GovernanceEngine {
    pub fn new(
        assets: Arc<dyn AssetRepository>,
        audit: Arc<dyn AuditRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            assets,
            audit,
            users,
        }
    }

    /// Builds an engine with repositories backed by `pool`.
    #[cfg(feature = "database")]
    pub fn from_pool(pool: &crate::db::DbPool) -> Self {
        Self {
            assets: crate::db::create_asset_repository(pool).into(),
            audit: crate::db::create_audit_repository(pool).into(),
            users: crate::db::create_user_repository(pool).into(),
        }
    }

    /// Gets an asset with owner/assignee summaries and review history.
    #[instrument(skip(self, actor), fields(asset_id = %asset_id, actor = %actor.id))]
    pub async fn get_asset(
        &self,
        actor: &User,
        asset_id: Uuid,
    ) -> Result<AssetDetail, EngineError> {
        require_min_role(actor, Role::Reviewer)?;
        self.assets
            .get_detail(asset_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Asset"))
    }

    /// Pages through an asset's audit trail, newest first.
    #[instrument(skip(self, actor, page), fields(asset_id = %asset_id, actor = %actor.id))]
    pub async fn audit_trail(
        &self,
        actor: &User,
        asset_id: Uuid,
        page: CursorPage,
    ) -> Result<TrailPage, EngineError> {
        require_min_role(actor, Role::Reviewer)?;
        if self.assets.get(asset_id).await?.is_none() {
            return Err(EngineError::not_found("Asset"));
        }
        let mut entries = self.audit.trail_for_asset(asset_id, &page).await?;
        let next_cursor = page.trim(&mut entries, |e| e.entry.id);
        Ok(TrailPage {
            entries,
            next_cursor,
        })
    }

    /// Lists active users who can work the queue, ordered by name.
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn reviewers(&self, actor: &User) -> Result<Vec<User>, EngineError> {
        require_min_role(actor, Role::Reviewer)?;
        Ok(self.users.list_reviewers().await?)
    }

    /// Loads an asset or fails with `NotFound`.
    async fn load_asset(&self, id: Uuid) -> Result<Asset, EngineError> {
        self.assets
            .get(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Asset"))
    }

    /// Explains a conditional transition that matched zero rows: the
    /// asset is either gone or in a state `op` does not apply to.
    async fn explain_failed_transition(
        &self,
        id: Uuid,
        op: LifecycleOp,
        reason: &str,
    ) -> EngineError {
        match self.assets.get(id).await {
            Ok(Some(asset)) => EngineError::invalid_transition(asset.status, op, reason),
            Ok(None) => EngineError::not_found("Asset"),
            Err(e) => EngineError::Db(e),
        }
    }
}

/// True when `actor` may act on behalf of `owner_id` (self or admin).
fn is_self_or_admin(actor: &User, owner_id: Uuid) -> bool {
    actor.id == owner_id || actor.role == Role::Admin
}
