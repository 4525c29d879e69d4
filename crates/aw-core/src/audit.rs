//! Append-only audit vocabulary.
//!
//! Every successful state-changing operation produces exactly one
//! [`AuditLogEntry`] (bulk operations produce one per affected asset).
//! Entries are never updated or deleted; the repository exposes no such
//! path.

use crate::auth::{User, UserSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Closed set of auditable events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    AssetCreated,
    AssetUpdated,
    AssetSubmitted,
    /// Claim/release and other in-review activity; the specific action is
    /// recorded in metadata.
    AssetReviewed,
    AssetApproved,
    AssetRejected,
    AssetArchived,
    AssetRestored,
    UserCreated,
    UserUpdated,
    UserDeactivated,
    UserRoleChanged,
    SystemEvent,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::AssetCreated => "ASSET_CREATED",
            AuditAction::AssetUpdated => "ASSET_UPDATED",
            AuditAction::AssetSubmitted => "ASSET_SUBMITTED",
            AuditAction::AssetReviewed => "ASSET_REVIEWED",
            AuditAction::AssetApproved => "ASSET_APPROVED",
            AuditAction::AssetRejected => "ASSET_REJECTED",
            AuditAction::AssetArchived => "ASSET_ARCHIVED",
            AuditAction::AssetRestored => "ASSET_RESTORED",
            AuditAction::UserCreated => "USER_CREATED",
            AuditAction::UserUpdated => "USER_UPDATED",
            AuditAction::UserDeactivated => "USER_DEACTIVATED",
            AuditAction::UserRoleChanged => "USER_ROLE_CHANGED",
            AuditAction::SystemEvent => "SYSTEM_EVENT",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASSET_CREATED" => Ok(AuditAction::AssetCreated),
            "ASSET_UPDATED" => Ok(AuditAction::AssetUpdated),
            "ASSET_SUBMITTED" => Ok(AuditAction::AssetSubmitted),
            "ASSET_REVIEWED" => Ok(AuditAction::AssetReviewed),
            "ASSET_APPROVED" => Ok(AuditAction::AssetApproved),
            "ASSET_REJECTED" => Ok(AuditAction::AssetRejected),
            "ASSET_ARCHIVED" => Ok(AuditAction::AssetArchived),
            "ASSET_RESTORED" => Ok(AuditAction::AssetRestored),
            "USER_CREATED" => Ok(AuditAction::UserCreated),
            "USER_UPDATED" => Ok(AuditAction::UserUpdated),
            "USER_DEACTIVATED" => Ok(AuditAction::UserDeactivated),
            "USER_ROLE_CHANGED" => Ok(AuditAction::UserRoleChanged),
            "SYSTEM_EVENT" => Ok(AuditAction::SystemEvent),
            other => Err(format!("unknown audit action: {other}")),
        }
    }
}

/// One immutable event record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub action: AuditAction,
    /// Entity type the event describes, e.g. "Asset" or "User".
    pub entity_type: String,
    pub entity_id: String,
    /// `None` for system-initiated events.
    pub actor_id: Option<Uuid>,
    pub actor_email: Option<String>,
    /// Structured event payload (previous/new status, decision, ...).
    pub metadata: Option<serde_json::Value>,
    /// Link back to the asset this event concerns, when applicable.
    pub asset_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Entry for an asset lifecycle event performed by `actor`.
    pub fn for_asset(
        action: AuditAction,
        asset_id: Uuid,
        actor: &User,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            entity_type: "Asset".to_string(),
            entity_id: asset_id.to_string(),
            actor_id: Some(actor.id),
            actor_email: Some(actor.email.clone()),
            metadata: Some(metadata),
            asset_id: Some(asset_id),
            created_at: Utc::now(),
        }
    }

    /// Entry for a user bookkeeping event.
    pub fn for_user(action: AuditAction, subject_id: Uuid, actor: Option<&User>) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            entity_type: "User".to_string(),
            entity_id: subject_id.to_string(),
            actor_id: actor.map(|a| a.id),
            actor_email: actor.map(|a| a.email.clone()),
            metadata: None,
            asset_id: None,
            created_at: Utc::now(),
        }
    }

    /// System-initiated event with no actor.
    pub fn system(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            action: AuditAction::SystemEvent,
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            actor_id: None,
            actor_email: None,
            metadata: None,
            asset_id: None,
            created_at: Utc::now(),
        }
    }
}

/// An audit entry joined with its actor, for trail views.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntryWithActor {
    #[serde(flatten)]
    pub entry: AuditLogEntry,
    pub actor: Option<UserSummary>,
}
