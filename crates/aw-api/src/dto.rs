//! Data Transfer Objects (DTOs) for API requests and responses.
//!
//! Enum-valued fields travel as their wire strings (SCREAMING_SNAKE,
//! matching what the engine stores) and are parsed back at the handler
//! boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use aw_core::asset::{Asset, AssetDetail, QueueItem, Review, ReviewWithReviewer};
use aw_core::audit::AuditEntryWithActor;
use aw_core::db::StatusCounts;
use aw_core::engine::{QueuePage, ReviewOutcome, TrailPage};
use aw_core::{User, UserSummary};

// ============================================================================
// Asset DTOs
// ============================================================================

/// Request to create a draft asset.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAssetRequest {
    /// Asset kind (DESIGN, SPECIFICATION, PROTOTYPE, DOCUMENTATION).
    pub kind: String,
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: String,
    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    pub description: Option<String>,
    /// Opaque content payload.
    pub content: Option<serde_json::Value>,
    /// Parent asset for derivatives.
    pub parent_id: Option<Uuid>,
}

/// Response for a single asset.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssetResponse {
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<serde_json::Value>,
    pub version: u32,
    pub status: String,
    pub owner_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub parent_id: Option<Uuid>,
}

impl From<Asset> for AssetResponse {
    fn from(asset: Asset) -> Self {
        Self {
            id: asset.id,
            kind: asset.kind.as_str().to_string(),
            title: asset.title,
            description: asset.description,
            content: asset.content,
            version: asset.version,
            status: asset.status.as_str().to_string(),
            owner_id: asset.owner_id,
            assignee_id: asset.assignee_id,
            created_at: asset.created_at,
            updated_at: asset.updated_at,
            submitted_at: asset.submitted_at,
            reviewed_at: asset.reviewed_at,
            parent_id: asset.parent_id,
        }
    }
}

/// Compact user projection in responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSummaryResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            email: summary.email,
        }
    }
}

/// Detailed asset response including relations and review history.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssetDetailResponse {
    #[serde(flatten)]
    pub asset: AssetResponse,
    pub owner: Option<UserSummaryResponse>,
    pub assignee: Option<UserSummaryResponse>,
    /// Review history, newest first.
    pub reviews: Vec<ReviewResponse>,
}

impl From<AssetDetail> for AssetDetailResponse {
    fn from(detail: AssetDetail) -> Self {
        Self {
            asset: detail.asset.into(),
            owner: detail.owner.map(Into::into),
            assignee: detail.assignee.map(Into::into),
            reviews: detail.reviews.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Queue DTOs
// ============================================================================

/// Query parameters for the approval queue.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct QueueQuery {
    /// Comma-separated statuses; defaults to PENDING_REVIEW,IN_REVIEW.
    pub status: Option<String>,
    /// Comma-separated kinds.
    pub kind: Option<String>,
    /// Restrict to one assignee.
    pub assignee_id: Option<Uuid>,
    /// Case-insensitive substring search over title and description.
    #[validate(length(max = 200, message = "Search term too long"))]
    pub search: Option<String>,
    /// Sort key: created_at, submitted_at, title, or kind.
    pub sort_by: Option<String>,
    /// Sort order: asc or desc.
    pub sort_order: Option<String>,
    /// Page size, clamped to 1..=100.
    pub limit: Option<u32>,
    /// Continuation cursor from a previous page.
    pub cursor: Option<Uuid>,
}

/// One queue row.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QueueItemResponse {
    #[serde(flatten)]
    pub asset: AssetResponse,
    pub owner: Option<UserSummaryResponse>,
    pub assignee: Option<UserSummaryResponse>,
    pub review_count: u64,
}

impl From<QueueItem> for QueueItemResponse {
    fn from(item: QueueItem) -> Self {
        Self {
            asset: item.asset.into(),
            owner: item.owner.map(Into::into),
            assignee: item.assignee.map(Into::into),
            review_count: item.review_count,
        }
    }
}

/// Asset totals per status, independent of pagination.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusCountsResponse {
    pub pending_review: u64,
    pub in_review: u64,
    pub approved: u64,
    pub rejected: u64,
}

impl From<StatusCounts> for StatusCountsResponse {
    fn from(counts: StatusCounts) -> Self {
        Self {
            pending_review: counts.pending_review,
            in_review: counts.in_review,
            approved: counts.approved,
            rejected: counts.rejected,
        }
    }
}

/// One page of the approval queue.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QueuePageResponse {
    pub data: Vec<QueueItemResponse>,
    /// Pass back as `cursor` to fetch the next page; absent on the
    /// last page.
    pub next_cursor: Option<Uuid>,
    pub status_counts: StatusCountsResponse,
}

impl From<QueuePage> for QueuePageResponse {
    fn from(page: QueuePage) -> Self {
        Self {
            data: page.items.into_iter().map(Into::into).collect(),
            next_cursor: page.next_cursor,
            status_counts: page.status_counts.into(),
        }
    }
}

// ============================================================================
// Review DTOs
// ============================================================================

/// Request to record a disposition.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReviewRequest {
    /// APPROVED, REJECTED, or CHANGES_REQUESTED.
    pub decision: String,
    #[validate(length(max = 4000, message = "Comments must be at most 4000 characters"))]
    pub comments: Option<String>,
}

/// A recorded review.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub reviewer_id: Uuid,
    pub decision: String,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewer: Option<UserSummaryResponse>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            asset_id: review.asset_id,
            reviewer_id: review.reviewer_id,
            decision: review.decision.as_str().to_string(),
            comments: review.comments,
            created_at: review.created_at,
            reviewer: None,
        }
    }
}

impl From<ReviewWithReviewer> for ReviewResponse {
    fn from(joined: ReviewWithReviewer) -> Self {
        let mut response: ReviewResponse = joined.review.into();
        response.reviewer = joined.reviewer.map(Into::into);
        response
    }
}

/// Response to a single disposition.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewOutcomeResponse {
    pub asset: AssetResponse,
    pub review: ReviewResponse,
}

impl From<ReviewOutcome> for ReviewOutcomeResponse {
    fn from(outcome: ReviewOutcome) -> Self {
        Self {
            asset: outcome.asset.into(),
            review: outcome.review.into(),
        }
    }
}

/// Request for a bulk approval.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkApproveRequest {
    #[validate(length(min = 1, max = 50, message = "Between 1 and 50 asset ids"))]
    pub asset_ids: Vec<Uuid>,
    #[validate(length(max = 4000, message = "Comments must be at most 4000 characters"))]
    pub comments: Option<String>,
}

/// Request for a bulk rejection.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkRejectRequest {
    #[validate(length(min = 1, max = 50, message = "Between 1 and 50 asset ids"))]
    pub asset_ids: Vec<Uuid>,
    #[validate(length(min = 1, max = 4000, message = "A rejection reason is required"))]
    pub reason: String,
}

/// Response to a bulk disposition.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkActionResponse {
    /// Assets actually transitioned.
    pub affected: u64,
}

// ============================================================================
// Audit DTOs
// ============================================================================

/// Query parameters for the audit trail.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TrailQuery {
    /// Page size, clamped to 1..=100.
    pub limit: Option<u32>,
    /// Continuation cursor from a previous page.
    pub cursor: Option<Uuid>,
}

/// One audit trail entry.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuditEntryResponse {
    pub id: Uuid,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub actor_id: Option<Uuid>,
    pub actor_email: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub actor: Option<UserSummaryResponse>,
}

impl From<AuditEntryWithActor> for AuditEntryResponse {
    fn from(joined: AuditEntryWithActor) -> Self {
        let entry = joined.entry;
        Self {
            id: entry.id,
            action: entry.action.as_str().to_string(),
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            actor_id: entry.actor_id,
            actor_email: entry.actor_email,
            metadata: entry.metadata,
            created_at: entry.created_at,
            actor: joined.actor.map(Into::into),
        }
    }
}

/// One page of an asset's audit trail, newest first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TrailResponse {
    pub data: Vec<AuditEntryResponse>,
    pub next_cursor: Option<Uuid>,
}

impl From<TrailPage> for TrailResponse {
    fn from(page: TrailPage) -> Self {
        Self {
            data: page.entries.into_iter().map(Into::into).collect(),
            next_cursor: page.next_cursor,
        }
    }
}

// ============================================================================
// User DTOs
// ============================================================================

/// An active reviewer.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewerResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<User> for ReviewerResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.as_str().to_string(),
        }
    }
}

// ============================================================================
// Health DTOs
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: DatabaseHealth,
}

/// Database connectivity in the health response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DatabaseHealth {
    pub connected: bool,
    pub pool_size: u32,
    pub idle_connections: u32,
}
