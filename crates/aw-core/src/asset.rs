//! Asset data model and lifecycle state machine.
//!
//! An asset moves through a fixed set of states:
//!
//! ```text
//! DRAFT -> PENDING_REVIEW -> IN_REVIEW -> APPROVED | REJECTED
//!             ^  |________________|
//!             |   (release)
//! ARCHIVED <-> any non-archived state (admin only)
//! ```
//!
//! The machine itself holds no mutable state. [`AssetStatus::can_transition`]
//! is a pure validator; repositories enforce the same predicate inside the
//! conditional `UPDATE` that performs the transition, so validation and write
//! are a single atomic store operation.

use crate::auth::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of governed artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetKind {
    Design,
    Specification,
    Prototype,
    Documentation,
}

impl AssetKind {
    /// Returns the kind as the string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Design => "DESIGN",
            AssetKind::Specification => "SPECIFICATION",
            AssetKind::Prototype => "PROTOTYPE",
            AssetKind::Documentation => "DOCUMENTATION",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DESIGN" => Ok(AssetKind::Design),
            "SPECIFICATION" => Ok(AssetKind::Specification),
            "PROTOTYPE" => Ok(AssetKind::Prototype),
            "DOCUMENTATION" => Ok(AssetKind::Documentation),
            other => Err(format!("unknown asset kind: {other}")),
        }
    }
}

/// Lifecycle status of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    /// Being authored; not yet visible to reviewers.
    Draft,
    /// Submitted and waiting for a reviewer.
    PendingReview,
    /// Claimed by a reviewer.
    InReview,
    /// Terminal: disposition was approval.
    Approved,
    /// Terminal: disposition was rejection (including requested changes).
    Rejected,
    /// Terminal: soft-archived, reversible via restore.
    Archived,
}

/// Named lifecycle operations consumed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOp {
    /// `DRAFT -> PENDING_REVIEW`.
    Submit,
    /// `PENDING_REVIEW -> IN_REVIEW`, sets the assignee.
    Claim,
    /// `IN_REVIEW -> PENDING_REVIEW`, clears the assignee.
    Release,
    /// `{PENDING_REVIEW, IN_REVIEW} -> {APPROVED, REJECTED}`.
    Review,
    /// Any non-archived state `-> ARCHIVED`.
    Archive,
    /// `ARCHIVED -> DRAFT`.
    Restore,
}

impl LifecycleOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleOp::Submit => "submit",
            LifecycleOp::Claim => "claim",
            LifecycleOp::Release => "release",
            LifecycleOp::Review => "review",
            LifecycleOp::Archive => "archive",
            LifecycleOp::Restore => "restore",
        }
    }
}

impl fmt::Display for LifecycleOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AssetStatus {
    /// Returns the status as the string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Draft => "DRAFT",
            AssetStatus::PendingReview => "PENDING_REVIEW",
            AssetStatus::InReview => "IN_REVIEW",
            AssetStatus::Approved => "APPROVED",
            AssetStatus::Rejected => "REJECTED",
            AssetStatus::Archived => "ARCHIVED",
        }
    }

    /// True for states that no longer accept claim, release, or review.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AssetStatus::Approved | AssetStatus::Rejected | AssetStatus::Archived
        )
    }

    /// True for states a reviewer can act on.
    pub fn is_reviewable(&self) -> bool {
        matches!(self, AssetStatus::PendingReview | AssetStatus::InReview)
    }

    /// Pure transition validator: does `op` apply in this state?
    pub fn can_transition(&self, op: LifecycleOp) -> bool {
        match op {
            LifecycleOp::Submit => *self == AssetStatus::Draft,
            LifecycleOp::Claim => *self == AssetStatus::PendingReview,
            LifecycleOp::Release => *self == AssetStatus::InReview,
            LifecycleOp::Review => self.is_reviewable(),
            LifecycleOp::Archive => *self != AssetStatus::Archived,
            LifecycleOp::Restore => *self == AssetStatus::Archived,
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(AssetStatus::Draft),
            "PENDING_REVIEW" => Ok(AssetStatus::PendingReview),
            "IN_REVIEW" => Ok(AssetStatus::InReview),
            "APPROVED" => Ok(AssetStatus::Approved),
            "REJECTED" => Ok(AssetStatus::Rejected),
            "ARCHIVED" => Ok(AssetStatus::Archived),
            other => Err(format!("unknown asset status: {other}")),
        }
    }
}

/// A reviewer's disposition of one review cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    Approved,
    Rejected,
    ChangesRequested,
}

impl ReviewDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewDecision::Approved => "APPROVED",
            ReviewDecision::Rejected => "REJECTED",
            ReviewDecision::ChangesRequested => "CHANGES_REQUESTED",
        }
    }

    /// Status the asset lands in for this decision. Requested changes
    /// re-enter the pipeline via resubmission from draft, so they map to
    /// rejection rather than a dedicated state.
    pub fn target_status(&self) -> AssetStatus {
        match self {
            ReviewDecision::Approved => AssetStatus::Approved,
            ReviewDecision::Rejected | ReviewDecision::ChangesRequested => AssetStatus::Rejected,
        }
    }
}

impl fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReviewDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APPROVED" => Ok(ReviewDecision::Approved),
            "REJECTED" => Ok(ReviewDecision::Rejected),
            "CHANGES_REQUESTED" => Ok(ReviewDecision::ChangesRequested),
            other => Err(format!("unknown review decision: {other}")),
        }
    }
}

/// A governed artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Unique identifier.
    pub id: Uuid,
    /// Kind of artifact.
    pub kind: AssetKind,
    /// Title (1..=200 characters).
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Opaque content payload.
    pub content: Option<serde_json::Value>,
    /// Monotonically non-decreasing version, starting at 1.
    pub version: u32,
    /// Current lifecycle status.
    pub status: AssetStatus,
    /// Owning user.
    pub owner_id: Uuid,
    /// Assigned reviewer; `Some` only while status is `IN_REVIEW`.
    pub assignee_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the asset first enters `PENDING_REVIEW`.
    pub submitted_at: Option<DateTime<Utc>>,
    /// Set when a disposition is recorded.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Parent asset for derivatives.
    pub parent_id: Option<Uuid>,
}

impl Asset {
    /// Creates a new draft asset owned by `owner_id`.
    pub fn new_draft(kind: AssetKind, title: impl Into<String>, owner_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            description: None,
            content: None,
            version: 1,
            status: AssetStatus::Draft,
            owner_id,
            assignee_id: None,
            created_at: now,
            updated_at: now,
            submitted_at: None,
            reviewed_at: None,
            parent_id: None,
        }
    }
}

/// Immutable record of one reviewer's disposition of one asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub reviewer_id: Uuid,
    pub decision: ReviewDecision,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(
        asset_id: Uuid,
        reviewer_id: Uuid,
        decision: ReviewDecision,
        comments: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset_id,
            reviewer_id,
            decision,
            comments,
            created_at: Utc::now(),
        }
    }
}

/// A review joined with its reviewer, for detail views.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewWithReviewer {
    #[serde(flatten)]
    pub review: Review,
    pub reviewer: Option<UserSummary>,
}

/// An asset joined with owner/assignee summaries and its review history.
#[derive(Debug, Clone, Serialize)]
pub struct AssetDetail {
    #[serde(flatten)]
    pub asset: Asset,
    pub owner: Option<UserSummary>,
    pub assignee: Option<UserSummary>,
    /// Review history, newest first.
    pub reviews: Vec<ReviewWithReviewer>,
}

/// A queue row: asset plus the relations the dashboard renders.
#[derive(Debug, Clone, Serialize)]
pub struct QueueItem {
    #[serde(flatten)]
    pub asset: Asset,
    pub owner: Option<UserSummary>,
    pub assignee: Option<UserSummary>,
    /// Number of review cycles recorded so far.
    pub review_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_refuse_reviewer_operations() {
        for status in [
            AssetStatus::Approved,
            AssetStatus::Rejected,
            AssetStatus::Archived,
        ] {
            assert!(status.is_terminal());
            assert!(!status.can_transition(LifecycleOp::Claim));
            assert!(!status.can_transition(LifecycleOp::Release));
            assert!(!status.can_transition(LifecycleOp::Review));
        }
    }

    #[test]
    fn claim_only_from_pending_review() {
        assert!(AssetStatus::PendingReview.can_transition(LifecycleOp::Claim));
        for status in [
            AssetStatus::Draft,
            AssetStatus::InReview,
            AssetStatus::Approved,
            AssetStatus::Rejected,
            AssetStatus::Archived,
        ] {
            assert!(!status.can_transition(LifecycleOp::Claim));
        }
    }

    #[test]
    fn review_from_pending_or_in_review() {
        assert!(AssetStatus::PendingReview.can_transition(LifecycleOp::Review));
        assert!(AssetStatus::InReview.can_transition(LifecycleOp::Review));
        assert!(!AssetStatus::Draft.can_transition(LifecycleOp::Review));
    }

    #[test]
    fn submit_only_from_draft() {
        assert!(AssetStatus::Draft.can_transition(LifecycleOp::Submit));
        assert!(!AssetStatus::PendingReview.can_transition(LifecycleOp::Submit));
        assert!(!AssetStatus::Rejected.can_transition(LifecycleOp::Submit));
    }

    #[test]
    fn archive_and_restore_are_inverse() {
        assert!(AssetStatus::Draft.can_transition(LifecycleOp::Archive));
        assert!(AssetStatus::Approved.can_transition(LifecycleOp::Archive));
        assert!(!AssetStatus::Archived.can_transition(LifecycleOp::Archive));
        assert!(AssetStatus::Archived.can_transition(LifecycleOp::Restore));
        assert!(!AssetStatus::Draft.can_transition(LifecycleOp::Restore));
    }

    #[test]
    fn changes_requested_maps_to_rejected() {
        assert_eq!(
            ReviewDecision::ChangesRequested.target_status(),
            AssetStatus::Rejected
        );
        assert_eq!(ReviewDecision::Approved.target_status(), AssetStatus::Approved);
        assert_eq!(ReviewDecision::Rejected.target_status(), AssetStatus::Rejected);
    }

    #[test]
    fn status_round_trips_through_db_string() {
        for status in [
            AssetStatus::Draft,
            AssetStatus::PendingReview,
            AssetStatus::InReview,
            AssetStatus::Approved,
            AssetStatus::Rejected,
            AssetStatus::Archived,
        ] {
            assert_eq!(status.as_str().parse::<AssetStatus>().unwrap(), status);
        }
    }
}
