//! Asset governance endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use aw_core::asset::{AssetKind, AssetStatus, ReviewDecision};
use aw_core::db::{CursorPage, QueueFilter, QueueSort, SortOrder};
use aw_core::engine::{NewAsset, QueueRequest};

use crate::auth::AuthenticatedUser;
use crate::dto::{
    AssetDetailResponse, AssetResponse, BulkActionResponse, BulkApproveRequest,
    BulkRejectRequest, CreateAssetRequest, QueuePageResponse, QueueQuery,
    ReviewOutcomeResponse, ReviewRequest, TrailQuery, TrailResponse,
};
use crate::error::ApiError;
use crate::state::AppState;

/// Creates asset routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_asset))
        .route("/queue", get(queue))
        .route("/bulk-approve", post(bulk_approve))
        .route("/bulk-reject", post(bulk_reject))
        .route("/:id", get(get_asset))
        .route("/:id/audit", get(audit_trail))
        .route("/:id/review", post(review))
        .route("/:id/claim", post(claim))
        .route("/:id/release", post(release))
        .route("/:id/submit", post(submit))
        .route("/:id/archive", post(archive))
        .route("/:id/restore", post(restore))
}

fn parse_kind(s: &str) -> Result<AssetKind, ApiError> {
    s.parse().map_err(ApiError::BadRequest)
}

fn parse_decision(s: &str) -> Result<ReviewDecision, ApiError> {
    s.parse().map_err(ApiError::BadRequest)
}

/// Parses a comma-separated list of enum tokens, rejecting unknown
/// values instead of silently dropping them.
fn parse_csv<T: std::str::FromStr<Err = String>>(csv: &str) -> Result<Vec<T>, ApiError> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(ApiError::BadRequest))
        .collect()
}

fn parse_sort(query: &QueueQuery) -> Result<(QueueSort, SortOrder), ApiError> {
    let sort_by = match query.sort_by.as_deref() {
        None => QueueSort::default(),
        Some("created_at") => QueueSort::CreatedAt,
        Some("submitted_at") => QueueSort::SubmittedAt,
        Some("title") => QueueSort::Title,
        Some("kind") => QueueSort::Kind,
        Some(other) => {
            return Err(ApiError::BadRequest(format!("unknown sort key: {other}")))
        }
    };
    let sort_order = match query.sort_order.as_deref() {
        None => SortOrder::default(),
        Some("asc") => SortOrder::Asc,
        Some("desc") => SortOrder::Desc,
        Some(other) => {
            return Err(ApiError::BadRequest(format!("unknown sort order: {other}")))
        }
    };
    Ok((sort_by, sort_order))
}

/// Create a draft asset.
#[utoipa::path(
    post,
    path = "/api/assets",
    request_body = CreateAssetRequest,
    responses(
        (status = 201, description = "Draft created", body = AssetResponse),
        (status = 401, description = "Unknown or inactive actor"),
        (status = 403, description = "Requires contributor role"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Assets"
)]
async fn create_asset(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(request): Json<CreateAssetRequest>,
) -> Result<(StatusCode, Json<AssetResponse>), ApiError> {
    request.validate()?;
    let input = NewAsset {
        kind: parse_kind(&request.kind)?,
        title: request.title,
        description: request.description,
        content: request.content,
        parent_id: request.parent_id,
    };
    let asset = state.engine.create_asset(&actor, input).await?;
    Ok((StatusCode::CREATED, Json(asset.into())))
}

/// List the approval queue.
#[utoipa::path(
    get,
    path = "/api/assets/queue",
    params(
        ("status" = Option<String>, Query, description = "Comma-separated statuses"),
        ("kind" = Option<String>, Query, description = "Comma-separated kinds"),
        ("assignee_id" = Option<Uuid>, Query, description = "Restrict to one assignee"),
        ("search" = Option<String>, Query, description = "Substring search over title/description"),
        ("sort_by" = Option<String>, Query, description = "created_at, submitted_at, title, or kind"),
        ("sort_order" = Option<String>, Query, description = "asc or desc"),
        ("limit" = Option<u32>, Query, description = "Page size (1..=100)"),
        ("cursor" = Option<Uuid>, Query, description = "Continuation cursor")
    ),
    responses(
        (status = 200, description = "One page of the queue", body = QueuePageResponse),
        (status = 400, description = "Invalid query parameters"),
        (status = 403, description = "Requires reviewer role")
    ),
    tag = "Assets"
)]
async fn queue(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Query(query): Query<QueueQuery>,
) -> Result<Json<QueuePageResponse>, ApiError> {
    query.validate()?;

    let status = query
        .status
        .as_deref()
        .map(parse_csv::<AssetStatus>)
        .transpose()?;
    let kinds = query
        .kind
        .as_deref()
        .map(parse_csv::<AssetKind>)
        .transpose()?;
    let (sort_by, sort_order) = parse_sort(&query)?;

    let request = QueueRequest {
        filter: QueueFilter {
            status,
            kinds,
            assignee_id: query.assignee_id,
            search: query.search,
            sort_by,
            sort_order,
        },
        page: CursorPage::from_query(query.limit, query.cursor),
    };

    let page = state.engine.queue(&actor, request).await?;
    Ok(Json(page.into()))
}

/// Get one asset with its relations and review history.
#[utoipa::path(
    get,
    path = "/api/assets/{id}",
    params(("id" = Uuid, Path, description = "Asset id")),
    responses(
        (status = 200, description = "Asset details", body = AssetDetailResponse),
        (status = 404, description = "Asset not found")
    ),
    tag = "Assets"
)]
async fn get_asset(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AssetDetailResponse>, ApiError> {
    let detail = state.engine.get_asset(&actor, id).await?;
    Ok(Json(detail.into()))
}

/// Page through an asset's audit trail, newest first.
#[utoipa::path(
    get,
    path = "/api/assets/{id}/audit",
    params(
        ("id" = Uuid, Path, description = "Asset id"),
        ("limit" = Option<u32>, Query, description = "Page size (1..=100)"),
        ("cursor" = Option<Uuid>, Query, description = "Continuation cursor")
    ),
    responses(
        (status = 200, description = "One page of the trail", body = TrailResponse),
        (status = 404, description = "Asset not found")
    ),
    tag = "Audit"
)]
async fn audit_trail(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<TrailQuery>,
) -> Result<Json<TrailResponse>, ApiError> {
    let page = CursorPage::from_query(query.limit, query.cursor);
    let trail = state.engine.audit_trail(&actor, id, page).await?;
    Ok(Json(trail.into()))
}

/// Record a disposition.
#[utoipa::path(
    post,
    path = "/api/assets/{id}/review",
    params(("id" = Uuid, Path, description = "Asset id")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Disposition recorded", body = ReviewOutcomeResponse),
        (status = 404, description = "Asset not found"),
        (status = 422, description = "Asset is not reviewable")
    ),
    tag = "Assets"
)]
async fn review(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ReviewOutcomeResponse>, ApiError> {
    request.validate()?;
    let decision = parse_decision(&request.decision)?;
    let outcome = state
        .engine
        .review(&actor, id, decision, request.comments)
        .await?;
    Ok(Json(outcome.into()))
}

/// Claim a pending asset.
#[utoipa::path(
    post,
    path = "/api/assets/{id}/claim",
    params(("id" = Uuid, Path, description = "Asset id")),
    responses(
        (status = 200, description = "Asset claimed", body = AssetResponse),
        (status = 409, description = "Already claimed by another reviewer"),
        (status = 422, description = "Asset is not pending review")
    ),
    tag = "Assets"
)]
async fn claim(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AssetResponse>, ApiError> {
    let asset = state.engine.claim(&actor, id).await?;
    Ok(Json(asset.into()))
}

/// Release a claimed asset back to the queue.
#[utoipa::path(
    post,
    path = "/api/assets/{id}/release",
    params(("id" = Uuid, Path, description = "Asset id")),
    responses(
        (status = 200, description = "Asset released", body = AssetResponse),
        (status = 403, description = "Caller is neither assignee nor admin"),
        (status = 422, description = "Asset is not in review")
    ),
    tag = "Assets"
)]
async fn release(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AssetResponse>, ApiError> {
    let asset = state.engine.release(&actor, id).await?;
    Ok(Json(asset.into()))
}

/// Submit a draft for review.
#[utoipa::path(
    post,
    path = "/api/assets/{id}/submit",
    params(("id" = Uuid, Path, description = "Asset id")),
    responses(
        (status = 200, description = "Asset submitted", body = AssetResponse),
        (status = 403, description = "Caller is neither owner nor admin"),
        (status = 422, description = "Asset is not a draft")
    ),
    tag = "Assets"
)]
async fn submit(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AssetResponse>, ApiError> {
    let asset = state.engine.submit(&actor, id).await?;
    Ok(Json(asset.into()))
}

/// Archive an asset.
#[utoipa::path(
    post,
    path = "/api/assets/{id}/archive",
    params(("id" = Uuid, Path, description = "Asset id")),
    responses(
        (status = 200, description = "Asset archived", body = AssetResponse),
        (status = 403, description = "Requires admin role"),
        (status = 422, description = "Asset is already archived")
    ),
    tag = "Assets"
)]
async fn archive(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AssetResponse>, ApiError> {
    let asset = state.engine.archive(&actor, id).await?;
    Ok(Json(asset.into()))
}

/// Restore an archived asset to draft.
#[utoipa::path(
    post,
    path = "/api/assets/{id}/restore",
    params(("id" = Uuid, Path, description = "Asset id")),
    responses(
        (status = 200, description = "Asset restored", body = AssetResponse),
        (status = 403, description = "Requires admin role"),
        (status = 422, description = "Asset is not archived")
    ),
    tag = "Assets"
)]
async fn restore(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AssetResponse>, ApiError> {
    let asset = state.engine.restore(&actor, id).await?;
    Ok(Json(asset.into()))
}

/// Approve a batch of assets.
#[utoipa::path(
    post,
    path = "/api/assets/bulk-approve",
    request_body = BulkApproveRequest,
    responses(
        (status = 200, description = "Batch approved", body = BulkActionResponse),
        (status = 400, description = "No reviewable assets in the batch"),
        (status = 403, description = "Requires admin role")
    ),
    tag = "Assets"
)]
async fn bulk_approve(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(request): Json<BulkApproveRequest>,
) -> Result<Json<BulkActionResponse>, ApiError> {
    request.validate()?;
    let outcome = state
        .engine
        .bulk_approve(&actor, &request.asset_ids, request.comments)
        .await?;
    Ok(Json(BulkActionResponse {
        affected: outcome.affected,
    }))
}

/// Reject a batch of assets with a shared reason.
#[utoipa::path(
    post,
    path = "/api/assets/bulk-reject",
    request_body = BulkRejectRequest,
    responses(
        (status = 200, description = "Batch rejected", body = BulkActionResponse),
        (status = 400, description = "Missing reason or no reviewable assets"),
        (status = 403, description = "Requires admin role")
    ),
    tag = "Assets"
)]
async fn bulk_reject(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(request): Json<BulkRejectRequest>,
) -> Result<Json<BulkActionResponse>, ApiError> {
    request.validate()?;
    let outcome = state
        .engine
        .bulk_reject(&actor, &request.asset_ids, &request.reason)
        .await?;
    Ok(Json(BulkActionResponse {
        affected: outcome.affected,
    }))
}
