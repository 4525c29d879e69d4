//! End-to-end tests for the HTTP surface, backed by in-memory repositories.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use aw_api::routes::create_router;
use aw_api::AppState;
use aw_core::asset::{Asset, AssetKind, AssetStatus};
use aw_core::db::mocks::MemoryStore;
use aw_core::{GovernanceEngine, Role, User};

fn test_app(store: &MemoryStore) -> Router {
    let engine = GovernanceEngine::new(
        Arc::new(store.asset_repo()),
        Arc::new(store.audit_repo()),
        Arc::new(store.user_repo()),
    );
    let state = AppState::new(engine, Arc::new(store.user_repo()));
    create_router(state)
}

async fn seed_user(store: &MemoryStore, name: &str, role: Role) -> User {
    let user = User::new(name, format!("{}@example.com", name.to_lowercase()), role);
    store.insert_user(user.clone()).await;
    user
}

async fn seed_asset(store: &MemoryStore, title: &str, status: AssetStatus, owner: &User) -> Asset {
    let mut asset = Asset::new_draft(AssetKind::Design, title, owner.id);
    asset.status = status;
    if status != AssetStatus::Draft {
        asset.submitted_at = Some(asset.created_at);
    }
    store.insert_asset(asset.clone()).await;
    asset
}

fn get(uri: &str, actor: &User) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("X-Actor-Id", actor.id.to_string())
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, actor: &User) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("X-Actor-Id", actor.id.to_string())
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, actor: &User, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("X-Actor-Id", actor.id.to_string())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// Actor resolution
// ============================================================================

#[tokio::test]
async fn missing_actor_header_is_unauthorized() {
    let store = MemoryStore::new();
    let app = test_app(&store);

    let request = Request::builder()
        .method("GET")
        .uri("/api/assets/queue")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn unknown_actor_is_unauthorized() {
    let store = MemoryStore::new();
    let app = test_app(&store);

    let ghost = User::new("Ghost", "ghost@example.com", Role::Admin);
    let response = app.oneshot(get("/api/assets/queue", &ghost)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deactivated_actor_is_unauthorized() {
    let store = MemoryStore::new();
    let mut reviewer = User::new("Rhea", "rhea@example.com", Role::Reviewer);
    reviewer.active = false;
    store.insert_user(reviewer.clone()).await;
    let app = test_app(&store);

    let response = app
        .oneshot(get("/api/assets/queue", &reviewer))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Unauthorized: Account is deactivated");
}

#[tokio::test]
async fn malformed_actor_header_is_unauthorized() {
    let store = MemoryStore::new();
    let app = test_app(&store);

    let request = Request::builder()
        .method("GET")
        .uri("/api/assets/queue")
        .header("X-Actor-Id", "not-a-uuid")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_extension_bypasses_header_auth() {
    let store = MemoryStore::new();
    let app = test_app(&store).layer(axum::Extension(
        aw_api::auth::test_helpers::TestUser::reviewer(),
    ));

    let request = Request::builder()
        .method("GET")
        .uri("/api/assets/queue")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Asset creation
// ============================================================================

#[tokio::test]
async fn create_asset_returns_draft() {
    let store = MemoryStore::new();
    let contributor = seed_user(&store, "Cora", Role::Contributor).await;
    let app = test_app(&store);

    let response = app
        .oneshot(post_json(
            "/api/assets",
            &contributor,
            json!({"kind": "DESIGN", "title": "Login flow", "description": "v2"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["status"], "DRAFT");
    assert_eq!(body["version"], 1);
    assert_eq!(body["owner_id"], contributor.id.to_string());
}

#[tokio::test]
async fn create_asset_rejects_blank_title() {
    let store = MemoryStore::new();
    let contributor = seed_user(&store, "Cora", Role::Contributor).await;
    let app = test_app(&store);

    let response = app
        .oneshot(post_json(
            "/api/assets",
            &contributor,
            json!({"kind": "DESIGN", "title": ""}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn create_asset_rejects_unknown_kind() {
    let store = MemoryStore::new();
    let contributor = seed_user(&store, "Cora", Role::Contributor).await;
    let app = test_app(&store);

    let response = app
        .oneshot(post_json(
            "/api/assets",
            &contributor,
            json!({"kind": "SCULPTURE", "title": "Bust"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn viewer_cannot_create_assets() {
    let store = MemoryStore::new();
    let viewer = seed_user(&store, "Vik", Role::Viewer).await;
    let app = test_app(&store);

    let response = app
        .oneshot(post_json(
            "/api/assets",
            &viewer,
            json!({"kind": "DESIGN", "title": "Nope"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Queue
// ============================================================================

#[tokio::test]
async fn queue_defaults_to_actionable_statuses() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "Cora", Role::Contributor).await;
    let reviewer = seed_user(&store, "Rhea", Role::Reviewer).await;
    seed_asset(&store, "draft", AssetStatus::Draft, &owner).await;
    seed_asset(&store, "pending", AssetStatus::PendingReview, &owner).await;
    seed_asset(&store, "in review", AssetStatus::InReview, &owner).await;
    seed_asset(&store, "approved", AssetStatus::Approved, &owner).await;
    let app = test_app(&store);

    let response = app
        .oneshot(get("/api/assets/queue", &reviewer))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles.len(), 2);
    assert!(titles.contains(&"pending"));
    assert!(titles.contains(&"in review"));
    assert_eq!(body["status_counts"]["pending_review"], 1);
    assert_eq!(body["status_counts"]["approved"], 1);
}

#[tokio::test]
async fn queue_viewer_is_forbidden() {
    let store = MemoryStore::new();
    let viewer = seed_user(&store, "Vik", Role::Viewer).await;
    let app = test_app(&store);

    let response = app
        .oneshot(get("/api/assets/queue", &viewer))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn queue_rejects_unknown_status_token() {
    let store = MemoryStore::new();
    let reviewer = seed_user(&store, "Rhea", Role::Reviewer).await;
    let app = test_app(&store);

    let response = app
        .oneshot(get("/api/assets/queue?status=DANGLING", &reviewer))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn queue_pages_with_cursor() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "Cora", Role::Contributor).await;
    let reviewer = seed_user(&store, "Rhea", Role::Reviewer).await;
    for title in ["alpha", "beta", "gamma"] {
        seed_asset(&store, title, AssetStatus::PendingReview, &owner).await;
    }
    let app = test_app(&store);

    let first = app
        .clone()
        .oneshot(get(
            "/api/assets/queue?sort_by=title&sort_order=asc&limit=2",
            &reviewer,
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first = json_body(first).await;
    assert_eq!(first["data"].as_array().unwrap().len(), 2);
    let cursor = first["next_cursor"].as_str().unwrap().to_string();

    let second = app
        .oneshot(get(
            &format!("/api/assets/queue?sort_by=title&sort_order=asc&limit=2&cursor={cursor}"),
            &reviewer,
        ))
        .await
        .unwrap();
    let second = json_body(second).await;
    assert_eq!(second["data"].as_array().unwrap().len(), 1);
    assert_eq!(second["data"][0]["title"], "gamma");
    assert!(second["next_cursor"].is_null());
}

// ============================================================================
// Claim and release
// ============================================================================

#[tokio::test]
async fn claim_moves_pending_asset_into_review() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "Cora", Role::Contributor).await;
    let reviewer = seed_user(&store, "Rhea", Role::Reviewer).await;
    let asset = seed_asset(&store, "pending", AssetStatus::PendingReview, &owner).await;
    let app = test_app(&store);

    let response = app
        .oneshot(post(&format!("/api/assets/{}/claim", asset.id), &reviewer))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "IN_REVIEW");
    assert_eq!(body["assignee_id"], reviewer.id.to_string());
}

#[tokio::test]
async fn second_claim_conflicts() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "Cora", Role::Contributor).await;
    let first = seed_user(&store, "Rhea", Role::Reviewer).await;
    let second = seed_user(&store, "Remy", Role::Reviewer).await;
    let asset = seed_asset(&store, "pending", AssetStatus::PendingReview, &owner).await;
    let app = test_app(&store);

    let ok = app
        .clone()
        .oneshot(post(&format!("/api/assets/{}/claim", asset.id), &first))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    let raced = app
        .oneshot(post(&format!("/api/assets/{}/claim", asset.id), &second))
        .await
        .unwrap();
    assert_eq!(raced.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn claiming_a_draft_is_unprocessable() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "Cora", Role::Contributor).await;
    let reviewer = seed_user(&store, "Rhea", Role::Reviewer).await;
    let asset = seed_asset(&store, "draft", AssetStatus::Draft, &owner).await;
    let app = test_app(&store);

    let response = app
        .oneshot(post(&format!("/api/assets/{}/claim", asset.id), &reviewer))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn claiming_a_missing_asset_is_not_found() {
    let store = MemoryStore::new();
    let reviewer = seed_user(&store, "Rhea", Role::Reviewer).await;
    let app = test_app(&store);

    let response = app
        .oneshot(post(&format!("/api/assets/{}/claim", Uuid::new_v4()), &reviewer))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_assignee_or_admin_can_release() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "Cora", Role::Contributor).await;
    let assignee = seed_user(&store, "Rhea", Role::Reviewer).await;
    let other = seed_user(&store, "Remy", Role::Reviewer).await;
    let admin = seed_user(&store, "Ada", Role::Admin).await;
    let mut asset = seed_asset(&store, "claimed", AssetStatus::InReview, &owner).await;
    asset.assignee_id = Some(assignee.id);
    store.insert_asset(asset.clone()).await;
    let app = test_app(&store);

    let denied = app
        .clone()
        .oneshot(post(&format!("/api/assets/{}/release", asset.id), &other))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let released = app
        .oneshot(post(&format!("/api/assets/{}/release", asset.id), &admin))
        .await
        .unwrap();
    assert_eq!(released.status(), StatusCode::OK);
    let body = json_body(released).await;
    assert_eq!(body["status"], "PENDING_REVIEW");
    assert!(body["assignee_id"].is_null());
}

// ============================================================================
// Dispositions
// ============================================================================

#[tokio::test]
async fn review_approves_a_pending_asset() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "Cora", Role::Contributor).await;
    let reviewer = seed_user(&store, "Rhea", Role::Reviewer).await;
    let asset = seed_asset(&store, "pending", AssetStatus::PendingReview, &owner).await;
    let app = test_app(&store);

    let response = app
        .oneshot(post_json(
            &format!("/api/assets/{}/review", asset.id),
            &reviewer,
            json!({"decision": "APPROVED", "comments": "Ship it"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["asset"]["status"], "APPROVED");
    assert_eq!(body["review"]["decision"], "APPROVED");
    assert_eq!(body["review"]["reviewer_id"], reviewer.id.to_string());
}

#[tokio::test]
async fn changes_requested_rejects_the_asset() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "Cora", Role::Contributor).await;
    let reviewer = seed_user(&store, "Rhea", Role::Reviewer).await;
    let asset = seed_asset(&store, "pending", AssetStatus::PendingReview, &owner).await;
    let app = test_app(&store);

    let response = app
        .oneshot(post_json(
            &format!("/api/assets/{}/review", asset.id),
            &reviewer,
            json!({"decision": "CHANGES_REQUESTED", "comments": "Needs edge cases"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["asset"]["status"], "REJECTED");
    assert_eq!(body["review"]["decision"], "CHANGES_REQUESTED");
}

#[tokio::test]
async fn reviewing_an_approved_asset_is_unprocessable() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "Cora", Role::Contributor).await;
    let reviewer = seed_user(&store, "Rhea", Role::Reviewer).await;
    let asset = seed_asset(&store, "approved", AssetStatus::Approved, &owner).await;
    let app = test_app(&store);

    let response = app
        .oneshot(post_json(
            &format!("/api/assets/{}/review", asset.id),
            &reviewer,
            json!({"decision": "REJECTED"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Bulk dispositions
// ============================================================================

#[tokio::test]
async fn bulk_approve_counts_only_reviewable_assets() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "Cora", Role::Contributor).await;
    let admin = seed_user(&store, "Ada", Role::Admin).await;
    let pending = seed_asset(&store, "pending", AssetStatus::PendingReview, &owner).await;
    let in_review = seed_asset(&store, "claimed", AssetStatus::InReview, &owner).await;
    let draft = seed_asset(&store, "draft", AssetStatus::Draft, &owner).await;
    let app = test_app(&store);

    let response = app
        .oneshot(post_json(
            "/api/assets/bulk-approve",
            &admin,
            json!({"asset_ids": [pending.id, in_review.id, draft.id]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["affected"], 2);
    assert_eq!(
        store.asset(draft.id).await.unwrap().status,
        AssetStatus::Draft
    );
    assert_eq!(
        store.asset(pending.id).await.unwrap().status,
        AssetStatus::Approved
    );
}

#[tokio::test]
async fn bulk_disposition_requires_admin() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "Cora", Role::Contributor).await;
    let reviewer = seed_user(&store, "Rhea", Role::Reviewer).await;
    let asset = seed_asset(&store, "pending", AssetStatus::PendingReview, &owner).await;
    let app = test_app(&store);

    let response = app
        .oneshot(post_json(
            "/api/assets/bulk-approve",
            &reviewer,
            json!({"asset_ids": [asset.id]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bulk_reject_requires_a_reason() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "Cora", Role::Contributor).await;
    let admin = seed_user(&store, "Ada", Role::Admin).await;
    let asset = seed_asset(&store, "pending", AssetStatus::PendingReview, &owner).await;
    let app = test_app(&store);

    let empty = app
        .clone()
        .oneshot(post_json(
            "/api/assets/bulk-reject",
            &admin,
            json!({"asset_ids": [asset.id], "reason": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let blank = app
        .oneshot(post_json(
            "/api/assets/bulk-reject",
            &admin,
            json!({"asset_ids": [asset.id], "reason": "   "}),
        ))
        .await
        .unwrap();
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bulk_approve_rejects_oversized_batches() {
    let store = MemoryStore::new();
    let admin = seed_user(&store, "Ada", Role::Admin).await;
    let ids: Vec<Uuid> = (0..51).map(|_| Uuid::new_v4()).collect();
    let app = test_app(&store);

    let response = app
        .oneshot(post_json(
            "/api/assets/bulk-approve",
            &admin,
            json!({"asset_ids": ids}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn owner_submits_then_admin_archives_and_restores() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "Cora", Role::Contributor).await;
    let admin = seed_user(&store, "Ada", Role::Admin).await;
    let asset = seed_asset(&store, "draft", AssetStatus::Draft, &owner).await;
    let app = test_app(&store);

    let submitted = app
        .clone()
        .oneshot(post(&format!("/api/assets/{}/submit", asset.id), &owner))
        .await
        .unwrap();
    assert_eq!(submitted.status(), StatusCode::OK);
    let body = json_body(submitted).await;
    assert_eq!(body["status"], "PENDING_REVIEW");
    assert!(!body["submitted_at"].is_null());

    let archived = app
        .clone()
        .oneshot(post(&format!("/api/assets/{}/archive", asset.id), &admin))
        .await
        .unwrap();
    assert_eq!(archived.status(), StatusCode::OK);
    let body = json_body(archived).await;
    assert_eq!(body["status"], "ARCHIVED");

    let restored = app
        .oneshot(post(&format!("/api/assets/{}/restore", asset.id), &admin))
        .await
        .unwrap();
    assert_eq!(restored.status(), StatusCode::OK);
    let body = json_body(restored).await;
    assert_eq!(body["status"], "DRAFT");
}

#[tokio::test]
async fn non_owner_cannot_submit() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "Cora", Role::Contributor).await;
    let other = seed_user(&store, "Con", Role::Contributor).await;
    let asset = seed_asset(&store, "draft", AssetStatus::Draft, &owner).await;
    let app = test_app(&store);

    let response = app
        .oneshot(post(&format!("/api/assets/{}/submit", asset.id), &other))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn archive_requires_admin() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "Cora", Role::Contributor).await;
    let reviewer = seed_user(&store, "Rhea", Role::Reviewer).await;
    let asset = seed_asset(&store, "pending", AssetStatus::PendingReview, &owner).await;
    let app = test_app(&store);

    let response = app
        .oneshot(post(&format!("/api/assets/{}/archive", asset.id), &reviewer))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Detail and audit trail
// ============================================================================

#[tokio::test]
async fn get_asset_includes_owner_and_reviews() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "Cora", Role::Contributor).await;
    let reviewer = seed_user(&store, "Rhea", Role::Reviewer).await;
    let asset = seed_asset(&store, "pending", AssetStatus::PendingReview, &owner).await;
    let app = test_app(&store);

    let approve = app
        .clone()
        .oneshot(post_json(
            &format!("/api/assets/{}/review", asset.id),
            &reviewer,
            json!({"decision": "APPROVED"}),
        ))
        .await
        .unwrap();
    assert_eq!(approve.status(), StatusCode::OK);

    let response = app
        .oneshot(get(&format!("/api/assets/{}", asset.id), &reviewer))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["owner"]["name"], "Cora");
    assert_eq!(body["reviews"].as_array().unwrap().len(), 1);
    assert_eq!(body["reviews"][0]["reviewer"]["name"], "Rhea");
}

#[tokio::test]
async fn audit_trail_records_the_lifecycle() {
    let store = MemoryStore::new();
    let owner = seed_user(&store, "Cora", Role::Contributor).await;
    let reviewer = seed_user(&store, "Rhea", Role::Reviewer).await;
    let asset = seed_asset(&store, "pending", AssetStatus::PendingReview, &owner).await;
    let app = test_app(&store);

    let claim = app
        .clone()
        .oneshot(post(&format!("/api/assets/{}/claim", asset.id), &reviewer))
        .await
        .unwrap();
    assert_eq!(claim.status(), StatusCode::OK);

    let approve = app
        .clone()
        .oneshot(post_json(
            &format!("/api/assets/{}/review", asset.id),
            &reviewer,
            json!({"decision": "APPROVED"}),
        ))
        .await
        .unwrap();
    assert_eq!(approve.status(), StatusCode::OK);

    let response = app
        .oneshot(get(&format!("/api/assets/{}/audit", asset.id), &reviewer))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let actions: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["action"].as_str().unwrap())
        .collect();
    // Newest first.
    assert_eq!(actions, vec!["ASSET_APPROVED", "ASSET_REVIEWED"]);
    assert_eq!(body["data"][0]["actor"]["name"], "Rhea");
}

#[tokio::test]
async fn audit_trail_for_missing_asset_is_not_found() {
    let store = MemoryStore::new();
    let reviewer = seed_user(&store, "Rhea", Role::Reviewer).await;
    let app = test_app(&store);

    let response = app
        .oneshot(get(&format!("/api/assets/{}/audit", Uuid::new_v4()), &reviewer))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Reviewers and health
// ============================================================================

#[tokio::test]
async fn reviewers_lists_active_reviewers_and_admins() {
    let store = MemoryStore::new();
    let reviewer = seed_user(&store, "Rhea", Role::Reviewer).await;
    seed_user(&store, "Ada", Role::Admin).await;
    seed_user(&store, "Cora", Role::Contributor).await;
    let mut inactive = User::new("Idle", "idle@example.com", Role::Reviewer);
    inactive.active = false;
    store.insert_user(inactive).await;
    let app = test_app(&store);

    let response = app
        .oneshot(get("/api/reviewers", &reviewer))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ada", "Rhea"]);
}

#[tokio::test]
async fn health_reports_ok_without_a_pool() {
    let store = MemoryStore::new();
    let app = test_app(&store);

    let request = Request::builder()
        .method("GET")
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}
