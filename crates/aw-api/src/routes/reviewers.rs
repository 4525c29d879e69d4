//! Reviewer directory endpoints.

use axum::{extract::State, routing::get, Json, Router};

use crate::auth::AuthenticatedUser;
use crate::dto::ReviewerResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// Creates reviewer routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_reviewers))
}

/// List active users who can work the approval queue.
#[utoipa::path(
    get,
    path = "/api/reviewers",
    responses(
        (status = 200, description = "Active reviewers, ordered by name", body = [ReviewerResponse]),
        (status = 403, description = "Requires reviewer role")
    ),
    tag = "Reviewers"
)]
async fn list_reviewers(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
) -> Result<Json<Vec<ReviewerResponse>>, ApiError> {
    let reviewers = state.engine.reviewers(&actor).await?;
    Ok(Json(reviewers.into_iter().map(Into::into).collect()))
}
