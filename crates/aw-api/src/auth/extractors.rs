//! Axum extractors for actor resolution.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use aw_core::User;
use tracing::{debug, warn};
use uuid::Uuid;

use super::ACTOR_ID_HEADER;
use crate::error::ApiError;
use crate::state::AppState;

/// Extractor for the acting user.
///
/// Reads `X-Actor-Id`, loads the user from the store, and rejects the
/// request with 401 when the header is missing or malformed, the user
/// does not exist, or the user has been deactivated.
///
/// A `TestUser` request extension, when present, takes precedence so
/// tests can inject an actor without a store row.
pub struct AuthenticatedUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(test_user) = parts.extensions.get::<super::test_helpers::TestUser>() {
            return Ok(AuthenticatedUser(test_user.0.clone()));
        }

        let app_state = AppState::from_ref(state);

        let header = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError::Unauthorized("Missing X-Actor-Id header".to_string())
            })?;

        let actor_id: Uuid = header.parse().map_err(|_| {
            debug!(header, "Rejected malformed actor id");
            ApiError::Unauthorized("Invalid actor id".to_string())
        })?;

        let user = app_state
            .users
            .get(actor_id)
            .await
            .map_err(|e| {
                warn!(error = %e, "Database error resolving actor");
                ApiError::Internal("Database error".to_string())
            })?
            .ok_or_else(|| ApiError::Unauthorized("Unknown actor".to_string()))?;

        if !user.active {
            return Err(ApiError::Unauthorized(
                "Account is deactivated".to_string(),
            ));
        }

        Ok(AuthenticatedUser(user))
    }
}
