//! Actor resolution for the HTTP surface.
//!
//! The identity provider is external. Requests carry the acting user's
//! id in the `X-Actor-Id` header; the extractor loads the user row and
//! rejects missing or inactive actors. Role enforcement happens in the
//! engine, not here.

pub mod extractors;
pub mod test_helpers;

pub use extractors::AuthenticatedUser;

/// Header carrying the acting user's id.
pub const ACTOR_ID_HEADER: &str = "X-Actor-Id";
