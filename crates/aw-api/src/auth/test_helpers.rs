//! Test helpers for actor resolution.
//!
//! Lets tests exercise authenticated endpoints without seeding a user
//! row. Layer `Extension(TestUser::admin())` onto a router and the
//! [`AuthenticatedUser`](super::AuthenticatedUser) extractor will pick
//! the injected actor up from request extensions.

use aw_core::{Role, User};

/// Extension type for injecting a test actor into requests.
#[derive(Clone)]
pub struct TestUser(pub User);

impl TestUser {
    pub fn admin() -> Self {
        TestUser(User::new("test_admin", "admin@test.local", Role::Admin))
    }

    pub fn reviewer() -> Self {
        TestUser(User::new(
            "test_reviewer",
            "reviewer@test.local",
            Role::Reviewer,
        ))
    }

    pub fn contributor() -> Self {
        TestUser(User::new(
            "test_contributor",
            "contributor@test.local",
            Role::Contributor,
        ))
    }

    pub fn viewer() -> Self {
        TestUser(User::new("test_viewer", "viewer@test.local", Role::Viewer))
    }
}
