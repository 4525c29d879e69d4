//! Actor identity and the role policy gate.
//!
//! Roles form a strict hierarchy: `VIEWER < CONTRIBUTOR < REVIEWER < ADMIN`.
//! The gate is a pure rank comparison, queried by every mutating operation
//! before any store access. Authentication itself is external; the engine
//! receives an already-resolved [`User`].

use crate::error::EngineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A user's role, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Read-only access to published assets.
    Viewer,
    /// Can author and submit assets.
    Contributor,
    /// Can work the approval queue and record dispositions.
    Reviewer,
    /// Full access, including bulk dispositions and forced release.
    Admin,
}

impl Role {
    /// Numeric rank in the hierarchy; higher outranks lower.
    pub fn rank(&self) -> u8 {
        match self {
            Role::Viewer => 0,
            Role::Contributor => 1,
            Role::Reviewer => 2,
            Role::Admin => 3,
        }
    }

    /// True if this role meets or exceeds `min`.
    pub fn has_min(&self, min: Role) -> bool {
        self.rank() >= min.rank()
    }

    /// Returns the role as the string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "VIEWER",
            Role::Contributor => "CONTRIBUTOR",
            Role::Reviewer => "REVIEWER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VIEWER" => Ok(Role::Viewer),
            "CONTRIBUTOR" => Ok(Role::Contributor),
            "REVIEWER" => Ok(Role::Reviewer),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// An actor known to the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Email address (unique).
    pub email: String,
    pub role: Role,
    /// Inactive users cannot perform any operation.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            role,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Compact projection used when joining users into responses.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Id/name/email projection of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// The role policy gate.
///
/// Fails with [`EngineError::Forbidden`] when the actor's role is strictly
/// below `min`, and with [`EngineError::Unauthorized`] when the actor has
/// been deactivated. Pure; no store access.
pub fn require_min_role(actor: &User, min: Role) -> Result<(), EngineError> {
    if !actor.active {
        return Err(EngineError::Unauthorized);
    }
    if actor.role.has_min(min) {
        Ok(())
    } else {
        Err(EngineError::Forbidden(format!(
            "requires at least {} role",
            min
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROLES: [Role; 4] = [Role::Viewer, Role::Contributor, Role::Reviewer, Role::Admin];

    #[test]
    fn gate_is_monotone_over_ranks() {
        for role in ALL_ROLES {
            for min in ALL_ROLES {
                assert_eq!(role.has_min(min), role.rank() >= min.rank());
            }
        }
    }

    #[test]
    fn admin_passes_every_gate() {
        for min in ALL_ROLES {
            assert!(Role::Admin.has_min(min));
        }
    }

    #[test]
    fn viewer_passes_only_viewer_gate() {
        assert!(Role::Viewer.has_min(Role::Viewer));
        assert!(!Role::Viewer.has_min(Role::Contributor));
        assert!(!Role::Viewer.has_min(Role::Reviewer));
        assert!(!Role::Viewer.has_min(Role::Admin));
    }

    #[test]
    fn inactive_actor_is_unauthorized() {
        let mut user = User::new("a", "a@example.com", Role::Admin);
        user.active = false;
        assert!(matches!(
            require_min_role(&user, Role::Viewer),
            Err(EngineError::Unauthorized)
        ));
    }

    #[test]
    fn insufficient_role_is_forbidden() {
        let user = User::new("c", "c@example.com", Role::Contributor);
        assert!(matches!(
            require_min_role(&user, Role::Reviewer),
            Err(EngineError::Forbidden(_))
        ));
        assert!(require_min_role(&user, Role::Contributor).is_ok());
    }

    #[test]
    fn role_round_trips_through_db_string() {
        for role in ALL_ROLES {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }
}
