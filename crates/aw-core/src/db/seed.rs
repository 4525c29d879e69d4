//! Database seeding utilities.

use super::{DbError, UserRepository};
use crate::audit::{AuditAction, AuditLogEntry};
use crate::auth::{Role, User};
use crate::db::AuditRepository;
use tracing::info;

/// Ensures a default admin user exists.
///
/// Does nothing when any users already exist. Otherwise creates an admin
/// (name/email from `AW_ADMIN_NAME`/`AW_ADMIN_EMAIL`, with localhost
/// defaults) and records the creation in the audit log as a system event.
///
/// Returns the created user, or `None` if seeding was skipped.
pub async fn ensure_admin_user(
    users: &dyn UserRepository,
    audit: &dyn AuditRepository,
) -> Result<Option<User>, DbError> {
    if users.any_exist().await? {
        info!("Users already exist, skipping admin seed");
        return Ok(None);
    }

    let name = std::env::var("AW_ADMIN_NAME").unwrap_or_else(|_| "admin".to_string());
    let email = std::env::var("AW_ADMIN_EMAIL").unwrap_or_else(|_| "admin@localhost".to_string());

    let admin = User::new(name, email, Role::Admin);
    users.create(&admin).await?;
    audit
        .append(&AuditLogEntry::for_user(AuditAction::UserCreated, admin.id, None))
        .await?;

    info!(email = %admin.email, "Created default admin user");
    Ok(Some(admin))
}
