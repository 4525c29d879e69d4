//! Audit log repository.
//!
//! The audit log is append-only: this trait deliberately exposes no
//! update or delete path. Transitions write their entries inside the
//! asset repository's transaction; the standalone [`AuditRepository::append`]
//! path serves user bookkeeping and system events.

use super::pagination::CursorPage;
use super::{DbError, DbPool};
use crate::audit::{AuditAction, AuditEntryWithActor, AuditLogEntry};
use crate::auth::UserSummary;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Repository trait for audit log persistence.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Appends a standalone audit entry.
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), DbError>;

    /// Pages through an asset's trail, newest first. Fetches up to
    /// `page.fetch_limit()` rows; the caller trims.
    async fn trail_for_asset(
        &self,
        asset_id: Uuid,
        page: &CursorPage,
    ) -> Result<Vec<AuditEntryWithActor>, DbError>;

    /// Gets recent entries across all entities, newest first.
    async fn recent(&self, limit: u32) -> Result<Vec<AuditLogEntry>, DbError>;
}

/// Creates an audit repository for the given pool.
#[cfg(feature = "database")]
pub fn create_audit_repository(pool: &DbPool) -> Box<dyn AuditRepository> {
    match pool {
        DbPool::Sqlite(pool) => Box::new(SqliteAuditRepository::new(pool.clone())),
        DbPool::Postgres(pool) => Box::new(PgAuditRepository::new(pool.clone())),
    }
}

/// SQLite implementation of AuditRepository.
#[cfg(feature = "database")]
pub struct SqliteAuditRepository {
    pool: sqlx::SqlitePool,
}

#[cfg(feature = "database")]
impl SqliteAuditRepository {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[cfg(feature = "database")]
#[async_trait]
impl AuditRepository for SqliteAuditRepository {
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), DbError> {
        let metadata = entry
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        sqlx::query(
            r#"
            INSERT INTO audit_logs (id, action, entity_type, entity_id, actor_id, actor_email, metadata, asset_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.action.as_str())
        .bind(&entry.entity_type)
        .bind(&entry.entity_id)
        .bind(entry.actor_id.map(|id| id.to_string()))
        .bind(&entry.actor_email)
        .bind(&metadata)
        .bind(entry.asset_id.map(|id| id.to_string()))
        .bind(entry.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn trail_for_asset(
        &self,
        asset_id: Uuid,
        page: &CursorPage,
    ) -> Result<Vec<AuditEntryWithActor>, DbError> {
        let mut query = String::from(
            r#"
            SELECT l.id, l.action, l.entity_type, l.entity_id, l.actor_id, l.actor_email,
                   l.metadata, l.asset_id, l.created_at,
                   u.name AS actor_name, u.email AS actor_user_email
            FROM audit_logs l
            LEFT JOIN users u ON u.id = l.actor_id
            WHERE l.asset_id = ?
            "#,
        );
        if page.cursor.is_some() {
            query.push_str(
                "AND (l.created_at, l.id) < (SELECT created_at, id FROM audit_logs WHERE id = ?)\n",
            );
        }
        query.push_str("ORDER BY l.created_at DESC, l.id DESC LIMIT ?");

        let mut query_builder =
            sqlx::query_as::<_, AuditJoinRow>(&query).bind(asset_id.to_string());
        if let Some(cursor) = page.cursor {
            query_builder = query_builder.bind(cursor.to_string());
        }
        query_builder = query_builder.bind(page.fetch_limit() as i64);

        let rows = query_builder.fetch_all(&self.pool).await?;
        rows.into_iter().map(AuditEntryWithActor::try_from).collect()
    }

    async fn recent(&self, limit: u32) -> Result<Vec<AuditLogEntry>, DbError> {
        let rows: Vec<AuditRow> = sqlx::query_as(
            r#"
            SELECT id, action, entity_type, entity_id, actor_id, actor_email, metadata, asset_id, created_at
            FROM audit_logs ORDER BY created_at DESC, id DESC LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(AuditLogEntry::try_from).collect()
    }
}

/// PostgreSQL implementation of AuditRepository.
#[cfg(feature = "database")]
pub struct PgAuditRepository {
    pool: sqlx::PgPool,
}

#[cfg(feature = "database")]
impl PgAuditRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[cfg(feature = "database")]
#[async_trait]
impl AuditRepository for PgAuditRepository {
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (id, action, entity_type, entity_id, actor_id, actor_email, metadata, asset_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.id)
        .bind(entry.action.as_str())
        .bind(&entry.entity_type)
        .bind(&entry.entity_id)
        .bind(entry.actor_id)
        .bind(&entry.actor_email)
        .bind(&entry.metadata)
        .bind(entry.asset_id)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn trail_for_asset(
        &self,
        asset_id: Uuid,
        page: &CursorPage,
    ) -> Result<Vec<AuditEntryWithActor>, DbError> {
        let mut query = String::from(
            r#"
            SELECT l.id, l.action, l.entity_type, l.entity_id, l.actor_id, l.actor_email,
                   l.metadata, l.asset_id, l.created_at,
                   u.name AS actor_name, u.email AS actor_user_email
            FROM audit_logs l
            LEFT JOIN users u ON u.id = l.actor_id
            WHERE l.asset_id = $1
            "#,
        );
        if page.cursor.is_some() {
            query.push_str(
                "AND (l.created_at, l.id) < (SELECT created_at, id FROM audit_logs WHERE id = $2)\n",
            );
            query.push_str("ORDER BY l.created_at DESC, l.id DESC LIMIT $3");
        } else {
            query.push_str("ORDER BY l.created_at DESC, l.id DESC LIMIT $2");
        }

        let mut query_builder = sqlx::query_as::<_, PgAuditJoinRow>(&query).bind(asset_id);
        if let Some(cursor) = page.cursor {
            query_builder = query_builder.bind(cursor);
        }
        query_builder = query_builder.bind(page.fetch_limit() as i64);

        let rows = query_builder.fetch_all(&self.pool).await?;
        rows.into_iter().map(AuditEntryWithActor::try_from).collect()
    }

    async fn recent(&self, limit: u32) -> Result<Vec<AuditLogEntry>, DbError> {
        let rows: Vec<PgAuditRow> = sqlx::query_as(
            r#"
            SELECT id, action, entity_type, entity_id, actor_id, actor_email, metadata, asset_id, created_at
            FROM audit_logs ORDER BY created_at DESC, id DESC LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(AuditLogEntry::try_from).collect()
    }
}

// Row mapping

#[cfg(feature = "database")]
#[derive(sqlx::FromRow)]
struct AuditRow {
    id: String,
    action: String,
    entity_type: String,
    entity_id: String,
    actor_id: Option<String>,
    actor_email: Option<String>,
    metadata: Option<String>,
    asset_id: Option<String>,
    created_at: String,
}

#[cfg(feature = "database")]
impl TryFrom<AuditRow> for AuditLogEntry {
    type Error = DbError;

    fn try_from(row: AuditRow) -> Result<Self, Self::Error> {
        Ok(AuditLogEntry {
            id: super::asset_repo::parse_uuid(&row.id)?,
            action: row
                .action
                .parse::<AuditAction>()
                .map_err(DbError::Serialization)?,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            actor_id: row
                .actor_id
                .as_deref()
                .map(super::asset_repo::parse_uuid)
                .transpose()?,
            actor_email: row.actor_email,
            metadata: row
                .metadata
                .as_deref()
                .map(serde_json::from_str)
                .transpose()?,
            asset_id: row
                .asset_id
                .as_deref()
                .map(super::asset_repo::parse_uuid)
                .transpose()?,
            created_at: super::asset_repo::parse_timestamp(&row.created_at)?,
        })
    }
}

#[cfg(feature = "database")]
#[derive(sqlx::FromRow)]
struct AuditJoinRow {
    #[sqlx(flatten)]
    entry: AuditRow,
    actor_name: Option<String>,
    actor_user_email: Option<String>,
}

#[cfg(feature = "database")]
impl TryFrom<AuditJoinRow> for AuditEntryWithActor {
    type Error = DbError;

    fn try_from(row: AuditJoinRow) -> Result<Self, Self::Error> {
        let entry = AuditLogEntry::try_from(row.entry)?;
        let actor = match (entry.actor_id, row.actor_name, row.actor_user_email) {
            (Some(id), Some(name), Some(email)) => Some(UserSummary { id, name, email }),
            _ => None,
        };
        Ok(AuditEntryWithActor { entry, actor })
    }
}

#[cfg(feature = "database")]
#[derive(sqlx::FromRow)]
struct PgAuditRow {
    id: Uuid,
    action: String,
    entity_type: String,
    entity_id: String,
    actor_id: Option<Uuid>,
    actor_email: Option<String>,
    metadata: Option<serde_json::Value>,
    asset_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

#[cfg(feature = "database")]
impl TryFrom<PgAuditRow> for AuditLogEntry {
    type Error = DbError;

    fn try_from(row: PgAuditRow) -> Result<Self, Self::Error> {
        Ok(AuditLogEntry {
            id: row.id,
            action: row
                .action
                .parse::<AuditAction>()
                .map_err(DbError::Serialization)?,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            actor_id: row.actor_id,
            actor_email: row.actor_email,
            metadata: row.metadata,
            asset_id: row.asset_id,
            created_at: row.created_at,
        })
    }
}

#[cfg(feature = "database")]
#[derive(sqlx::FromRow)]
struct PgAuditJoinRow {
    #[sqlx(flatten)]
    entry: PgAuditRow,
    actor_name: Option<String>,
    actor_user_email: Option<String>,
}

#[cfg(feature = "database")]
impl TryFrom<PgAuditJoinRow> for AuditEntryWithActor {
    type Error = DbError;

    fn try_from(row: PgAuditJoinRow) -> Result<Self, Self::Error> {
        let entry = AuditLogEntry::try_from(row.entry)?;
        let actor = match (entry.actor_id, row.actor_name, row.actor_user_email) {
            (Some(id), Some(name), Some(email)) => Some(UserSummary { id, name, email }),
            _ => None,
        };
        Ok(AuditEntryWithActor { entry, actor })
    }
}
