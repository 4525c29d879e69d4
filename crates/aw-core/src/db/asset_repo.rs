//! Asset repository for database operations.
//!
//! Mutating methods enforce the lifecycle precondition as part of the
//! `UPDATE` statement itself (status in the WHERE clause), so validation
//! and write are one atomic store operation; there is no window between a
//! prior read and the write for a concurrent caller to slip through. Each
//! transition writes its audit entry inside the same transaction:
//! `Ok(None)` means zero rows matched and nothing at all was written.

use super::pool::make_like_pattern;
use super::{DbError, DbPool};
use crate::asset::{
    Asset, AssetDetail, AssetKind, AssetStatus, QueueItem, Review, ReviewDecision,
    ReviewWithReviewer,
};
use crate::audit::AuditLogEntry;
use crate::auth::UserSummary;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Sort keys accepted by the approval queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueueSort {
    CreatedAt,
    #[default]
    SubmittedAt,
    Title,
    Kind,
}

impl QueueSort {
    /// SQL expression to order by. `submitted_at` falls back to
    /// `created_at` so rows that never left draft still sort
    /// deterministically under a widened status filter.
    fn sort_expr(&self) -> &'static str {
        match self {
            QueueSort::CreatedAt => "a.created_at",
            QueueSort::SubmittedAt => "COALESCE(a.submitted_at, a.created_at)",
            QueueSort::Title => "a.title",
            QueueSort::Kind => "a.kind",
        }
    }

    /// True when the sort expression is textual rather than a timestamp.
    fn is_textual(&self) -> bool {
        matches!(self, QueueSort::Title | QueueSort::Kind)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Row-value comparison operator for keyset continuation.
    fn cursor_cmp(&self) -> &'static str {
        match self {
            SortOrder::Asc => ">",
            SortOrder::Desc => "<",
        }
    }
}

/// Filter criteria for the approval queue.
#[derive(Debug, Clone, Default)]
pub struct QueueFilter {
    /// Statuses to include. `None` means unrestricted; the engine applies
    /// the actionable-work default before calling the repository.
    pub status: Option<Vec<AssetStatus>>,
    /// Kinds to include.
    pub kinds: Option<Vec<AssetKind>>,
    /// Restrict to one assignee.
    pub assignee_id: Option<Uuid>,
    /// Case-insensitive substring search over title and description.
    pub search: Option<String>,
    pub sort_by: QueueSort,
    pub sort_order: SortOrder,
}

/// Asset counts per status for dashboard summaries, independent of
/// pagination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct StatusCounts {
    pub pending_review: u64,
    pub in_review: u64,
    pub approved: u64,
    pub rejected: u64,
}

/// Repository trait for asset persistence.
///
/// All transition methods return `Ok(None)` when the conditional update
/// matched zero rows, leaving the store untouched; the caller re-reads to
/// distinguish a missing asset from a precondition failure.
#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Inserts a new asset together with its creation audit entry.
    async fn create(&self, asset: &Asset, entry: &AuditLogEntry) -> Result<Asset, DbError>;

    /// Gets an asset by id.
    async fn get(&self, id: Uuid) -> Result<Option<Asset>, DbError>;

    /// Gets an asset with owner/assignee summaries and review history
    /// (newest first).
    async fn get_detail(&self, id: Uuid) -> Result<Option<AssetDetail>, DbError>;

    /// Lists queue rows matching the filter, at most `fetch_limit`,
    /// continuing after `cursor` when present. Ordering is stable for a
    /// fixed filter + sort (id is the tiebreak).
    async fn queue(
        &self,
        filter: &QueueFilter,
        fetch_limit: u32,
        cursor: Option<Uuid>,
    ) -> Result<Vec<QueueItem>, DbError>;

    /// Counts assets across the actionable/terminal status space.
    async fn status_counts(&self) -> Result<StatusCounts, DbError>;

    /// Fetches the subset of `ids` currently in a reviewable status.
    async fn list_reviewable(&self, ids: &[Uuid]) -> Result<Vec<Asset>, DbError>;

    /// `PENDING_REVIEW -> IN_REVIEW`, setting the assignee.
    async fn claim(
        &self,
        id: Uuid,
        assignee_id: Uuid,
        entry: &AuditLogEntry,
    ) -> Result<Option<Asset>, DbError>;

    /// `IN_REVIEW -> PENDING_REVIEW`, clearing the assignee. Conditional on
    /// the assignee still being `expected_assignee`.
    async fn release(
        &self,
        id: Uuid,
        expected_assignee: Uuid,
        entry: &AuditLogEntry,
    ) -> Result<Option<Asset>, DbError>;

    /// `DRAFT -> PENDING_REVIEW`, stamping `submitted_at`.
    async fn submit(
        &self,
        id: Uuid,
        submitted_at: DateTime<Utc>,
        entry: &AuditLogEntry,
    ) -> Result<Option<Asset>, DbError>;

    /// Any non-archived status `-> ARCHIVED`, clearing the assignee.
    async fn archive(&self, id: Uuid, entry: &AuditLogEntry) -> Result<Option<Asset>, DbError>;

    /// `ARCHIVED -> DRAFT`.
    async fn restore(&self, id: Uuid, entry: &AuditLogEntry) -> Result<Option<Asset>, DbError>;

    /// Records a disposition: inserts the review, moves the asset to
    /// `new_status` (conditional on a reviewable current status), stamps
    /// `reviewed_at`, clears the assignee, and appends the audit entry,
    /// all in one transaction.
    async fn record_review(
        &self,
        review: &Review,
        new_status: AssetStatus,
        entry: &AuditLogEntry,
    ) -> Result<Option<Asset>, DbError>;

    /// Bulk disposition in a single transaction: one review + one audit
    /// entry per asset, each update conditional on a reviewable status.
    /// Returns the number of assets actually transitioned; an asset whose
    /// status changed concurrently is skipped, not failed.
    async fn record_bulk_reviews(
        &self,
        reviews: &[Review],
        new_status: AssetStatus,
        entries: &[AuditLogEntry],
    ) -> Result<u64, DbError>;
}

/// Creates an asset repository for the given pool.
#[cfg(feature = "database")]
pub fn create_asset_repository(pool: &DbPool) -> Box<dyn AssetRepository> {
    match pool {
        DbPool::Sqlite(pool) => Box::new(SqliteAssetRepository::new(pool.clone())),
        DbPool::Postgres(pool) => Box::new(PgAssetRepository::new(pool.clone())),
    }
}

// ============================================================================
// SQLite implementation
// ============================================================================

/// SQLite implementation of AssetRepository. Ids and timestamps are stored
/// as TEXT (RFC3339 sorts lexicographically).
#[cfg(feature = "database")]
pub struct SqliteAssetRepository {
    pool: sqlx::SqlitePool,
}

#[cfg(feature = "database")]
impl SqliteAssetRepository {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(
        executor: impl sqlx::SqliteExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Asset>, DbError> {
        let row: Option<AssetRow> =
            sqlx::query_as(&format!("SELECT {ASSET_COLUMNS} FROM assets WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(executor)
                .await?;
        row.map(Asset::try_from).transpose()
    }
}

#[cfg(feature = "database")]
async fn insert_audit_sqlite(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    entry: &AuditLogEntry,
) -> Result<(), DbError> {
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
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[cfg(feature = "database")]
async fn insert_review_sqlite(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    review: &Review,
) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO reviews (id, asset_id, reviewer_id, decision, comments, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(review.id.to_string())
    .bind(review.asset_id.to_string())
    .bind(review.reviewer_id.to_string())
    .bind(review.decision.as_str())
    .bind(&review.comments)
    .bind(review.created_at.to_rfc3339())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[cfg(feature = "database")]
#[async_trait]
impl AssetRepository for SqliteAssetRepository {
    async fn create(&self, asset: &Asset, entry: &AuditLogEntry) -> Result<Asset, DbError> {
        let content = asset
            .content
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO assets (id, kind, title, description, content, version, status, owner_id, assignee_id, created_at, updated_at, submitted_at, reviewed_at, parent_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(asset.id.to_string())
        .bind(asset.kind.as_str())
        .bind(&asset.title)
        .bind(&asset.description)
        .bind(&content)
        .bind(asset.version as i64)
        .bind(asset.status.as_str())
        .bind(asset.owner_id.to_string())
        .bind(asset.assignee_id.map(|id| id.to_string()))
        .bind(asset.created_at.to_rfc3339())
        .bind(asset.updated_at.to_rfc3339())
        .bind(asset.submitted_at.map(|t| t.to_rfc3339()))
        .bind(asset.reviewed_at.map(|t| t.to_rfc3339()))
        .bind(asset.parent_id.map(|id| id.to_string()))
        .execute(&mut *tx)
        .await?;

        insert_audit_sqlite(&mut tx, entry).await?;
        tx.commit().await?;
        Ok(asset.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Asset>, DbError> {
        Self::fetch(&self.pool, id).await
    }

    async fn get_detail(&self, id: Uuid) -> Result<Option<AssetDetail>, DbError> {
        let Some(asset) = self.get(id).await? else {
            return Ok(None);
        };

        let owner = fetch_summary_sqlite(&self.pool, Some(asset.owner_id)).await?;
        let assignee = fetch_summary_sqlite(&self.pool, asset.assignee_id).await?;

        let rows: Vec<ReviewJoinRow> = sqlx::query_as(
            r#"
            SELECT r.id, r.asset_id, r.reviewer_id, r.decision, r.comments, r.created_at,
                   u.name AS reviewer_name, u.email AS reviewer_email
            FROM reviews r
            LEFT JOIN users u ON u.id = r.reviewer_id
            WHERE r.asset_id = ?
            ORDER BY r.created_at DESC, r.id DESC
            "#,
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let reviews = rows
            .into_iter()
            .map(ReviewWithReviewer::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(AssetDetail {
            asset,
            owner,
            assignee,
            reviews,
        }))
    }

    async fn queue(
        &self,
        filter: &QueueFilter,
        fetch_limit: u32,
        cursor: Option<Uuid>,
    ) -> Result<Vec<QueueItem>, DbError> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(statuses) = &filter.status {
            let marks = vec!["?"; statuses.len()].join(", ");
            clauses.push(format!("a.status IN ({marks})"));
            values.extend(statuses.iter().map(|s| s.as_str().to_string()));
        }
        if let Some(kinds) = &filter.kinds {
            let marks = vec!["?"; kinds.len()].join(", ");
            clauses.push(format!("a.kind IN ({marks})"));
            values.extend(kinds.iter().map(|k| k.as_str().to_string()));
        }
        if let Some(assignee_id) = filter.assignee_id {
            clauses.push("a.assignee_id = ?".to_string());
            values.push(assignee_id.to_string());
        }
        if let Some(search) = &filter.search {
            let pattern = make_like_pattern(search);
            clauses.push(
                r"(a.title LIKE ? ESCAPE '\' OR a.description LIKE ? ESCAPE '\')".to_string(),
            );
            values.push(pattern.clone());
            values.push(pattern);
        }

        let sort = filter.sort_by.sort_expr();
        if let Some(cursor_id) = cursor {
            // Keyset continuation: position strictly after the cursor row
            // in (sort value, id) order.
            let cursor_sort: Option<(String,)> =
                sqlx::query_as(&format!("SELECT {sort} FROM assets a WHERE a.id = ?"))
                    .bind(cursor_id.to_string())
                    .fetch_optional(&self.pool)
                    .await?;
            if let Some((sort_value,)) = cursor_sort {
                let cmp = filter.sort_order.cursor_cmp();
                clauses.push(format!("({sort}, a.id) {cmp} (?, ?)"));
                values.push(sort_value);
                values.push(cursor_id.to_string());
            }
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let dir = filter.sort_order.as_sql();
        let query = format!(
            r#"
            SELECT {ASSET_COLUMNS_A},
                   o.name AS owner_name, o.email AS owner_email,
                   u.name AS assignee_name, u.email AS assignee_email,
                   (SELECT COUNT(*) FROM reviews r WHERE r.asset_id = a.id) AS review_count
            FROM assets a
            LEFT JOIN users o ON o.id = a.owner_id
            LEFT JOIN users u ON u.id = a.assignee_id
            {where_sql}
            ORDER BY {sort} {dir}, a.id {dir}
            LIMIT ?
            "#
        );

        let mut query_builder = sqlx::query_as::<_, QueueRow>(&query);
        for value in &values {
            query_builder = query_builder.bind(value);
        }
        query_builder = query_builder.bind(fetch_limit as i64);

        let rows: Vec<QueueRow> = query_builder.fetch_all(&self.pool).await?;
        rows.into_iter().map(QueueItem::try_from).collect()
    }

    async fn status_counts(&self) -> Result<StatusCounts, DbError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT status, COUNT(*) FROM assets
            WHERE status IN ('PENDING_REVIEW', 'IN_REVIEW', 'APPROVED', 'REJECTED')
            GROUP BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(counts_from_rows(rows))
    }

    async fn list_reviewable(&self, ids: &[Uuid]) -> Result<Vec<Asset>, DbError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let marks = vec!["?"; ids.len()].join(", ");
        let query = format!(
            "SELECT {ASSET_COLUMNS} FROM assets WHERE id IN ({marks}) AND status IN ('PENDING_REVIEW', 'IN_REVIEW')"
        );
        let mut query_builder = sqlx::query_as::<_, AssetRow>(&query);
        for id in ids {
            query_builder = query_builder.bind(id.to_string());
        }
        let rows = query_builder.fetch_all(&self.pool).await?;
        rows.into_iter().map(Asset::try_from).collect()
    }

    async fn claim(
        &self,
        id: Uuid,
        assignee_id: Uuid,
        entry: &AuditLogEntry,
    ) -> Result<Option<Asset>, DbError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE assets SET status = 'IN_REVIEW', assignee_id = ?, updated_at = ?
            WHERE id = ? AND status = 'PENDING_REVIEW'
            "#,
        )
        .bind(assignee_id.to_string())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        insert_audit_sqlite(&mut tx, entry).await?;
        let asset = Self::fetch(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(asset)
    }

    async fn release(
        &self,
        id: Uuid,
        expected_assignee: Uuid,
        entry: &AuditLogEntry,
    ) -> Result<Option<Asset>, DbError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE assets SET status = 'PENDING_REVIEW', assignee_id = NULL, updated_at = ?
            WHERE id = ? AND status = 'IN_REVIEW' AND assignee_id = ?
            "#,
        )
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .bind(expected_assignee.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        insert_audit_sqlite(&mut tx, entry).await?;
        let asset = Self::fetch(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(asset)
    }

    async fn submit(
        &self,
        id: Uuid,
        submitted_at: DateTime<Utc>,
        entry: &AuditLogEntry,
    ) -> Result<Option<Asset>, DbError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE assets SET status = 'PENDING_REVIEW', submitted_at = ?, updated_at = ?
            WHERE id = ? AND status = 'DRAFT'
            "#,
        )
        .bind(submitted_at.to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        insert_audit_sqlite(&mut tx, entry).await?;
        let asset = Self::fetch(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(asset)
    }

    async fn archive(&self, id: Uuid, entry: &AuditLogEntry) -> Result<Option<Asset>, DbError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE assets SET status = 'ARCHIVED', assignee_id = NULL, updated_at = ?
            WHERE id = ? AND status != 'ARCHIVED'
            "#,
        )
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        insert_audit_sqlite(&mut tx, entry).await?;
        let asset = Self::fetch(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(asset)
    }

    async fn restore(&self, id: Uuid, entry: &AuditLogEntry) -> Result<Option<Asset>, DbError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE assets SET status = 'DRAFT', updated_at = ?
            WHERE id = ? AND status = 'ARCHIVED'
            "#,
        )
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        insert_audit_sqlite(&mut tx, entry).await?;
        let asset = Self::fetch(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(asset)
    }

    async fn record_review(
        &self,
        review: &Review,
        new_status: AssetStatus,
        entry: &AuditLogEntry,
    ) -> Result<Option<Asset>, DbError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE assets SET status = ?, reviewed_at = ?, assignee_id = NULL, updated_at = ?
            WHERE id = ? AND status IN ('PENDING_REVIEW', 'IN_REVIEW')
            "#,
        )
        .bind(new_status.as_str())
        .bind(review.created_at.to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .bind(review.asset_id.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        insert_review_sqlite(&mut tx, review).await?;
        insert_audit_sqlite(&mut tx, entry).await?;
        let asset = Self::fetch(&mut *tx, review.asset_id).await?;
        tx.commit().await?;
        Ok(asset)
    }

    async fn record_bulk_reviews(
        &self,
        reviews: &[Review],
        new_status: AssetStatus,
        entries: &[AuditLogEntry],
    ) -> Result<u64, DbError> {
        debug_assert_eq!(reviews.len(), entries.len());
        let mut tx = self.pool.begin().await?;
        let mut count = 0u64;

        for (review, entry) in reviews.iter().zip(entries) {
            let result = sqlx::query(
                r#"
                UPDATE assets SET status = ?, reviewed_at = ?, assignee_id = NULL, updated_at = ?
                WHERE id = ? AND status IN ('PENDING_REVIEW', 'IN_REVIEW')
                "#,
            )
            .bind(new_status.as_str())
            .bind(review.created_at.to_rfc3339())
            .bind(Utc::now().to_rfc3339())
            .bind(review.asset_id.to_string())
            .execute(&mut *tx)
            .await?;

            // Skip assets whose status changed since the qualifying fetch;
            // the count reflects what actually transitioned.
            if result.rows_affected() == 0 {
                continue;
            }
            insert_review_sqlite(&mut tx, review).await?;
            insert_audit_sqlite(&mut tx, entry).await?;
            count += 1;
        }

        tx.commit().await?;
        Ok(count)
    }
}

#[cfg(feature = "database")]
async fn fetch_summary_sqlite(
    pool: &sqlx::SqlitePool,
    id: Option<Uuid>,
) -> Result<Option<UserSummary>, DbError> {
    let Some(id) = id else {
        return Ok(None);
    };
    let row: Option<(String, String, String)> =
        sqlx::query_as("SELECT id, name, email FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(pool)
            .await?;
    row.map(|(id, name, email)| {
        Ok(UserSummary {
            id: parse_uuid(&id)?,
            name,
            email,
        })
    })
    .transpose()
}

// ============================================================================
// PostgreSQL implementation
// ============================================================================

/// PostgreSQL implementation of AssetRepository with natively typed
/// columns (UUID, TIMESTAMPTZ, JSONB).
#[cfg(feature = "database")]
pub struct PgAssetRepository {
    pool: sqlx::PgPool,
}

#[cfg(feature = "database")]
enum PgBind {
    Text(String),
    Id(Uuid),
    Time(DateTime<Utc>),
}

#[cfg(feature = "database")]
impl PgAssetRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(
        executor: impl sqlx::PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Asset>, DbError> {
        let row: Option<PgAssetRow> =
            sqlx::query_as(&format!("SELECT {ASSET_COLUMNS} FROM assets WHERE id = $1"))
                .bind(id)
                .fetch_optional(executor)
                .await?;
        row.map(Asset::try_from).transpose()
    }
}

#[cfg(feature = "database")]
async fn insert_audit_pg(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    entry: &AuditLogEntry,
) -> Result<(), DbError> {
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
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[cfg(feature = "database")]
async fn insert_review_pg(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    review: &Review,
) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO reviews (id, asset_id, reviewer_id, decision, comments, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(review.id)
    .bind(review.asset_id)
    .bind(review.reviewer_id)
    .bind(review.decision.as_str())
    .bind(&review.comments)
    .bind(review.created_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[cfg(feature = "database")]
#[async_trait]
impl AssetRepository for PgAssetRepository {
    async fn create(&self, asset: &Asset, entry: &AuditLogEntry) -> Result<Asset, DbError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO assets (id, kind, title, description, content, version, status, owner_id, assignee_id, created_at, updated_at, submitted_at, reviewed_at, parent_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(asset.id)
        .bind(asset.kind.as_str())
        .bind(&asset.title)
        .bind(&asset.description)
        .bind(&asset.content)
        .bind(asset.version as i32)
        .bind(asset.status.as_str())
        .bind(asset.owner_id)
        .bind(asset.assignee_id)
        .bind(asset.created_at)
        .bind(asset.updated_at)
        .bind(asset.submitted_at)
        .bind(asset.reviewed_at)
        .bind(asset.parent_id)
        .execute(&mut *tx)
        .await?;

        insert_audit_pg(&mut tx, entry).await?;
        tx.commit().await?;
        Ok(asset.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Asset>, DbError> {
        Self::fetch(&self.pool, id).await
    }

    async fn get_detail(&self, id: Uuid) -> Result<Option<AssetDetail>, DbError> {
        let Some(asset) = self.get(id).await? else {
            return Ok(None);
        };

        let owner = fetch_summary_pg(&self.pool, Some(asset.owner_id)).await?;
        let assignee = fetch_summary_pg(&self.pool, asset.assignee_id).await?;

        let rows: Vec<PgReviewJoinRow> = sqlx::query_as(
            r#"
            SELECT r.id, r.asset_id, r.reviewer_id, r.decision, r.comments, r.created_at,
                   u.name AS reviewer_name, u.email AS reviewer_email
            FROM reviews r
            LEFT JOIN users u ON u.id = r.reviewer_id
            WHERE r.asset_id = $1
            ORDER BY r.created_at DESC, r.id DESC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let reviews = rows
            .into_iter()
            .map(ReviewWithReviewer::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(AssetDetail {
            asset,
            owner,
            assignee,
            reviews,
        }))
    }

    async fn queue(
        &self,
        filter: &QueueFilter,
        fetch_limit: u32,
        cursor: Option<Uuid>,
    ) -> Result<Vec<QueueItem>, DbError> {
        let mut clauses: Vec<String> = Vec::new();
        let mut binds: Vec<PgBind> = Vec::new();
        let mut next_placeholder = {
            let mut n = 0usize;
            move || {
                n += 1;
                format!("${n}")
            }
        };

        if let Some(statuses) = &filter.status {
            let marks: Vec<String> = statuses.iter().map(|_| next_placeholder()).collect();
            clauses.push(format!("a.status IN ({})", marks.join(", ")));
            binds.extend(
                statuses
                    .iter()
                    .map(|s| PgBind::Text(s.as_str().to_string())),
            );
        }
        if let Some(kinds) = &filter.kinds {
            let marks: Vec<String> = kinds.iter().map(|_| next_placeholder()).collect();
            clauses.push(format!("a.kind IN ({})", marks.join(", ")));
            binds.extend(kinds.iter().map(|k| PgBind::Text(k.as_str().to_string())));
        }
        if let Some(assignee_id) = filter.assignee_id {
            clauses.push(format!("a.assignee_id = {}", next_placeholder()));
            binds.push(PgBind::Id(assignee_id));
        }
        if let Some(search) = &filter.search {
            let pattern = make_like_pattern(search);
            let p1 = next_placeholder();
            let p2 = next_placeholder();
            clauses.push(format!(
                r"(a.title ILIKE {p1} ESCAPE '\' OR a.description ILIKE {p2} ESCAPE '\')"
            ));
            binds.push(PgBind::Text(pattern.clone()));
            binds.push(PgBind::Text(pattern));
        }

        let sort = filter.sort_by.sort_expr();
        if let Some(cursor_id) = cursor {
            let cmp = filter.sort_order.cursor_cmp();
            if filter.sort_by.is_textual() {
                let row: Option<(String,)> =
                    sqlx::query_as(&format!("SELECT {sort} FROM assets a WHERE a.id = $1"))
                        .bind(cursor_id)
                        .fetch_optional(&self.pool)
                        .await?;
                if let Some((sort_value,)) = row {
                    let p1 = next_placeholder();
                    let p2 = next_placeholder();
                    clauses.push(format!("({sort}, a.id) {cmp} ({p1}, {p2})"));
                    binds.push(PgBind::Text(sort_value));
                    binds.push(PgBind::Id(cursor_id));
                }
            } else {
                let row: Option<(DateTime<Utc>,)> =
                    sqlx::query_as(&format!("SELECT {sort} FROM assets a WHERE a.id = $1"))
                        .bind(cursor_id)
                        .fetch_optional(&self.pool)
                        .await?;
                if let Some((sort_value,)) = row {
                    let p1 = next_placeholder();
                    let p2 = next_placeholder();
                    clauses.push(format!("({sort}, a.id) {cmp} ({p1}, {p2})"));
                    binds.push(PgBind::Time(sort_value));
                    binds.push(PgBind::Id(cursor_id));
                }
            }
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let dir = filter.sort_order.as_sql();
        let limit_placeholder = next_placeholder();
        let query = format!(
            r#"
            SELECT {ASSET_COLUMNS_A},
                   o.name AS owner_name, o.email AS owner_email,
                   u.name AS assignee_name, u.email AS assignee_email,
                   (SELECT COUNT(*) FROM reviews r WHERE r.asset_id = a.id) AS review_count
            FROM assets a
            LEFT JOIN users o ON o.id = a.owner_id
            LEFT JOIN users u ON u.id = a.assignee_id
            {where_sql}
            ORDER BY {sort} {dir}, a.id {dir}
            LIMIT {limit_placeholder}
            "#
        );

        let mut query_builder = sqlx::query_as::<_, PgQueueRow>(&query);
        for bind in &binds {
            query_builder = match bind {
                PgBind::Text(v) => query_builder.bind(v),
                PgBind::Id(v) => query_builder.bind(v),
                PgBind::Time(v) => query_builder.bind(v),
            };
        }
        query_builder = query_builder.bind(fetch_limit as i64);

        let rows: Vec<PgQueueRow> = query_builder.fetch_all(&self.pool).await?;
        rows.into_iter().map(QueueItem::try_from).collect()
    }

    async fn status_counts(&self) -> Result<StatusCounts, DbError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT status, COUNT(*) FROM assets
            WHERE status IN ('PENDING_REVIEW', 'IN_REVIEW', 'APPROVED', 'REJECTED')
            GROUP BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(counts_from_rows(rows))
    }

    async fn list_reviewable(&self, ids: &[Uuid]) -> Result<Vec<Asset>, DbError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<PgAssetRow> = sqlx::query_as(&format!(
            "SELECT {ASSET_COLUMNS} FROM assets WHERE id = ANY($1) AND status IN ('PENDING_REVIEW', 'IN_REVIEW')"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Asset::try_from).collect()
    }

    async fn claim(
        &self,
        id: Uuid,
        assignee_id: Uuid,
        entry: &AuditLogEntry,
    ) -> Result<Option<Asset>, DbError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE assets SET status = 'IN_REVIEW', assignee_id = $1, updated_at = $2
            WHERE id = $3 AND status = 'PENDING_REVIEW'
            "#,
        )
        .bind(assignee_id)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        insert_audit_pg(&mut tx, entry).await?;
        let asset = Self::fetch(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(asset)
    }

    async fn release(
        &self,
        id: Uuid,
        expected_assignee: Uuid,
        entry: &AuditLogEntry,
    ) -> Result<Option<Asset>, DbError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE assets SET status = 'PENDING_REVIEW', assignee_id = NULL, updated_at = $1
            WHERE id = $2 AND status = 'IN_REVIEW' AND assignee_id = $3
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .bind(expected_assignee)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        insert_audit_pg(&mut tx, entry).await?;
        let asset = Self::fetch(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(asset)
    }

    async fn submit(
        &self,
        id: Uuid,
        submitted_at: DateTime<Utc>,
        entry: &AuditLogEntry,
    ) -> Result<Option<Asset>, DbError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE assets SET status = 'PENDING_REVIEW', submitted_at = $1, updated_at = $2
            WHERE id = $3 AND status = 'DRAFT'
            "#,
        )
        .bind(submitted_at)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        insert_audit_pg(&mut tx, entry).await?;
        let asset = Self::fetch(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(asset)
    }

    async fn archive(&self, id: Uuid, entry: &AuditLogEntry) -> Result<Option<Asset>, DbError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE assets SET status = 'ARCHIVED', assignee_id = NULL, updated_at = $1
            WHERE id = $2 AND status != 'ARCHIVED'
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        insert_audit_pg(&mut tx, entry).await?;
        let asset = Self::fetch(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(asset)
    }

    async fn restore(&self, id: Uuid, entry: &AuditLogEntry) -> Result<Option<Asset>, DbError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE assets SET status = 'DRAFT', updated_at = $1
            WHERE id = $2 AND status = 'ARCHIVED'
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        insert_audit_pg(&mut tx, entry).await?;
        let asset = Self::fetch(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(asset)
    }

    async fn record_review(
        &self,
        review: &Review,
        new_status: AssetStatus,
        entry: &AuditLogEntry,
    ) -> Result<Option<Asset>, DbError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE assets SET status = $1, reviewed_at = $2, assignee_id = NULL, updated_at = $3
            WHERE id = $4 AND status IN ('PENDING_REVIEW', 'IN_REVIEW')
            "#,
        )
        .bind(new_status.as_str())
        .bind(review.created_at)
        .bind(Utc::now())
        .bind(review.asset_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        insert_review_pg(&mut tx, review).await?;
        insert_audit_pg(&mut tx, entry).await?;
        let asset = Self::fetch(&mut *tx, review.asset_id).await?;
        tx.commit().await?;
        Ok(asset)
    }

    async fn record_bulk_reviews(
        &self,
        reviews: &[Review],
        new_status: AssetStatus,
        entries: &[AuditLogEntry],
    ) -> Result<u64, DbError> {
        debug_assert_eq!(reviews.len(), entries.len());
        let mut tx = self.pool.begin().await?;
        let mut count = 0u64;

        for (review, entry) in reviews.iter().zip(entries) {
            let result = sqlx::query(
                r#"
                UPDATE assets SET status = $1, reviewed_at = $2, assignee_id = NULL, updated_at = $3
                WHERE id = $4 AND status IN ('PENDING_REVIEW', 'IN_REVIEW')
                "#,
            )
            .bind(new_status.as_str())
            .bind(review.created_at)
            .bind(Utc::now())
            .bind(review.asset_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                continue;
            }
            insert_review_pg(&mut tx, review).await?;
            insert_audit_pg(&mut tx, entry).await?;
            count += 1;
        }

        tx.commit().await?;
        Ok(count)
    }
}

#[cfg(feature = "database")]
async fn fetch_summary_pg(
    pool: &sqlx::PgPool,
    id: Option<Uuid>,
) -> Result<Option<UserSummary>, DbError> {
    let Some(id) = id else {
        return Ok(None);
    };
    let row: Option<(Uuid, String, String)> =
        sqlx::query_as("SELECT id, name, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(id, name, email)| UserSummary { id, name, email }))
}

// ============================================================================
// Row mapping
// ============================================================================

#[cfg(feature = "database")]
const ASSET_COLUMNS: &str = "id, kind, title, description, content, version, status, owner_id, assignee_id, created_at, updated_at, submitted_at, reviewed_at, parent_id";

#[cfg(feature = "database")]
const ASSET_COLUMNS_A: &str = "a.id, a.kind, a.title, a.description, a.content, a.version, a.status, a.owner_id, a.assignee_id, a.created_at, a.updated_at, a.submitted_at, a.reviewed_at, a.parent_id";

#[cfg(feature = "database")]
pub(super) fn parse_uuid(s: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::Serialization(format!("invalid uuid '{s}': {e}")))
}

#[cfg(feature = "database")]
pub(super) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DbError::Serialization(format!("invalid timestamp '{s}': {e}")))
}

#[cfg(feature = "database")]
fn counts_from_rows(rows: Vec<(String, i64)>) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for (status, count) in rows {
        let count = count as u64;
        match status.as_str() {
            "PENDING_REVIEW" => counts.pending_review = count,
            "IN_REVIEW" => counts.in_review = count,
            "APPROVED" => counts.approved = count,
            "REJECTED" => counts.rejected = count,
            _ => {}
        }
    }
    counts
}

#[cfg(feature = "database")]
#[derive(sqlx::FromRow)]
struct AssetRow {
    id: String,
    kind: String,
    title: String,
    description: Option<String>,
    content: Option<String>,
    version: i64,
    status: String,
    owner_id: String,
    assignee_id: Option<String>,
    created_at: String,
    updated_at: String,
    submitted_at: Option<String>,
    reviewed_at: Option<String>,
    parent_id: Option<String>,
}

#[cfg(feature = "database")]
impl TryFrom<AssetRow> for Asset {
    type Error = DbError;

    fn try_from(row: AssetRow) -> Result<Self, Self::Error> {
        Ok(Asset {
            id: parse_uuid(&row.id)?,
            kind: row
                .kind
                .parse::<AssetKind>()
                .map_err(DbError::Serialization)?,
            title: row.title,
            description: row.description,
            content: row
                .content
                .as_deref()
                .map(serde_json::from_str)
                .transpose()?,
            version: row.version as u32,
            status: row
                .status
                .parse::<AssetStatus>()
                .map_err(DbError::Serialization)?,
            owner_id: parse_uuid(&row.owner_id)?,
            assignee_id: row.assignee_id.as_deref().map(parse_uuid).transpose()?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
            submitted_at: row
                .submitted_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            reviewed_at: row
                .reviewed_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            parent_id: row.parent_id.as_deref().map(parse_uuid).transpose()?,
        })
    }
}

#[cfg(feature = "database")]
#[derive(sqlx::FromRow)]
struct QueueRow {
    #[sqlx(flatten)]
    asset: AssetRow,
    owner_name: Option<String>,
    owner_email: Option<String>,
    assignee_name: Option<String>,
    assignee_email: Option<String>,
    review_count: i64,
}

#[cfg(feature = "database")]
impl TryFrom<QueueRow> for QueueItem {
    type Error = DbError;

    fn try_from(row: QueueRow) -> Result<Self, Self::Error> {
        let asset = Asset::try_from(row.asset)?;
        let owner = match (row.owner_name, row.owner_email) {
            (Some(name), Some(email)) => Some(UserSummary {
                id: asset.owner_id,
                name,
                email,
            }),
            _ => None,
        };
        let assignee = match (asset.assignee_id, row.assignee_name, row.assignee_email) {
            (Some(id), Some(name), Some(email)) => Some(UserSummary { id, name, email }),
            _ => None,
        };
        Ok(QueueItem {
            asset,
            owner,
            assignee,
            review_count: row.review_count as u64,
        })
    }
}

#[cfg(feature = "database")]
#[derive(sqlx::FromRow)]
struct ReviewJoinRow {
    id: String,
    asset_id: String,
    reviewer_id: String,
    decision: String,
    comments: Option<String>,
    created_at: String,
    reviewer_name: Option<String>,
    reviewer_email: Option<String>,
}

#[cfg(feature = "database")]
impl TryFrom<ReviewJoinRow> for ReviewWithReviewer {
    type Error = DbError;

    fn try_from(row: ReviewJoinRow) -> Result<Self, Self::Error> {
        let reviewer_id = parse_uuid(&row.reviewer_id)?;
        let reviewer = match (row.reviewer_name, row.reviewer_email) {
            (Some(name), Some(email)) => Some(UserSummary {
                id: reviewer_id,
                name,
                email,
            }),
            _ => None,
        };
        Ok(ReviewWithReviewer {
            review: Review {
                id: parse_uuid(&row.id)?,
                asset_id: parse_uuid(&row.asset_id)?,
                reviewer_id,
                decision: row
                    .decision
                    .parse::<ReviewDecision>()
                    .map_err(DbError::Serialization)?,
                comments: row.comments,
                created_at: parse_timestamp(&row.created_at)?,
            },
            reviewer,
        })
    }
}

#[cfg(feature = "database")]
#[derive(sqlx::FromRow)]
struct PgAssetRow {
    id: Uuid,
    kind: String,
    title: String,
    description: Option<String>,
    content: Option<serde_json::Value>,
    version: i32,
    status: String,
    owner_id: Uuid,
    assignee_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
    reviewed_at: Option<DateTime<Utc>>,
    parent_id: Option<Uuid>,
}

#[cfg(feature = "database")]
impl TryFrom<PgAssetRow> for Asset {
    type Error = DbError;

    fn try_from(row: PgAssetRow) -> Result<Self, Self::Error> {
        Ok(Asset {
            id: row.id,
            kind: row
                .kind
                .parse::<AssetKind>()
                .map_err(DbError::Serialization)?,
            title: row.title,
            description: row.description,
            content: row.content,
            version: row.version as u32,
            status: row
                .status
                .parse::<AssetStatus>()
                .map_err(DbError::Serialization)?,
            owner_id: row.owner_id,
            assignee_id: row.assignee_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            submitted_at: row.submitted_at,
            reviewed_at: row.reviewed_at,
            parent_id: row.parent_id,
        })
    }
}

#[cfg(feature = "database")]
#[derive(sqlx::FromRow)]
struct PgQueueRow {
    #[sqlx(flatten)]
    asset: PgAssetRow,
    owner_name: Option<String>,
    owner_email: Option<String>,
    assignee_name: Option<String>,
    assignee_email: Option<String>,
    review_count: i64,
}

#[cfg(feature = "database")]
impl TryFrom<PgQueueRow> for QueueItem {
    type Error = DbError;

    fn try_from(row: PgQueueRow) -> Result<Self, Self::Error> {
        let asset = Asset::try_from(row.asset)?;
        let owner = match (row.owner_name, row.owner_email) {
            (Some(name), Some(email)) => Some(UserSummary {
                id: asset.owner_id,
                name,
                email,
            }),
            _ => None,
        };
        let assignee = match (asset.assignee_id, row.assignee_name, row.assignee_email) {
            (Some(id), Some(name), Some(email)) => Some(UserSummary { id, name, email }),
            _ => None,
        };
        Ok(QueueItem {
            asset,
            owner,
            assignee,
            review_count: row.review_count as u64,
        })
    }
}

#[cfg(feature = "database")]
#[derive(sqlx::FromRow)]
struct PgReviewJoinRow {
    id: Uuid,
    asset_id: Uuid,
    reviewer_id: Uuid,
    decision: String,
    comments: Option<String>,
    created_at: DateTime<Utc>,
    reviewer_name: Option<String>,
    reviewer_email: Option<String>,
}

#[cfg(feature = "database")]
impl TryFrom<PgReviewJoinRow> for ReviewWithReviewer {
    type Error = DbError;

    fn try_from(row: PgReviewJoinRow) -> Result<Self, Self::Error> {
        let reviewer = match (row.reviewer_name, row.reviewer_email) {
            (Some(name), Some(email)) => Some(UserSummary {
                id: row.reviewer_id,
                name,
                email,
            }),
            _ => None,
        };
        Ok(ReviewWithReviewer {
            review: Review {
                id: row.id,
                asset_id: row.asset_id,
                reviewer_id: row.reviewer_id,
                decision: row
                    .decision
                    .parse::<ReviewDecision>()
                    .map_err(DbError::Serialization)?,
                comments: row.comments,
                created_at: row.created_at,
            },
            reviewer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_sorts_by_submission_descending() {
        let filter = QueueFilter::default();
        assert_eq!(filter.sort_by, QueueSort::SubmittedAt);
        assert_eq!(filter.sort_order, SortOrder::Desc);
        assert!(filter.status.is_none());
    }

    #[test]
    fn cursor_comparison_matches_direction() {
        assert_eq!(SortOrder::Desc.cursor_cmp(), "<");
        assert_eq!(SortOrder::Asc.cursor_cmp(), ">");
    }
}
