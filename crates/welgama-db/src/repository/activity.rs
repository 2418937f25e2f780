//! # Activity Log Repository
//!
//! The append-only audit trail. This repository deliberately exposes no
//! update or delete method: once written, an entry is history.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use welgama_core::ActivityEntry;

const ACTIVITY_COLUMNS: &str =
    "id, action, description, metadata, actor_id, actor_name, created_at";

/// Repository for the append-only activity log.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    pool: SqlitePool,
}

impl ActivityRepository {
    /// Creates a new ActivityRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ActivityRepository { pool }
    }

    /// Appends one audit entry.
    pub async fn append(&self, entry: &ActivityEntry) -> DbResult<()> {
        debug!(action = %entry.action, actor = %entry.actor_id, "Appending activity entry");

        sqlx::query(
            r#"
            INSERT INTO activity_log (
                id, action, description, metadata, actor_id, actor_name, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.action)
        .bind(&entry.description)
        .bind(&entry.metadata)
        .bind(&entry.actor_id)
        .bind(&entry.actor_name)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists entries newest first, paged.
    pub async fn list(&self, limit: i64, offset: i64) -> DbResult<Vec<ActivityEntry>> {
        let sql = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activity_log \
             ORDER BY created_at DESC LIMIT ?1 OFFSET ?2"
        );
        let entries = sqlx::query_as::<_, ActivityEntry>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    /// Counts all entries (for paging and audit-gap checks).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM activity_log")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new activity entry ID.
pub fn generate_activity_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
