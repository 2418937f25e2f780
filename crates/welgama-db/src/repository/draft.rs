//! # Draft Repository
//!
//! Staged carts. A draft is pure staging: saving one touches no stock
//! and no balance. Conversion is "load the lines, settle them, delete
//! the draft" in the operations layer.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use welgama_core::{CartLine, Draft};

const DRAFT_COLUMNS: &str = "id, customer_id, items, created_at, updated_at";

/// Repository for draft (staged cart) operations.
#[derive(Debug, Clone)]
pub struct DraftRepository {
    pool: SqlitePool,
}

impl DraftRepository {
    /// Creates a new DraftRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DraftRepository { pool }
    }

    /// Saves a new draft, serializing the cart lines to JSON.
    pub async fn save(&self, customer_id: Option<&str>, lines: &[CartLine]) -> DbResult<Draft> {
        let now = Utc::now();
        let draft = Draft {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.map(str::to_string),
            items: serde_json::to_string(lines)
                .map_err(|e| DbError::Internal(format!("draft serialization failed: {e}")))?,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %draft.id, lines = lines.len(), "Saving draft");

        sqlx::query(
            r#"
            INSERT INTO drafts (id, customer_id, items, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&draft.id)
        .bind(draft.customer_id.as_deref())
        .bind(&draft.items)
        .bind(draft.created_at)
        .bind(draft.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(draft)
    }

    /// Lists drafts, newest first.
    pub async fn list(&self) -> DbResult<Vec<Draft>> {
        let sql = format!("SELECT {DRAFT_COLUMNS} FROM drafts ORDER BY updated_at DESC");
        let drafts = sqlx::query_as::<_, Draft>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(drafts)
    }

    /// Gets a draft by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Draft>> {
        let sql = format!("SELECT {DRAFT_COLUMNS} FROM drafts WHERE id = ?1");
        let draft = sqlx::query_as::<_, Draft>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(draft)
    }

    /// Deletes a draft (after conversion, or on discard).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM drafts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Draft", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use welgama_core::DiscountType;

    fn lines() -> Vec<CartLine> {
        vec![CartLine {
            product_id: "p1".to_string(),
            quantity: 3,
            unit_price_cents: 42000,
            discount_value: 0,
            discount_type: DiscountType::Amount,
            subtotal_cents: 126000,
        }]
    }

    #[tokio::test]
    async fn test_save_and_reload_lines() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.drafts();

        let draft = repo.save(None, &lines()).await.unwrap();

        let loaded = repo.get_by_id(&draft.id).await.unwrap().unwrap();
        let parsed = loaded.lines().unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].subtotal_cents, 126000);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.drafts();

        let draft = repo.save(None, &lines()).await.unwrap();
        repo.delete(&draft.id).await.unwrap();

        assert!(repo.get_by_id(&draft.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&draft.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
