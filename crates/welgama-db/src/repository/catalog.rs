//! # Catalog Repository
//!
//! Lookup tables behind the category and unit management screens.
//! Products store the names; these tables exist so the UI can offer a
//! managed list instead of free text.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use welgama_core::{Category, UnitOfMeasure};

/// Repository for category and unit lookups.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // -------------------------------------------------------------------------
    // Categories
    // -------------------------------------------------------------------------

    /// Inserts a category. Fails with a unique violation on duplicates.
    pub async fn insert_category(&self, name: &str) -> DbResult<Category> {
        debug!(name = %name, "Inserting category");

        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO categories (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(category.created_at)
            .execute(&self.pool)
            .await?;

        Ok(category)
    }

    /// Lists categories sorted by name.
    pub async fn list_categories(&self) -> DbResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name, created_at FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    /// Deletes a category by ID.
    pub async fn delete_category(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Units
    // -------------------------------------------------------------------------

    /// Inserts a unit of measure. Fails with a unique violation on duplicates.
    pub async fn insert_unit(&self, name: &str) -> DbResult<UnitOfMeasure> {
        debug!(name = %name, "Inserting unit");

        let unit = UnitOfMeasure {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO units (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&unit.id)
            .bind(&unit.name)
            .bind(unit.created_at)
            .execute(&self.pool)
            .await?;

        Ok(unit)
    }

    /// Lists units sorted by name.
    pub async fn list_units(&self) -> DbResult<Vec<UnitOfMeasure>> {
        let units =
            sqlx::query_as::<_, UnitOfMeasure>("SELECT id, name, created_at FROM units ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(units)
    }

    /// Deletes a unit by ID.
    pub async fn delete_unit(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM units WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Unit", id));
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

    #[tokio::test]
    async fn test_category_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.catalog();

        repo.insert_category("Fasteners").await.unwrap();
        repo.insert_category("Paint").await.unwrap();

        let categories = repo.list_categories().await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Fasteners");
    }

    #[tokio::test]
    async fn test_duplicate_category_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.catalog();

        repo.insert_category("Tools").await.unwrap();
        let err = repo.insert_category("Tools").await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_unit_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.catalog();

        let unit = repo.insert_unit("kg").await.unwrap();
        repo.delete_unit(&unit.id).await.unwrap();

        assert!(repo.list_units().await.unwrap().is_empty());
        assert!(matches!(
            repo.delete_unit(&unit.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
