//! # Inventory Operations
//!
//! Product CRUD, manual stock adjustments, and the category/unit catalog.
//!
//! Stock changes outside a sale always carry a mandatory reason, recorded
//! in the activity log; a quantity that changed with no explanation is
//! an audit gap.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use welgama_core::validation::{validate_name, validate_price_cents, validate_reason};
use welgama_core::{Actor, Category, CoreError, Product, UnitOfMeasure};
use welgama_db::repository::product::generate_product_id;
use welgama_db::DbError;

use crate::error::OpError;
use crate::Pos;

// =============================================================================
// Inputs
// =============================================================================

/// Fields for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub unit: String,
    pub cost_price_cents: i64,
    pub selling_price_cents: i64,
    pub quantity: i64,
    pub low_stock_threshold: i64,
}

/// Editable product fields. Stock is deliberately absent: quantity moves
/// only through sales and reasoned adjustments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: String,
    pub category: String,
    pub unit: String,
    pub cost_price_cents: i64,
    pub selling_price_cents: i64,
    pub low_stock_threshold: i64,
}

// =============================================================================
// Product Operations
// =============================================================================

impl Pos {
    /// Creates a product.
    pub async fn create_product(
        &self,
        actor: &Actor,
        input: NewProduct,
    ) -> Result<Product, OpError> {
        validate_name("name", &input.name).map_err(CoreError::from)?;
        validate_name("category", &input.category).map_err(CoreError::from)?;
        validate_name("unit", &input.unit).map_err(CoreError::from)?;
        validate_price_cents(input.cost_price_cents).map_err(CoreError::from)?;
        validate_price_cents(input.selling_price_cents).map_err(CoreError::from)?;
        if input.quantity < 0 || input.low_stock_threshold < 0 {
            return Err(OpError::validation("stock figures must not be negative"));
        }

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: input.name.trim().to_string(),
            category: input.category.trim().to_string(),
            unit: input.unit.trim().to_string(),
            cost_price_cents: input.cost_price_cents,
            selling_price_cents: input.selling_price_cents,
            quantity: input.quantity,
            low_stock_threshold: input.low_stock_threshold,
            created_at: now,
            updated_at: now,
        };

        self.db().products().insert(&product).await?;

        info!(id = %product.id, name = %product.name, "Product created");

        self.recorder().record(
            actor,
            "product.create",
            format!("Product {} added", product.name),
            serde_json::json!({ "productId": product.id, "quantity": product.quantity }),
        );

        Ok(product)
    }

    /// Updates a product's details (not its stock).
    pub async fn update_product(
        &self,
        actor: &Actor,
        product_id: &str,
        changes: ProductUpdate,
    ) -> Result<Product, OpError> {
        validate_name("name", &changes.name).map_err(CoreError::from)?;
        validate_price_cents(changes.cost_price_cents).map_err(CoreError::from)?;
        validate_price_cents(changes.selling_price_cents).map_err(CoreError::from)?;

        let mut product = self
            .db()
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        product.name = changes.name.trim().to_string();
        product.category = changes.category.trim().to_string();
        product.unit = changes.unit.trim().to_string();
        product.cost_price_cents = changes.cost_price_cents;
        product.selling_price_cents = changes.selling_price_cents;
        product.low_stock_threshold = changes.low_stock_threshold;

        self.db().products().update(&product).await?;

        self.recorder().record(
            actor,
            "product.update",
            format!("Product {} updated", product.name),
            serde_json::json!({ "productId": product.id }),
        );

        Ok(product)
    }

    /// Adjusts stock by a signed delta with a mandatory reason.
    pub async fn adjust_stock(
        &self,
        actor: &Actor,
        product_id: &str,
        delta: i64,
        reason: &str,
    ) -> Result<Product, OpError> {
        validate_reason(reason).map_err(CoreError::from)?;
        if delta == 0 {
            return Err(OpError::validation("stock adjustment must not be zero"));
        }

        let applied = self.db().products().adjust_stock(product_id, delta).await?;
        if !applied {
            // Repository guarantees existence here; zero rows means the
            // delta would have gone negative
            let product = self
                .db()
                .products()
                .get_by_id(product_id)
                .await?
                .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
            return Err(CoreError::InsufficientStock {
                name: product.name,
                available: product.quantity,
                requested: -delta,
            }
            .into());
        }

        let product = self
            .db()
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        info!(id = %product.id, delta = delta, reason = %reason, "Stock adjusted");

        self.recorder().record(
            actor,
            "inventory.adjust",
            format!("Stock of {} changed by {} ({})", product.name, delta, reason),
            serde_json::json!({
                "productId": product.id,
                "delta": delta,
                "reason": reason,
                "newQuantity": product.quantity,
            }),
        );

        Ok(product)
    }

    /// Deletes a product. Refused while any sale references it.
    pub async fn delete_product(&self, actor: &Actor, product_id: &str) -> Result<(), OpError> {
        match self.db().products().delete(product_id).await {
            Ok(()) => {
                self.recorder().record(
                    actor,
                    "product.delete",
                    format!("Product {product_id} deleted"),
                    serde_json::json!({ "productId": product_id }),
                );
                Ok(())
            }
            Err(DbError::ForeignKeyViolation { .. }) => Err(OpError::business(
                "Product appears in recorded sales and cannot be deleted",
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Lists all products.
    pub async fn list_products(&self) -> Result<Vec<Product>, OpError> {
        Ok(self.db().products().list().await?)
    }

    /// Lists products at or below their low-stock threshold.
    pub async fn low_stock_products(&self) -> Result<Vec<Product>, OpError> {
        Ok(self.db().products().list_low_stock().await?)
    }
}

// =============================================================================
// Catalog Operations
// =============================================================================

impl Pos {
    /// Adds a category.
    pub async fn add_category(&self, actor: &Actor, name: &str) -> Result<Category, OpError> {
        validate_name("category", name).map_err(CoreError::from)?;

        let category = self.db().catalog().insert_category(name).await?;

        self.recorder().record(
            actor,
            "category.create",
            format!("Category {} added", category.name),
            serde_json::json!({ "categoryId": category.id }),
        );

        Ok(category)
    }

    /// Lists categories.
    pub async fn list_categories(&self) -> Result<Vec<Category>, OpError> {
        Ok(self.db().catalog().list_categories().await?)
    }

    /// Deletes a category.
    pub async fn delete_category(&self, actor: &Actor, id: &str) -> Result<(), OpError> {
        self.db().catalog().delete_category(id).await?;

        self.recorder().record(
            actor,
            "category.delete",
            format!("Category {id} deleted"),
            serde_json::json!({ "categoryId": id }),
        );

        Ok(())
    }

    /// Adds a unit of measure.
    pub async fn add_unit(&self, actor: &Actor, name: &str) -> Result<UnitOfMeasure, OpError> {
        validate_name("unit", name).map_err(CoreError::from)?;

        let unit = self.db().catalog().insert_unit(name).await?;

        self.recorder().record(
            actor,
            "unit.create",
            format!("Unit {} added", unit.name),
            serde_json::json!({ "unitId": unit.id }),
        );

        Ok(unit)
    }

    /// Lists units.
    pub async fn list_units(&self) -> Result<Vec<UnitOfMeasure>, OpError> {
        Ok(self.db().catalog().list_units().await?)
    }

    /// Deletes a unit.
    pub async fn delete_unit(&self, actor: &Actor, id: &str) -> Result<(), OpError> {
        self.db().catalog().delete_unit(id).await?;

        self.recorder().record(
            actor,
            "unit.delete",
            format!("Unit {id} deleted"),
            serde_json::json!({ "unitId": id }),
        );

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
