//! # Customer Book Operations
//!
//! Customers and their credit books: contact CRUD and the per-customer
//! view of outstanding sales the payment screen works from.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use welgama_core::balance::sale_due;
use welgama_core::validation::validate_name;
use welgama_core::{Actor, CoreError, Customer, Sale};
use welgama_db::repository::customer::generate_customer_id;
use welgama_db::DbError;

use crate::error::OpError;
use crate::Pos;

// =============================================================================
// Inputs / Responses
// =============================================================================

/// Contact fields for creating or editing a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// One outstanding sale in a customer's book.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookEntry {
    pub sale: Sale,
    pub due_cents: i64,
}

/// A customer's book: the cached balance plus each open sale's due.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBook {
    pub customer: Customer,
    pub entries: Vec<BookEntry>,
}

// =============================================================================
// Operations
// =============================================================================

impl Pos {
    /// Creates a customer with a zero opening balance.
    pub async fn create_customer(
        &self,
        actor: &Actor,
        input: CustomerInput,
    ) -> Result<Customer, OpError> {
        validate_name("name", &input.name).map_err(CoreError::from)?;

        let now = Utc::now();
        let customer = Customer {
            id: generate_customer_id(),
            name: input.name.trim().to_string(),
            phone: input.phone,
            address: input.address,
            balance_cents: 0,
            created_at: now,
            updated_at: now,
        };

        self.db().customers().insert(&customer).await?;

        info!(id = %customer.id, name = %customer.name, "Customer created");

        self.recorder().record(
            actor,
            "customer.create",
            format!("Customer {} added", customer.name),
            serde_json::json!({ "customerId": customer.id }),
        );

        Ok(customer)
    }

    /// Updates a customer's contact details (never the balance).
    pub async fn update_customer(
        &self,
        actor: &Actor,
        customer_id: &str,
        input: CustomerInput,
    ) -> Result<Customer, OpError> {
        validate_name("name", &input.name).map_err(CoreError::from)?;

        let mut customer = self
            .db()
            .customers()
            .get_by_id(customer_id)
            .await?
            .ok_or_else(|| CoreError::CustomerNotFound(customer_id.to_string()))?;

        customer.name = input.name.trim().to_string();
        customer.phone = input.phone;
        customer.address = input.address;

        self.db().customers().update(&customer).await?;

        self.recorder().record(
            actor,
            "customer.update",
            format!("Customer {} updated", customer.name),
            serde_json::json!({ "customerId": customer.id }),
        );

        Ok(customer)
    }

    /// Deletes a customer. Refused while sales or payments reference them.
    pub async fn delete_customer(&self, actor: &Actor, customer_id: &str) -> Result<(), OpError> {
        match self.db().customers().delete(customer_id).await {
            Ok(()) => {
                self.recorder().record(
                    actor,
                    "customer.delete",
                    format!("Customer {customer_id} deleted"),
                    serde_json::json!({ "customerId": customer_id }),
                );
                Ok(())
            }
            Err(DbError::ForeignKeyViolation { .. }) => Err(OpError::business(
                "Customer has recorded sales and cannot be deleted",
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Lists all customers.
    pub async fn list_customers(&self) -> Result<Vec<Customer>, OpError> {
        Ok(self.db().customers().list().await?)
    }

    /// Loads a customer's book: outstanding sales with per-sale dues,
    /// oldest first (the order payments will be applied in).
    pub async fn customer_book(&self, customer_id: &str) -> Result<CustomerBook, OpError> {
        let customer = self
            .db()
            .customers()
            .get_by_id(customer_id)
            .await?
            .ok_or_else(|| CoreError::CustomerNotFound(customer_id.to_string()))?;

        let entries = self
            .db()
            .sales()
            .list_outstanding(customer_id)
            .await?
            .into_iter()
            .map(|sale| {
                let due = sale_due(sale.total(), sale.amount_paid());
                BookEntry {
                    due_cents: due.cents(),
                    sale,
                }
            })
            .collect();

        Ok(CustomerBook { customer, entries })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{seed_product, test_actor, test_pos};
    use welgama_core::{CartLine, DiscountType};

    fn line(product_id: &str, price: i64) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            quantity: 1,
            unit_price_cents: price,
            discount_value: 0,
            discount_type: DiscountType::Amount,
            subtotal_cents: price,
        }
    }

    #[tokio::test]
    async fn test_customer_crud() {
        let pos = test_pos().await;

        let customer = pos
            .create_customer(
                &test_actor(),
                CustomerInput {
                    name: "Sunil Perera".to_string(),
                    phone: Some("0712345678".to_string()),
                    address: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(customer.balance_cents, 0);

        let updated = pos
            .update_customer(
                &test_actor(),
                &customer.id,
                CustomerInput {
                    name: "Sunil Perera".to_string(),
                    phone: Some("0719999999".to_string()),
                    address: Some("Galle Road".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("0719999999"));

        pos.delete_customer(&test_actor(), &customer.id).await.unwrap();
        assert!(pos.list_customers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_customer_with_sales_cannot_be_deleted() {
        let pos = test_pos().await;
        seed_product(&pos, "p1", 10000, 10).await;

        let customer = pos
            .create_customer(
                &test_actor(),
                CustomerInput {
                    name: "Kumara Constructions".to_string(),
                    phone: None,
                    address: None,
                },
            )
            .await
            .unwrap();

        pos.settle_credit_sale(&test_actor(), &customer.id, &[line("p1", 10000)], true)
            .await
            .unwrap();

        let err = pos
            .delete_customer(&test_actor(), &customer.id)
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::BusinessLogic);
    }

    #[tokio::test]
    async fn test_customer_book_lists_dues_oldest_first() {
        let pos = test_pos().await;
        seed_product(&pos, "p1", 10000, 10).await;
        seed_product(&pos, "p2", 5000, 10).await;

        let customer = pos
            .create_customer(
                &test_actor(),
                CustomerInput {
                    name: "Nimal Silva".to_string(),
                    phone: None,
                    address: None,
                },
            )
            .await
            .unwrap();

        pos.settle_credit_sale(&test_actor(), &customer.id, &[line("p1", 10000)], true)
            .await
            .unwrap();
        pos.settle_credit_sale(&test_actor(), &customer.id, &[line("p2", 5000)], true)
            .await
            .unwrap();

        let book = pos.customer_book(&customer.id).await.unwrap();
        assert_eq!(book.customer.balance_cents, 15000);
        assert_eq!(book.entries.len(), 2);
        assert_eq!(book.entries[0].due_cents, 10000);
        assert_eq!(book.entries[1].due_cents, 5000);
        assert!(book.entries[0].sale.created_at <= book.entries[1].sale.created_at);
    }
}
