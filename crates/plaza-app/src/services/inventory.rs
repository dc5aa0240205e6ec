//! # Inventory Service
//!
//! Product CRUD for the inventory screen.
//!
//! Products are hard-deleted on removal; sale lines keep their own name
//! and price snapshots, so history is unaffected.

use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use plaza_core::validation::{validate_price_cents, validate_product_name, validate_stock};
use plaza_core::{CoreError, Product};
use plaza_db::Database;

use crate::error::AppError;

/// Input for creating or editing a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub price_cents: i64,
    pub stock: i64,
}

impl ProductInput {
    fn validate(&self) -> Result<(), AppError> {
        validate_product_name(&self.name).map_err(CoreError::from)?;
        validate_price_cents(self.price_cents).map_err(CoreError::from)?;
        validate_stock(self.stock).map_err(CoreError::from)?;
        Ok(())
    }
}

/// Service for inventory management.
#[derive(Debug, Clone)]
pub struct InventoryService {
    db: Database,
}

impl InventoryService {
    /// Creates a new InventoryService.
    pub fn new(db: Database) -> Self {
        InventoryService { db }
    }

    /// Lists all products sorted by name.
    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.db.products().list().await?)
    }

    /// Creates a new product.
    pub async fn create(&self, input: ProductInput) -> Result<Product, AppError> {
        input.validate()?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            price_cents: input.price_cents,
            stock: input.stock,
            created_at: now,
            updated_at: now,
        };

        self.db.products().insert(&product).await?;

        info!(id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Updates name, price, and stock of an existing product.
    pub async fn update(&self, id: &str, input: ProductInput) -> Result<Product, AppError> {
        input.validate()?;

        let mut product = self
            .db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;

        product.name = input.name.trim().to_string();
        product.price_cents = input.price_cents;
        product.stock = input.stock;

        self.db.products().update(&product).await?;

        info!(id = %product.id, "Product updated");
        Ok(product)
    }

    /// Removes a product.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.db.products().delete(id).await?;

        info!(id = %id, "Product deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use plaza_db::DbConfig;

    async fn test_service() -> InventoryService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        InventoryService::new(db)
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let inventory = test_service().await;

        let product = inventory
            .create(ProductInput {
                name: " Soda 600ml ".to_string(),
                price_cents: 1800,
                stock: 24,
            })
            .await
            .unwrap();
        assert_eq!(product.name, "Soda 600ml");

        let updated = inventory
            .update(
                &product.id,
                ProductInput {
                    name: "Soda 600ml".to_string(),
                    price_cents: 1900,
                    stock: 20,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price_cents, 1900);
        assert_eq!(updated.stock, 20);

        inventory.delete(&product.id).await.unwrap();
        assert!(inventory.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_rejected() {
        let inventory = test_service().await;

        let err = inventory
            .create(ProductInput {
                name: "".to_string(),
                price_cents: 100,
                stock: 1,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = inventory
            .create(ProductInput {
                name: "Chips".to_string(),
                price_cents: -5,
                stock: 1,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = inventory
            .create(ProductInput {
                name: "Chips".to_string(),
                price_cents: 5,
                stock: -1,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
