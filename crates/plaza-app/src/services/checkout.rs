//! # Checkout Service
//!
//! Finalizes store sales from draft lines.
//!
//! ## Finalize Flow
//! ```text
//! draft lines (product_id + quantity)
//!      │
//!      ▼
//! validate: non-empty, sane quantities
//!      │
//!      ▼
//! load products, check stock per line
//!      │
//!      ▼
//! snapshot name/price, compute totals in cents
//!      │
//!      ▼
//! ONE transaction: header + lines + stock decrements
//! ```

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use plaza_core::validation::validate_quantity;
use plaza_core::{CoreError, Sale, SaleLine, Session, ValidationError, MAX_SALE_LINES};
use plaza_db::{Database, LogCategory, LogLevel};

use crate::error::AppError;

/// One line of a sale being rung up.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDraftLine {
    pub product_id: String,
    pub quantity: i64,
}

/// Service for finalizing sales.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    db: Database,
}

impl CheckoutService {
    /// Creates a new CheckoutService.
    pub fn new(db: Database) -> Self {
        CheckoutService { db }
    }

    /// Finalizes a sale: validates, snapshots products, and writes the
    /// whole sale atomically.
    ///
    /// ## Errors
    /// - `ValidationError` for empty or oversized drafts
    /// - `NotFound` for unknown products
    /// - `InsufficientStock` when a line exceeds available stock
    pub async fn finalize_sale(
        &self,
        draft: &[SaleDraftLine],
        session: &Session,
    ) -> Result<Sale, AppError> {
        if draft.is_empty() {
            return Err(CoreError::EmptySale.into());
        }
        if draft.len() > MAX_SALE_LINES {
            return Err(CoreError::Validation(ValidationError::OutOfRange {
                field: "lines".to_string(),
                min: 1,
                max: MAX_SALE_LINES as i64,
            })
            .into());
        }

        let sale_id = Uuid::new_v4().to_string();
        let mut lines = Vec::with_capacity(draft.len());
        let mut total_cents: i64 = 0;

        for draft_line in draft {
            validate_quantity(draft_line.quantity).map_err(CoreError::from)?;

            let product = self
                .db
                .products()
                .get_by_id(&draft_line.product_id)
                .await?
                .ok_or_else(|| CoreError::ProductNotFound(draft_line.product_id.clone()))?;

            if !product.can_sell(draft_line.quantity) {
                return Err(CoreError::InsufficientStock {
                    name: product.name,
                    available: product.stock,
                    requested: draft_line.quantity,
                }
                .into());
            }

            let line_total = product.price().multiply_quantity(draft_line.quantity);
            total_cents += line_total.cents();

            lines.push(SaleLine {
                id: Uuid::new_v4().to_string(),
                sale_id: sale_id.clone(),
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                quantity: draft_line.quantity,
                unit_price_cents: product.price_cents,
                line_total_cents: line_total.cents(),
            });
        }

        let sale = Sale {
            id: sale_id,
            total_cents,
            created_at: Utc::now(),
            user_id: session.user_id.clone(),
            user_name: session.full_name.clone(),
        };

        self.db.sales().create_with_lines(&sale, &lines).await?;

        info!(sale_id = %sale.id, total = %sale.total(), lines = lines.len(), "Sale finalized");

        let details = serde_json::json!({
            "saleId": sale.id,
            "totalCents": sale.total_cents,
            "lines": lines.len(),
        });
        if let Err(e) = self
            .db
            .logs()
            .append(
                LogLevel::Info,
                LogCategory::Sales,
                "Sale finalized",
                Some(&details.to_string()),
                Some(session),
            )
            .await
        {
            warn!("Audit log write failed: {}", e);
        }

        Ok(sale)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use plaza_core::{Product, Role};
    use plaza_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn session() -> Session {
        Session {
            user_id: "u-1".to_string(),
            username: "clerk".to_string(),
            full_name: "Test Clerk".to_string(),
            role: Role::Employee,
        }
    }

    async fn seed_product(db: &Database, name: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            price_cents,
            stock,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();
        product
    }

    #[tokio::test]
    async fn test_finalize_sale_totals_and_stock() {
        let db = test_db().await;
        let checkout = CheckoutService::new(db.clone());
        let soda = seed_product(&db, "Soda 600ml", 1800, 10).await;
        let chips = seed_product(&db, "Chips", 1500, 5).await;

        let sale = checkout
            .finalize_sale(
                &[
                    SaleDraftLine {
                        product_id: soda.id.clone(),
                        quantity: 2,
                    },
                    SaleDraftLine {
                        product_id: chips.id.clone(),
                        quantity: 1,
                    },
                ],
                &session(),
            )
            .await
            .unwrap();

        // Header total equals the sum of the line totals.
        assert_eq!(sale.total_cents, 2 * 1800 + 1500);
        let lines = db.sales().get_lines(&sale.id).await.unwrap();
        let line_sum: i64 = lines.iter().map(|l| l.line_total_cents).sum();
        assert_eq!(line_sum, sale.total_cents);

        // Stock was decremented per line.
        let soda_after = db.products().get_by_id(&soda.id).await.unwrap().unwrap();
        assert_eq!(soda_after.stock, 8);
    }

    #[tokio::test]
    async fn test_empty_sale_rejected() {
        let db = test_db().await;
        let checkout = CheckoutService::new(db);

        let err = checkout.finalize_sale(&[], &session()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_insufficient_stock_rejected() {
        let db = test_db().await;
        let checkout = CheckoutService::new(db.clone());
        let soda = seed_product(&db, "Soda 600ml", 1800, 2).await;

        let err = checkout
            .finalize_sale(
                &[SaleDraftLine {
                    product_id: soda.id.clone(),
                    quantity: 3,
                }],
                &session(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        // Nothing was written.
        let soda_after = db.products().get_by_id(&soda.id).await.unwrap().unwrap();
        assert_eq!(soda_after.stock, 2);
        assert!(db.sales().list_recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_rejected() {
        let db = test_db().await;
        let checkout = CheckoutService::new(db);

        let err = checkout
            .finalize_sale(
                &[SaleDraftLine {
                    product_id: "no-such-id".to_string(),
                    quantity: 1,
                }],
                &session(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_bad_quantity_rejected() {
        let db = test_db().await;
        let checkout = CheckoutService::new(db.clone());
        let soda = seed_product(&db, "Soda 600ml", 1800, 10).await;

        let err = checkout
            .finalize_sale(
                &[SaleDraftLine {
                    product_id: soda.id,
                    quantity: 0,
                }],
                &session(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
