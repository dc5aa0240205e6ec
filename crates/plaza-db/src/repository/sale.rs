//! # Sale Repository
//!
//! Database operations for sales and sale lines.
//!
//! ## Checkout Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Finalizing a Sale                                     │
//! │                                                                         │
//! │  BEGIN TRANSACTION                                                     │
//! │    INSERT sales (header with total computed from the lines)           │
//! │    for each line:                                                      │
//! │      INSERT sale_lines (product snapshot frozen at sale time)         │
//! │      UPDATE products SET stock = stock - quantity                     │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  A failure at any step rolls the whole sale back: no header without   │
//! │  lines, no stock decrement without a recorded line.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use plaza_core::{Sale, SaleLine};

const SALE_COLUMNS: &str = "id, total_cents, created_at, user_id, user_name";
const LINE_COLUMNS: &str =
    "id, sale_id, product_id, product_name, quantity, unit_price_cents, line_total_cents";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale header, its lines, and the stock decrements in one
    /// transaction.
    ///
    /// ## Invariant
    /// The caller computes `sale.total_cents` as the sum of the line
    /// totals; writing both inside one transaction keeps header and detail
    /// from drifting apart.
    pub async fn create_with_lines(&self, sale: &Sale, lines: &[SaleLine]) -> DbResult<()> {
        debug!(id = %sale.id, total = %sale.total_cents, lines = lines.len(), "Creating sale");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO sales (id, total_cents, created_at, user_id, user_name)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&sale.id)
        .bind(sale.total_cents)
        .bind(sale.created_at)
        .bind(&sale.user_id)
        .bind(&sale.user_name)
        .execute(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO sale_lines (
                    id, sale_id, product_id, product_name,
                    quantity, unit_price_cents, line_total_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&line.id)
            .bind(&line.sale_id)
            .bind(&line.product_id)
            .bind(&line.product_name)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .bind(line.line_total_cents)
            .execute(&mut *tx)
            .await?;

            let now = Utc::now();
            let result = sqlx::query(
                r#"
                UPDATE products
                SET stock = stock - ?2, updated_at = ?3
                WHERE id = ?1
                "#,
            )
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // Rolls back the whole sale on drop.
                return Err(DbError::not_found("Product", &line.product_id));
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Gets a sale header by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Gets all lines for a sale.
    pub async fn get_lines(&self, sale_id: &str) -> DbResult<Vec<SaleLine>> {
        let sql = format!("SELECT {LINE_COLUMNS} FROM sale_lines WHERE sale_id = ?1 ORDER BY id");
        let lines = sqlx::query_as::<_, SaleLine>(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(lines)
    }

    /// Lists the most recent sale headers.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales ORDER BY created_at DESC LIMIT ?1");
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
