//! # Report Repository
//!
//! Role-scoped revenue aggregation across the four revenue sources.
//!
//! ## Scoped Query Helper
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 One Helper, Four Revenue Sources                        │
//! │                                                                         │
//! │  RevenueSource { table, date_col, amount_col }                         │
//! │                                                                         │
//! │  SALES      sales            created_at     total_cents                │
//! │  PARKING    parking_tickets  exited_at      fee_cents                  │
//! │  BATHROOMS  bathroom_uses    used_at        fee_cents                  │
//! │  PACKAGES   packages         picked_up_at   fee_cents                  │
//! │                                                                         │
//! │  source_total(source, date, scope)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT COALESCE(SUM(amount), 0), COUNT(id)                            │
//! │  FROM table WHERE DATE(date_col) = ?      ← admin scope                │
//! │                   ... AND user_id = ?     ← employee scope             │
//! │                                                                         │
//! │  Admins aggregate across everyone; employees only across their own     │
//! │  rows. The branch lives HERE, once, instead of being hand-copied       │
//! │  into four query functions.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Zero Semantics
//! A date with no matching rows yields a 0 subtotal, not NULL. A date with
//! rows that all amount to zero looks identical; both render as $0.00.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use plaza_core::{BathroomUse, Package, ParkingTicket, Scope};

// =============================================================================
// Revenue Sources
// =============================================================================

/// A table that contributes to daily revenue.
///
/// Column names are compile-time constants, never user input, so they can
/// be spliced into SQL directly; the date and user id always go through
/// bind parameters.
#[derive(Debug, Clone, Copy)]
struct RevenueSource {
    table: &'static str,
    date_col: &'static str,
    amount_col: &'static str,
}

/// Store sales, dated by the sale header.
const SALES: RevenueSource = RevenueSource {
    table: "sales",
    date_col: "created_at",
    amount_col: "total_cents",
};

/// Parking tickets, dated by the paid exit.
const PARKING: RevenueSource = RevenueSource {
    table: "parking_tickets",
    date_col: "exited_at",
    amount_col: "fee_cents",
};

/// Bathroom uses, dated by the use itself.
const BATHROOMS: RevenueSource = RevenueSource {
    table: "bathroom_uses",
    date_col: "used_at",
    amount_col: "fee_cents",
};

/// Stored packages, dated by the paid pickup.
const PACKAGES: RevenueSource = RevenueSource {
    table: "packages",
    date_col: "picked_up_at",
    amount_col: "fee_cents",
};

// =============================================================================
// Report DTOs
// =============================================================================

/// Subtotal and transaction count for one revenue source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SourceTotal {
    pub total_cents: i64,
    pub transactions: i64,
}

/// Daily revenue summary across all four sources.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    pub sales: SourceTotal,
    pub parking: SourceTotal,
    pub bathrooms: SourceTotal,
    pub packages: SourceTotal,
}

impl RevenueSummary {
    /// Grand total: the sum of the four per-source subtotals.
    pub fn grand_total_cents(&self) -> i64 {
        self.sales.total_cents
            + self.parking.total_cents
            + self.bathrooms.total_cents
            + self.packages.total_cents
    }

    /// Combined transaction count across all sources.
    pub fn total_transactions(&self) -> i64 {
        self.sales.transactions
            + self.parking.transactions
            + self.bathrooms.transactions
            + self.packages.transactions
    }
}

/// One sale line joined with its header, for the detail report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetailRow {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
    pub user_id: String,
    pub user_name: String,
}

/// Raw rows per source for one day. The shell feeds these to its CSV
/// exporter and detail tables.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueDetail {
    pub sales: Vec<SaleDetailRow>,
    pub parking: Vec<ParkingTicket>,
    pub bathrooms: Vec<BathroomUse>,
    pub packages: Vec<Package>,
}

/// Per-user sales aggregate over a date range.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSalesSummary {
    pub user_id: String,
    pub user_name: String,
    pub transactions: i64,
    pub total_cents: i64,
    pub first_sale: DateTime<Utc>,
    pub last_sale: DateTime<Utc>,
}

/// A best-selling product across all sale lines.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_name: String,
    pub quantity_sold: i64,
    pub revenue_cents: i64,
}

// =============================================================================
// Report Repository
// =============================================================================

/// Repository for revenue report queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Subtotal and count for one source on one day, scoped.
    async fn source_total(
        &self,
        source: RevenueSource,
        date: NaiveDate,
        scope: &Scope,
    ) -> DbResult<SourceTotal> {
        let mut sql = format!(
            "SELECT COALESCE(SUM({amount}), 0) AS total_cents, COUNT(id) AS transactions \
             FROM {table} WHERE DATE({date_col}) = ?1",
            amount = source.amount_col,
            table = source.table,
            date_col = source.date_col,
        );
        if matches!(scope, Scope::User(_)) {
            sql.push_str(" AND user_id = ?2");
        }

        let mut query = sqlx::query_as::<_, SourceTotal>(&sql).bind(date_string(date));
        if let Scope::User(user_id) = scope {
            query = query.bind(user_id.clone());
        }

        let total = query.fetch_one(&self.pool).await?;
        Ok(total)
    }

    /// Daily revenue summary across all four sources.
    ///
    /// Admin scope aggregates every user's rows; employee scope only the
    /// caller's.
    pub async fn daily_summary(&self, date: NaiveDate, scope: &Scope) -> DbResult<RevenueSummary> {
        debug!(date = %date, "Building daily revenue summary");

        let summary = RevenueSummary {
            sales: self.source_total(SALES, date, scope).await?,
            parking: self.source_total(PARKING, date, scope).await?,
            bathrooms: self.source_total(BATHROOMS, date, scope).await?,
            packages: self.source_total(PACKAGES, date, scope).await?,
        };

        Ok(summary)
    }

    /// Raw rows per source for one day, scoped like the summary.
    pub async fn daily_detail(&self, date: NaiveDate, scope: &Scope) -> DbResult<RevenueDetail> {
        debug!(date = %date, "Building daily revenue detail");

        let date = date_string(date);

        let sales = {
            let mut sql = String::from(
                "SELECT l.id, s.created_at, l.product_name, l.quantity, \
                        l.unit_price_cents, l.line_total_cents, s.user_id, s.user_name \
                 FROM sale_lines l \
                 JOIN sales s ON l.sale_id = s.id \
                 WHERE DATE(s.created_at) = ?1",
            );
            if matches!(scope, Scope::User(_)) {
                sql.push_str(" AND s.user_id = ?2");
            }
            sql.push_str(" ORDER BY s.created_at");

            let mut query = sqlx::query_as::<_, SaleDetailRow>(&sql).bind(&date);
            if let Scope::User(user_id) = scope {
                query = query.bind(user_id.clone());
            }
            query.fetch_all(&self.pool).await?
        };

        let parking = self
            .detail_rows::<ParkingTicket>(
                "id, plate, entered_at, exited_at, fee_cents, user_id, user_name",
                PARKING,
                &date,
                scope,
            )
            .await?;

        let bathrooms = self
            .detail_rows::<BathroomUse>(
                "id, used_at, fee_cents, user_id, user_name",
                BATHROOMS,
                &date,
                scope,
            )
            .await?;

        let packages = self
            .detail_rows::<Package>(
                "id, dropped_off_at, picked_up_at, fee_cents, user_id, user_name",
                PACKAGES,
                &date,
                scope,
            )
            .await?;

        Ok(RevenueDetail {
            sales,
            parking,
            bathrooms,
            packages,
        })
    }

    /// Shared detail query for the single-table sources.
    async fn detail_rows<T>(
        &self,
        columns: &str,
        source: RevenueSource,
        date: &str,
        scope: &Scope,
    ) -> DbResult<Vec<T>>
    where
        T: Send + Unpin + for<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow>,
    {
        let mut sql = format!(
            "SELECT {columns} FROM {table} WHERE DATE({date_col}) = ?1",
            table = source.table,
            date_col = source.date_col,
        );
        if matches!(scope, Scope::User(_)) {
            sql.push_str(" AND user_id = ?2");
        }
        sql.push_str(&format!(" ORDER BY {}", source.date_col));

        let mut query = sqlx::query_as::<_, T>(&sql).bind(date.to_string());
        if let Scope::User(user_id) = scope {
            query = query.bind(user_id.clone());
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Per-user sales aggregates, optionally filtered by user and date
    /// range, best sellers first.
    pub async fn user_sales_summary(
        &self,
        user_id: Option<&str>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> DbResult<Vec<UserSalesSummary>> {
        let mut sql = String::from(
            "SELECT user_id, user_name, COUNT(id) AS transactions, \
                    COALESCE(SUM(total_cents), 0) AS total_cents, \
                    MIN(created_at) AS first_sale, MAX(created_at) AS last_sale \
             FROM sales WHERE 1=1",
        );
        if user_id.is_some() {
            sql.push_str(" AND user_id = ?");
        }
        if from.is_some() {
            sql.push_str(" AND DATE(created_at) >= ?");
        }
        if to.is_some() {
            sql.push_str(" AND DATE(created_at) <= ?");
        }
        sql.push_str(" GROUP BY user_id, user_name ORDER BY total_cents DESC");

        let mut query = sqlx::query_as::<_, UserSalesSummary>(&sql);
        if let Some(user_id) = user_id {
            query = query.bind(user_id.to_string());
        }
        if let Some(from) = from {
            query = query.bind(date_string(from));
        }
        if let Some(to) = to {
            query = query.bind(date_string(to));
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Best-selling products by quantity across all sale lines.
    pub async fn top_products(&self, limit: i64) -> DbResult<Vec<TopProduct>> {
        let rows = sqlx::query_as::<_, TopProduct>(
            r#"
            SELECT product_name,
                   SUM(quantity) AS quantity_sold,
                   COALESCE(SUM(line_total_cents), 0) AS revenue_cents
            FROM sale_lines
            GROUP BY product_name
            ORDER BY quantity_sold DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// SQLite's DATE() yields `YYYY-MM-DD`; bind dates in the same shape.
fn date_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
