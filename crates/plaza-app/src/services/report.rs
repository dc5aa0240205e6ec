//! # Report Service
//!
//! Revenue summaries and detail lists for the dashboard and reports
//! screens. The role branch is decided once here (via `Session::scope`)
//! and applied uniformly by the scoped queries in plaza-db.

use chrono::NaiveDate;
use tracing::debug;

use plaza_core::Session;
use plaza_db::{Database, RevenueDetail, RevenueSummary, TopProduct, UserSalesSummary};

use crate::config::AppConfig;
use crate::error::AppError;

/// Service for revenue reporting.
#[derive(Debug, Clone)]
pub struct ReportService {
    db: Database,
    config: AppConfig,
}

impl ReportService {
    /// Creates a new ReportService.
    pub fn new(db: Database, config: AppConfig) -> Self {
        ReportService { db, config }
    }

    /// Daily revenue summary, scoped to the session's role.
    ///
    /// Admins aggregate across every user; employees only across rows they
    /// created. Dates with no activity come back as all-zero subtotals.
    pub async fn daily_summary(
        &self,
        date: NaiveDate,
        session: &Session,
    ) -> Result<RevenueSummary, AppError> {
        debug!(date = %date, user = %session.username, "Daily summary requested");
        Ok(self.db.reports().daily_summary(date, &session.scope()).await?)
    }

    /// Raw rows per revenue source for one day, scoped like the summary.
    /// The shell feeds these to its detail tables and CSV exporter.
    pub async fn daily_detail(
        &self,
        date: NaiveDate,
        session: &Session,
    ) -> Result<RevenueDetail, AppError> {
        debug!(date = %date, user = %session.username, "Daily detail requested");
        Ok(self.db.reports().daily_detail(date, &session.scope()).await?)
    }

    /// Per-user sales aggregates over an optional date range.
    ///
    /// Admins may filter by any user (or none); employees always get their
    /// own numbers no matter what filter they pass.
    pub async fn user_sales_summary(
        &self,
        session: &Session,
        user_filter: Option<&str>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<UserSalesSummary>, AppError> {
        let user_filter = if session.is_admin() {
            user_filter
        } else {
            Some(session.user_id.as_str())
        };

        Ok(self
            .db
            .reports()
            .user_sales_summary(user_filter, from, to)
            .await?)
    }

    /// Best-selling products across all sale lines.
    pub async fn top_products(&self, limit: i64) -> Result<Vec<TopProduct>, AppError> {
        Ok(self.db.reports().top_products(limit).await?)
    }

    /// Number of products at or below the configured low-stock threshold.
    pub async fn low_stock_count(&self) -> Result<i64, AppError> {
        Ok(self
            .db
            .products()
            .count_low_stock(self.config.low_stock_threshold)
            .await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use plaza_core::{Role, Tariffs};
    use plaza_db::DbConfig;

    use crate::services::bathroom::BathroomService;
    use crate::services::parking::ParkingService;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn session(user_id: &str, role: Role) -> Session {
        Session {
            user_id: user_id.to_string(),
            username: format!("user-{user_id}"),
            full_name: format!("User {user_id}"),
            role,
        }
    }

    #[tokio::test]
    async fn test_summary_scoping_through_sessions() {
        let db = test_db().await;
        let reports = ReportService::new(db.clone(), AppConfig::default());
        let parking = ParkingService::new(db.clone(), Tariffs::default());
        let bathrooms = BathroomService::new(db.clone(), Tariffs::default());

        let admin = session("u-admin", Role::Admin);
        let clerk = session("u-1", Role::Employee);

        let ticket = parking.open_ticket("ABC-123", &clerk).await.unwrap();
        parking.charge(&ticket.id, &clerk).await.unwrap();
        bathrooms.record_use(&admin).await.unwrap();

        let today = Utc::now().date_naive();

        // Admin sees both sources; the clerk only their own ticket.
        let admin_view = reports.daily_summary(today, &admin).await.unwrap();
        assert_eq!(admin_view.parking.total_cents, 1000);
        assert_eq!(admin_view.bathrooms.total_cents, 500);
        assert_eq!(admin_view.grand_total_cents(), 1500);

        let clerk_view = reports.daily_summary(today, &clerk).await.unwrap();
        assert_eq!(clerk_view.parking.total_cents, 1000);
        assert_eq!(clerk_view.bathrooms.total_cents, 0);
        assert_eq!(clerk_view.grand_total_cents(), 1000);
    }

    #[tokio::test]
    async fn test_employee_cannot_widen_user_sales_filter() {
        let db = test_db().await;
        let reports = ReportService::new(db, AppConfig::default());
        let clerk = session("u-1", Role::Employee);

        // Asking for another user's numbers still returns only their own
        // (empty here).
        let rows = reports
            .user_sales_summary(&clerk, Some("u-2"), None, None)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_low_stock_uses_configured_threshold() {
        let db = test_db().await;
        let config = AppConfig {
            low_stock_threshold: 10,
            ..AppConfig::default()
        };
        let reports = ReportService::new(db.clone(), config);

        let now = Utc::now();
        let product = plaza_core::Product {
            id: "p-1".to_string(),
            name: "Soda 600ml".to_string(),
            price_cents: 1800,
            stock: 7,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap();

        assert_eq!(reports.low_stock_count().await.unwrap(), 1);
    }
}
