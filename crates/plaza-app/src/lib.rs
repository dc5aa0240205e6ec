//! # plaza-app: Service Layer for Plaza POS
//!
//! The orchestration layer the desktop shell links against.
//!
//! ## Module Organization
//! ```text
//! plaza_app/
//! ├── lib.rs          ◄─── You are here (App facade & startup)
//! ├── services/
//! │   ├── auth.rs     ◄─── Login, lockout, account administration
//! │   ├── checkout.rs ◄─── Sale finalize (transactional)
//! │   ├── inventory.rs◄─── Product CRUD
//! │   ├── parking.rs  ◄─── Ticket lifecycle + elapsed fee
//! │   ├── package.rs  ◄─── Package storage lifecycle
//! │   ├── bathroom.rs ◄─── Flat-fee uses
//! │   └── report.rs   ◄─── Role-scoped revenue reports
//! ├── session.rs      ◄─── Signed-in session holder
//! ├── config.rs       ◄─── Store name, tariffs, thresholds
//! ├── telemetry.rs    ◄─── tracing setup
//! └── error.rs        ◄─── AppError for the shell
//! ```
//!
//! ## Startup Sequence
//! ```text
//! 1. Initialize tracing (telemetry::init_tracing)
//! 2. App::init(db_config, app_config)
//!    • Connect to SQLite & run migrations
//!    • Seed the default admin account if none exists
//! 3. Shell shows the login screen; AuthService::login yields a Session
//! 4. The Session is stored in SessionState and passed to every service
//!    call that attributes or scopes records
//! ```

pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod telemetry;

pub use config::AppConfig;
pub use error::{AppError, ErrorCode};
pub use session::SessionState;

use plaza_db::{Database, DbConfig};

use services::{
    AuthService, BathroomService, CheckoutService, InventoryService, PackageService,
    ParkingService, ReportService,
};

/// Application facade: owns the database handle, configuration, and
/// session state, and hands out services.
#[derive(Debug, Clone)]
pub struct App {
    db: Database,
    config: AppConfig,
    session: SessionState,
}

impl App {
    /// Connects to the database, applies migrations, and seeds the
    /// default admin account.
    pub async fn init(db_config: DbConfig, config: AppConfig) -> Result<Self, AppError> {
        let db = Database::new(db_config).await?;
        db.users().ensure_default_admin().await?;

        Ok(App {
            db,
            config,
            session: SessionState::new(),
        })
    }

    /// Returns the authentication service.
    pub fn auth(&self) -> AuthService {
        AuthService::new(self.db.clone())
    }

    /// Returns the checkout service.
    pub fn checkout(&self) -> CheckoutService {
        CheckoutService::new(self.db.clone())
    }

    /// Returns the inventory service.
    pub fn inventory(&self) -> InventoryService {
        InventoryService::new(self.db.clone())
    }

    /// Returns the parking service.
    pub fn parking(&self) -> ParkingService {
        ParkingService::new(self.db.clone(), self.config.tariffs)
    }

    /// Returns the package storage service.
    pub fn packages(&self) -> PackageService {
        PackageService::new(self.db.clone(), self.config.tariffs)
    }

    /// Returns the bathroom service.
    pub fn bathrooms(&self) -> BathroomService {
        BathroomService::new(self.db.clone(), self.config.tariffs)
    }

    /// Returns the report service.
    pub fn reports(&self) -> ReportService {
        ReportService::new(self.db.clone(), self.config.clone())
    }

    /// Returns the session holder the shell reads and writes.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Returns the application configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the underlying database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }
}

// =============================================================================
// End-to-End Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::services::{NewUser, ProductInput, SaleDraftLine};

    async fn test_app() -> App {
        telemetry::init_tracing();
        App::init(DbConfig::in_memory(), AppConfig::default())
            .await
            .unwrap()
    }

    /// A full shift: admin signs in, creates a clerk; the clerk sells,
    /// parks, charges, and reads the daily numbers.
    #[tokio::test]
    async fn test_full_shift_flow() {
        let app = test_app().await;

        // Admin signs in (seeded account) and creates a clerk.
        let admin = app.auth().login("admin", "admin123").await.unwrap();
        app.session().sign_in(admin.clone());

        let clerk = app
            .auth()
            .create_user(
                &admin,
                NewUser {
                    username: "maria".to_string(),
                    password: "secret1".to_string(),
                    full_name: "Maria Lopez".to_string(),
                    email: None,
                    role: plaza_core::Role::Employee,
                },
            )
            .await
            .unwrap()
            .to_session();

        // Stock the shelf and ring up a sale as the clerk.
        let soda = app
            .inventory()
            .create(ProductInput {
                name: "Soda 600ml".to_string(),
                price_cents: 1800,
                stock: 24,
            })
            .await
            .unwrap();

        let sale = app
            .checkout()
            .finalize_sale(
                &[SaleDraftLine {
                    product_id: soda.id.clone(),
                    quantity: 2,
                }],
                &clerk,
            )
            .await
            .unwrap();
        assert_eq!(sale.total_cents, 3600);

        // Parking and bathroom revenue.
        let ticket = app.parking().open_ticket("ABC-123", &clerk).await.unwrap();
        app.parking().charge(&ticket.id, &clerk).await.unwrap();
        app.bathrooms().record_use(&clerk).await.unwrap();

        // Package dropped off and picked up the same day.
        let package = app.packages().drop_off(&clerk).await.unwrap();
        app.packages().pickup(&package.id, &clerk).await.unwrap();

        // The clerk's daily summary covers all four sources, and the grand
        // total is their sum.
        let today = Utc::now().date_naive();
        let summary = app.reports().daily_summary(today, &clerk).await.unwrap();
        assert_eq!(summary.sales.total_cents, 3600);
        assert_eq!(summary.parking.total_cents, 1000);
        assert_eq!(summary.bathrooms.total_cents, 500);
        assert_eq!(summary.packages.total_cents, 2000);
        assert_eq!(summary.grand_total_cents(), 7100);

        // The admin sees the same rows without a filter.
        let admin_summary = app.reports().daily_summary(today, &admin).await.unwrap();
        assert_eq!(admin_summary.grand_total_cents(), 7100);

        // The audit trail recorded the shift.
        let entries = app.db().logs().list(None, None, 50).await.unwrap();
        assert!(!entries.is_empty());

        app.session().sign_out();
        assert!(app.session().current().is_none());
    }
}
