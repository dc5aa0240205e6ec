//! # plaza-db: Database Layer for Plaza POS
//!
//! This crate provides database access for the Plaza POS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Plaza POS Data Flow                              │
//! │                                                                         │
//! │  Service call (daily_summary, finalize_sale, login)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     plaza-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ SaleRepo      │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │    │ ParkingRepo   │    │ 002_logs.sql │  │   │
//! │  │   │ Management    │    │ ReportRepo ...│    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   plaza.db (local file, WAL mode)                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, sale, parking, ...)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use plaza_db::{Database, DbConfig};
//!
//! let config = DbConfig::new("path/to/plaza.db");
//! let db = Database::new(config).await?;
//!
//! let open_tickets = db.parking().list_open(&Scope::All).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::bathroom::BathroomRepository;
pub use repository::log::{LogCategory, LogEntry, LogLevel, LogRepository};
pub use repository::package::PackageRepository;
pub use repository::parking::ParkingRepository;
pub use repository::product::ProductRepository;
pub use repository::report::{
    ReportRepository, RevenueDetail, RevenueSummary, SaleDetailRow, SourceTotal, TopProduct,
    UserSalesSummary,
};
pub use repository::sale::SaleRepository;
pub use repository::user::{hash_password, verify_password, UserRepository};
