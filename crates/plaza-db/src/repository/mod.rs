//! # Repository Module
//!
//! Database repository implementations for Plaza POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Service call                                                          │
//! │       │                                                                 │
//! │       │  db.parking().list_open(&scope)                                │
//! │       ▼                                                                 │
//! │  ParkingRepository                                                     │
//! │  ├── open(&self, plate, session)                                       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── list_open(&self, scope)                                           │
//! │  └── close_with_fee(&self, id, exited_at, fee)                         │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place per entity family                      │
//! │  • Role scoping is applied uniformly (see report.rs)                   │
//! │  • Services stay free of query strings                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Inventory CRUD
//! - [`sale::SaleRepository`] - Transactional checkout writes
//! - [`parking::ParkingRepository`] - Parking ticket lifecycle
//! - [`bathroom::BathroomRepository`] - Flat-fee bathroom uses
//! - [`package::PackageRepository`] - Package storage lifecycle
//! - [`user::UserRepository`] - System accounts and lockout state
//! - [`report::ReportRepository`] - Role-scoped revenue aggregation
//! - [`log::LogRepository`] - Persistent audit log

pub mod bathroom;
pub mod log;
pub mod package;
pub mod parking;
pub mod product;
pub mod report;
pub mod sale;
pub mod user;
