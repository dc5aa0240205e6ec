//! # plaza-core: Pure Business Logic for Plaza POS
//!
//! This crate is the **heart** of Plaza POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Plaza POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Desktop Shell (WebView UI)                   │   │
//! │  │    Login ──► Sales ──► Parking ──► Packages ──► Reports        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    plaza-app (Services)                         │   │
//! │  │    AuthService, CheckoutService, ParkingService, ...           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ plaza-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   fees    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Tariffs  │  │   rules   │  │   │
//! │  │   │  Session  │  │  (cents)  │  │  hourly   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    plaza-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, ParkingTicket, User, Session)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`fees`] - Elapsed-time and flat-fee calculations
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fees;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use plaza_core::Money` instead of
// `use plaza_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use fees::Tariffs;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single sale.
///
/// ## Business Reason
/// Prevents runaway checkouts and ensures reasonable transaction sizes.
pub const MAX_SALE_LINES: usize = 100;

/// Maximum quantity of a single product in a sale line.
///
/// ## Business Reason
/// Prevents accidental over-selling (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Consecutive failed login attempts before an account is locked.
pub const MAX_FAILED_ATTEMPTS: i64 = 5;

/// Length of the lockout window applied after too many failed logins.
pub const LOCKOUT_MINUTES: i64 = 30;
