//! # Domain Types
//!
//! Core domain types used throughout Plaza POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │  ParkingTicket  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  total_cents    │   │  plate          │       │
//! │  │  price_cents    │   │  user_id/name   │   │  entered_at     │       │
//! │  │  stock          │   │  + SaleLine[]   │   │  fee_cents?     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   BathroomUse   │   │     Package     │   │  User / Session │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  used_at        │   │  dropped_off_at │   │  role, lockout  │       │
//! │  │  fee_cents      │   │  fee_cents?     │   │  attribution    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Attribution Pattern
//! Every revenue-bearing row stores the acting user's id AND denormalized
//! full name at creation time. The snapshot survives later user renames or
//! deletions, so historical reports never lose their attribution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Roles & Sessions
// =============================================================================

/// Role of a system account.
///
/// The role decides how revenue queries are scoped: admins see every
/// user's rows, employees only their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access: user management, unscoped reports.
    Admin,
    /// Day-to-day operation: own records and own reports only.
    Employee,
}

impl Default for Role {
    fn default() -> Self {
        Role::Employee
    }
}

/// The authenticated account operating the application.
///
/// ## Explicit Context
/// A `Session` is returned by a successful login and passed explicitly to
/// every service call that attributes or scopes records. There is no
/// process-wide "current user" global; the shell owns the value and hands
/// it down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Account id, stamped on every row the session creates.
    pub user_id: String,
    /// Login name.
    pub username: String,
    /// Display name, denormalized into created rows.
    pub full_name: String,
    /// Role deciding report scoping.
    pub role: Role,
}

impl Session {
    /// Checks whether the session belongs to an admin account.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns the row filter this session implies.
    ///
    /// Admins aggregate across all rows; employees only across rows whose
    /// stored `user_id` equals their own.
    pub fn scope(&self) -> Scope {
        if self.is_admin() {
            Scope::All
        } else {
            Scope::User(self.user_id.clone())
        }
    }
}

/// Row filter applied by scoped queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// No user filter (admin).
    All,
    /// Equality filter on the row's stored `user_id` (employee).
    User(String),
}

// =============================================================================
// System Account
// =============================================================================

/// A system account row.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Login name (unique).
    pub username: String,

    /// Argon2 password hash. Never serialized out to the shell.
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,

    /// Display name shown in the UI and denormalized into records.
    pub full_name: String,

    /// Optional contact address.
    pub email: Option<String>,

    /// Account role.
    pub role: Role,

    /// Deactivated accounts cannot log in but keep their history.
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Stamped on every successful login.
    #[ts(as = "Option<String>")]
    pub last_login_at: Option<DateTime<Utc>>,

    /// Consecutive failed login attempts since the last success.
    pub failed_attempts: i64,

    /// While set and in the future, every login attempt is rejected.
    #[ts(as = "Option<String>")]
    pub locked_until: Option<DateTime<Utc>>,
}

impl User {
    /// Checks whether the account is locked at the given instant.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        matches!(self.locked_until, Some(until) if now < until)
    }

    /// Builds the session value for this account.
    pub fn to_session(&self) -> Session {
        Session {
            user_id: self.id.clone(),
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            role: self.role,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to the cashier.
    pub name: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Current stock level, decremented on each sale line.
    pub stock: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks if the requested quantity can be sold from current stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Sale (header + lines)
// =============================================================================

/// A finalized sale transaction (header row).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    /// Sum of the line totals. Written in the same transaction as the
    /// lines, so header and detail cannot drift apart.
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub user_id: String,
    pub user_name: String,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item in a sale.
/// Uses the snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleLine {
    pub id: String,
    pub sale_id: String,
    /// Product id at time of sale. Informational: the product row may be
    /// deleted later, the snapshot below keeps the history readable.
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// unit_price × quantity.
    pub line_total_cents: i64,
}

impl SaleLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Parking Ticket
// =============================================================================

/// A parking session from entry to paid exit.
///
/// ## Lifecycle
/// ```text
/// open (fee_cents NULL) ──► charge ──► closed (exited_at + fee_cents set)
/// ```
/// A non-null fee marks the ticket as paid; the charge path refuses to run
/// twice so a paid ticket can never be re-charged.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ParkingTicket {
    pub id: String,
    /// License plate as typed by the attendant.
    pub plate: String,
    #[ts(as = "String")]
    pub entered_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub exited_at: Option<DateTime<Utc>>,
    /// Charged fee. NULL while the ticket is open.
    pub fee_cents: Option<i64>,
    pub user_id: String,
    pub user_name: String,
}

impl ParkingTicket {
    /// A ticket with a recorded fee is paid and must not be charged again.
    #[inline]
    pub fn is_paid(&self) -> bool {
        self.fee_cents.is_some()
    }
}

// =============================================================================
// Bathroom Use
// =============================================================================

/// A single bathroom use at the fixed fee. Created once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BathroomUse {
    pub id: String,
    #[ts(as = "String")]
    pub used_at: DateTime<Utc>,
    pub fee_cents: i64,
    pub user_id: String,
    pub user_name: String,
}

// =============================================================================
// Package
// =============================================================================

/// A stored-item record from drop-off to paid pickup.
///
/// The lifecycle mirrors [`ParkingTicket`]: the fee is NULL while the
/// package is in storage and set exactly once at pickup. Dwell time is
/// recorded for display only; the fee itself is flat.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Package {
    pub id: String,
    #[ts(as = "String")]
    pub dropped_off_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub picked_up_at: Option<DateTime<Utc>>,
    /// Charged fee. NULL while the package is still in storage.
    pub fee_cents: Option<i64>,
    pub user_id: String,
    pub user_name: String,
}

impl Package {
    /// A package with a recorded fee is paid and must not be charged again.
    #[inline]
    pub fn is_paid(&self) -> bool {
        self.fee_cents.is_some()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
