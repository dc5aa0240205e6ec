//! # Fee Calculations
//!
//! Pure fee math for the three rented services: parking spots, bathroom
//! access, and package storage.
//!
//! ## Fee Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Fee Rules                                       │
//! │                                                                         │
//! │  Parking    elapsed hours = ceil(elapsed ms / 3,600,000), min 1        │
//! │             fee = hours × hourly rate                                  │
//! │                                                                         │
//! │             entry 10:00:00.000, charge 11:00:00.001 → 2 hours          │
//! │             entry 10:00:00.000, charge 10:00:30.000 → 1 hour (minimum) │
//! │                                                                         │
//! │  Bathroom   flat fee, no time component                                │
//! │                                                                         │
//! │  Package    flat fee; dwell time is recorded for display only          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Milliseconds in one billable parking hour.
pub const MS_PER_HOUR: i64 = 3_600_000;

// =============================================================================
// Tariffs
// =============================================================================

/// The shop's posted rates.
///
/// Carried in the app configuration and passed into the fee functions so
/// the math itself stays pure and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Tariffs {
    /// Parking rate per started hour, in cents.
    pub parking_hourly_cents: i64,
    /// Flat bathroom fee, in cents.
    pub bathroom_fee_cents: i64,
    /// Flat package storage fee, in cents.
    pub package_fee_cents: i64,
}

impl Default for Tariffs {
    /// The rates posted at the counter: $10.00/h parking, $5.00 bathroom,
    /// $20.00 package storage.
    fn default() -> Self {
        Tariffs {
            parking_hourly_cents: 1000,
            bathroom_fee_cents: 500,
            package_fee_cents: 2000,
        }
    }
}

impl Tariffs {
    /// Returns the hourly parking rate as Money.
    #[inline]
    pub fn parking_hourly(&self) -> Money {
        Money::from_cents(self.parking_hourly_cents)
    }

    /// Returns the flat bathroom fee as Money.
    #[inline]
    pub fn bathroom_fee(&self) -> Money {
        Money::from_cents(self.bathroom_fee_cents)
    }

    /// Returns the flat package storage fee as Money.
    #[inline]
    pub fn package_fee(&self) -> Money {
        Money::from_cents(self.package_fee_cents)
    }
}

// =============================================================================
// Elapsed-Time Fee Math
// =============================================================================

/// Number of started hours between entry and now, minimum 1.
///
/// ## Ceiling Rule
/// Every started hour is billed in full: 1h00m00.001s parks into the
/// second hour and is billed as 2. A near-zero stay still pays for one
/// full hour. A clock skew that puts `now` before `entered_at` also
/// charges the one-hour minimum rather than producing a zero or negative
/// hour count.
pub fn billable_hours(entered_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed_ms = (now - entered_at).num_milliseconds();
    if elapsed_ms <= 0 {
        return 1;
    }
    // Integer ceiling; elapsed_ms > 0 makes this at least 1.
    (elapsed_ms + MS_PER_HOUR - 1) / MS_PER_HOUR
}

/// Parking fee for a stay from `entered_at` to `now` at the given rates.
pub fn parking_fee(entered_at: DateTime<Utc>, now: DateTime<Utc>, tariffs: &Tariffs) -> Money {
    tariffs.parking_hourly() * billable_hours(entered_at, now)
}

// =============================================================================
// Unit Tests
// =============================================================================
