//! # Error Types
//!
//! Domain-specific error types for plaza-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  plaza-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  plaza-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  plaza-app errors                                                      │
//! │  └── AppError         - What the shell sees (serialized)               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → AppError → Shell        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, ticket id, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use chrono::{DateTime, Utc};
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They are caught in the
/// service layer and translated to user-facing messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found (wrong id or already deleted).
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Insufficient stock to complete a sale line.
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// A sale cannot be finalized without any lines.
    #[error("Sale has no lines")]
    EmptySale,

    /// Parking ticket cannot be found.
    #[error("Ticket not found: {0}")]
    TicketNotFound(String),

    /// Package cannot be found.
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    /// A charge was attempted on a ticket/package that already carries a
    /// fee. The stored fee must stay untouched.
    #[error("{entity} {id} is already paid")]
    AlreadyPaid { entity: &'static str, id: String },

    /// Unknown account, deactivated account, or wrong password.
    ///
    /// ## Note
    /// Deliberately indistinguishable from the outside so a caller cannot
    /// probe which usernames exist.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The account rejects all attempts until the window expires or an
    /// admin unlocks it.
    #[error("Account locked until {until}")]
    AccountLocked { until: DateTime<Utc> },

    /// The caller's session lacks the admin role.
    #[error("Administrator role required")]
    AdminRequired,

    /// System account cannot be found.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., bad characters in a username or plate).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate username).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            name: "Soda 600ml".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Soda 600ml: available 3, requested 5"
        );

        let err = CoreError::AlreadyPaid {
            entity: "Ticket",
            id: "t-9".to_string(),
        };
        assert_eq!(err.to_string(), "Ticket t-9 is already paid");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "plate".to_string(),
        };
        assert_eq!(err.to_string(), "plate is required");

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        };
        assert_eq!(err.to_string(), "password must be at least 6 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
