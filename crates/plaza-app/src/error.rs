//! # App Error Type
//!
//! Unified error type for the service layer.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Plaza POS                              │
//! │                                                                         │
//! │  Shell                        Rust Backend                              │
//! │  ─────                        ────────────                              │
//! │                                                                         │
//! │  call login(...)                                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Service Function                                                │  │
//! │  │  Result<T, AppError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Database Error? ─── DbError::QueryFailed("...") ──┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Business Error? ─── CoreError::AlreadyPaid ───── AppError ────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │                                                                         │
//! │  The shell switches on `code` (ACCOUNT_LOCKED vs AUTH_FAILED vs         │
//! │  ALREADY_PAID) and shows `message` in the alert dialog.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use plaza_core::CoreError;
use plaza_db::DbError;

/// Error returned from service calls.
///
/// ## Serialization
/// This is what the shell receives when a call fails:
/// ```json
/// {
///   "code": "ALREADY_PAID",
///   "message": "Ticket 7f3a... is already paid"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for service responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Business rule violation
    BusinessLogic,

    /// Wrong credentials, unknown account, or no active session
    AuthFailed,

    /// Account rejects logins until the lockout window expires
    AccountLocked,

    /// Caller lacks the admin role
    Forbidden,

    /// Insufficient stock for a sale line
    InsufficientStock,

    /// Ticket or package already carries a fee
    AlreadyPaid,

    /// Internal error
    Internal,
}

impl AppError {
    /// Creates a new app error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to app errors.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AppError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => AppError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConnectionFailed(_) => {
                AppError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                AppError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                AppError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to app errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => AppError::not_found("Product", &id),
            CoreError::TicketNotFound(id) => AppError::not_found("Ticket", &id),
            CoreError::PackageNotFound(id) => AppError::not_found("Package", &id),
            CoreError::UserNotFound(id) => AppError::not_found("User", &id),
            CoreError::InsufficientStock {
                name,
                available,
                requested,
            } => AppError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: {} available, {} requested",
                    name, available, requested
                ),
            ),
            CoreError::EmptySale => {
                AppError::new(ErrorCode::ValidationError, "Sale has no lines")
            }
            CoreError::AlreadyPaid { entity, id } => AppError::new(
                ErrorCode::AlreadyPaid,
                format!("{} {} is already paid", entity, id),
            ),
            CoreError::InvalidCredentials => {
                AppError::new(ErrorCode::AuthFailed, "Invalid username or password")
            }
            CoreError::AccountLocked { until } => AppError::new(
                ErrorCode::AccountLocked,
                format!("Account locked until {}", until.format("%Y-%m-%d %H:%M UTC")),
            ),
            CoreError::AdminRequired => {
                AppError::new(ErrorCode::Forbidden, "Administrator role required")
            }
            CoreError::Validation(e) => AppError::validation(e.to_string()),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_locked_and_invalid_credentials_are_distinct() {
        let locked: AppError = CoreError::AccountLocked { until: Utc::now() }.into();
        assert_eq!(locked.code, ErrorCode::AccountLocked);

        let invalid: AppError = CoreError::InvalidCredentials.into();
        assert_eq!(invalid.code, ErrorCode::AuthFailed);

        assert_ne!(locked.code, invalid.code);
    }

    #[test]
    fn test_db_query_failure_is_generic() {
        let err: AppError = DbError::QueryFailed("no such table: nope".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        // The raw SQL error is logged, not shown to the user.
        assert!(!err.message.contains("no such table"));
    }

    #[test]
    fn test_already_paid_mapping() {
        let err: AppError = CoreError::AlreadyPaid {
            entity: "Ticket",
            id: "t-1".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::AlreadyPaid);
        assert!(err.message.contains("already paid"));
    }
}
