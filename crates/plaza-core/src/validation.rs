//! # Validation Module
//!
//! Input validation utilities for Plaza POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Shell (TypeScript)                                           │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Service (Rust)                                               │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a license plate.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 20 characters
/// - Letters, digits, hyphens, and spaces only
pub fn validate_plate(plate: &str) -> ValidationResult<()> {
    let plate = plate.trim();

    if plate.is_empty() {
        return Err(ValidationError::Required {
            field: "plate".to_string(),
        });
    }

    if plate.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "plate".to_string(),
            max: 20,
        });
    }

    if !plate
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == ' ')
    {
        return Err(ValidationError::InvalidFormat {
            field: "plate".to_string(),
            reason: "must contain only letters, numbers, hyphens, and spaces".to_string(),
        });
    }

    Ok(())
}

/// Validates a login name.
///
/// ## Rules
/// - 3 to 32 characters
/// - Letters, digits, dots, hyphens, and underscores only
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.len() < 3 {
        return Err(ValidationError::TooShort {
            field: "username".to_string(),
            min: 3,
        });
    }

    if username.len() > 32 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 32,
        });
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, numbers, dots, hyphens, and underscores"
                .to_string(),
        });
    }

    Ok(())
}

/// Validates a password before hashing.
///
/// ## Rules
/// - 6 to 128 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.len() < 6 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        });
    }

    if password.len() > 128 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 128,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (zero allowed for giveaway items)
pub fn validate_price_cents(price_cents: i64) -> ValidationResult<()> {
    if price_cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock count.
///
/// ## Rules
/// - Must be non-negative
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_name() {
        assert!(validate_product_name("Soda 600ml").is_ok());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_plate() {
        assert!(validate_plate("ABC-123").is_ok());
        assert!(validate_plate("AB 123 CD").is_ok());
        assert!(validate_plate("").is_err());
        assert!(validate_plate("ABC#123").is_err());
    }

    #[test]
    fn test_username() {
        assert!(validate_username("maria.lopez").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"u".repeat(33)).is_err());
    }

    #[test]
    fn test_password() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(129)).is_err());
    }

    #[test]
    fn test_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_price_and_stock() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-1).is_err());

        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());
    }
}
