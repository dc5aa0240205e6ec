//! # Application Configuration
//!
//! Configuration loaded at startup and read-only afterwards.
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.
//! If hot-reloading is added later, we'd wrap it in `RwLock`.

use serde::{Deserialize, Serialize};

use plaza_core::Tariffs;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Store name (displayed on receipts and window title).
    pub store_name: String,

    /// Posted rates for parking, bathroom, and package storage.
    pub tariffs: Tariffs,

    /// Stock level at or below which a product counts as "low" on the
    /// dashboard.
    pub low_stock_threshold: i64,
}

impl Default for AppConfig {
    /// Returns the defaults used in development and as the first-run
    /// configuration.
    fn default() -> Self {
        AppConfig {
            store_name: "Plaza Dev Store".to_string(),
            tariffs: Tariffs::default(),
            low_stock_threshold: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.tariffs.parking_hourly_cents, 1000);
        assert_eq!(config.tariffs.bathroom_fee_cents, 500);
        assert_eq!(config.tariffs.package_fee_cents, 2000);
        assert_eq!(config.low_stock_threshold, 5);
    }
}
