//! # Bathroom Service
//!
//! Records flat-fee bathroom uses. The simplest revenue source: one
//! immutable row per use, nothing to close or re-charge.

use tracing::{info, warn};

use plaza_core::{BathroomUse, Session, Tariffs};
use plaza_db::{Database, LogCategory, LogLevel};

use crate::error::AppError;

/// Service for bathroom fee collection.
#[derive(Debug, Clone)]
pub struct BathroomService {
    db: Database,
    tariffs: Tariffs,
}

impl BathroomService {
    /// Creates a new BathroomService with the posted rates.
    pub fn new(db: Database, tariffs: Tariffs) -> Self {
        BathroomService { db, tariffs }
    }

    /// Records one use at the flat fee, attributed to the session.
    pub async fn record_use(&self, session: &Session) -> Result<BathroomUse, AppError> {
        let fee = self.tariffs.bathroom_fee();
        let bathroom_use = self.db.bathrooms().record(fee.cents(), session).await?;

        info!(id = %bathroom_use.id, fee = %fee, "Bathroom use recorded");
        if let Err(e) = self
            .db
            .logs()
            .append(
                LogLevel::Info,
                LogCategory::Bathrooms,
                &format!("Bathroom use charged {}", fee),
                None,
                Some(session),
            )
            .await
        {
            warn!("Audit log write failed: {}", e);
        }

        Ok(bathroom_use)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use plaza_core::Role;
    use plaza_db::DbConfig;

    #[tokio::test]
    async fn test_record_use_charges_flat_fee() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = BathroomService::new(db.clone(), Tariffs::default());
        let clerk = Session {
            user_id: "u-1".to_string(),
            username: "clerk".to_string(),
            full_name: "Test Clerk".to_string(),
            role: Role::Employee,
        };

        let first = service.record_use(&clerk).await.unwrap();
        let second = service.record_use(&clerk).await.unwrap();

        assert_eq!(first.fee_cents, 500);
        assert_eq!(second.fee_cents, 500);
        assert_ne!(first.id, second.id);

        assert_eq!(db.bathrooms().list_recent(10).await.unwrap().len(), 2);
    }
}
