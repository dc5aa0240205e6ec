//! # Package Service
//!
//! Package storage lifecycle: drop-off, pickup at the flat fee.
//!
//! Dwell time is recorded for display only; unlike parking, the fee does
//! not grow with it.

use chrono::Utc;
use tracing::{info, warn};

use plaza_core::{CoreError, Package, Session, Tariffs};
use plaza_db::{Database, LogCategory, LogLevel};

use crate::error::AppError;

/// Service for package storage operations.
#[derive(Debug, Clone)]
pub struct PackageService {
    db: Database,
    tariffs: Tariffs,
}

impl PackageService {
    /// Creates a new PackageService with the posted rates.
    pub fn new(db: Database, tariffs: Tariffs) -> Self {
        PackageService { db, tariffs }
    }

    /// Registers a drop-off at the current time.
    pub async fn drop_off(&self, session: &Session) -> Result<Package, AppError> {
        let package = self.db.packages().drop_off(session).await?;

        info!(package_id = %package.id, "Package dropped off");
        self.audit(
            &format!("Package {} dropped off", package.id),
            session,
        )
        .await;

        Ok(package)
    }

    /// Charges the flat fee and records the pickup.
    ///
    /// ## Errors
    /// `AlreadyPaid` on a second pickup attempt; the stored fee is never
    /// altered.
    pub async fn pickup(&self, package_id: &str, session: &Session) -> Result<Package, AppError> {
        let package = self
            .db
            .packages()
            .get_by_id(package_id)
            .await?
            .ok_or_else(|| CoreError::PackageNotFound(package_id.to_string()))?;

        if package.is_paid() {
            warn!(package_id = %package.id, "Pickup attempt on paid package");
            return Err(CoreError::AlreadyPaid {
                entity: "Package",
                id: package.id,
            }
            .into());
        }

        let fee = self.tariffs.package_fee();
        self.db
            .packages()
            .close_with_fee(&package.id, Utc::now(), fee.cents())
            .await?;

        info!(package_id = %package.id, fee = %fee, "Package picked up");
        self.audit(
            &format!("Package {} picked up, charged {}", package.id, fee),
            session,
        )
        .await;

        self.db
            .packages()
            .get_by_id(&package.id)
            .await?
            .ok_or_else(|| AppError::internal("Picked-up package vanished"))
    }

    /// Lists packages still in storage, scoped to the session's role.
    pub async fn pending(&self, session: &Session) -> Result<Vec<Package>, AppError> {
        Ok(self.db.packages().list_pending(&session.scope()).await?)
    }

    /// Best-effort audit trail write; failures are logged and swallowed.
    async fn audit(&self, message: &str, session: &Session) {
        if let Err(e) = self
            .db
            .logs()
            .append(
                LogLevel::Info,
                LogCategory::Packages,
                message,
                None,
                Some(session),
            )
            .await
        {
            warn!("Audit log write failed: {}", e);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use plaza_core::Role;
    use plaza_db::DbConfig;

    async fn test_service() -> (Database, PackageService) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = PackageService::new(db.clone(), Tariffs::default());
        (db, service)
    }

    fn session() -> Session {
        Session {
            user_id: "u-1".to_string(),
            username: "clerk".to_string(),
            full_name: "Test Clerk".to_string(),
            role: Role::Employee,
        }
    }

    #[tokio::test]
    async fn test_drop_off_and_pickup_flat_fee() {
        let (_db, service) = test_service().await;
        let clerk = session();

        let package = service.drop_off(&clerk).await.unwrap();
        assert!(!package.is_paid());

        let picked = service.pickup(&package.id, &clerk).await.unwrap();
        assert_eq!(picked.fee_cents, Some(2000));
        assert!(picked.picked_up_at.is_some());
    }

    #[tokio::test]
    async fn test_double_pickup_rejected() {
        let (db, service) = test_service().await;
        let clerk = session();

        let package = service.drop_off(&clerk).await.unwrap();
        service.pickup(&package.id, &clerk).await.unwrap();

        let err = service.pickup(&package.id, &clerk).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyPaid);

        let stored = db.packages().get_by_id(&package.id).await.unwrap().unwrap();
        assert_eq!(stored.fee_cents, Some(2000));
    }

    #[tokio::test]
    async fn test_pending_excludes_picked_up() {
        let (_db, service) = test_service().await;
        let clerk = session();

        service.drop_off(&clerk).await.unwrap();
        let picked = service.drop_off(&clerk).await.unwrap();
        service.pickup(&picked.id, &clerk).await.unwrap();

        let pending = service.pending(&clerk).await.unwrap();
        assert_eq!(pending.len(), 1);
    }
}
