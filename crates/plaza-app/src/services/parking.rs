//! # Parking Service
//!
//! Ticket lifecycle: open at entry, quote, charge at exit.
//!
//! The fee math lives in `plaza_core::fees`; this service only decides
//! when it runs and refuses to charge a paid ticket twice.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use plaza_core::fees::{billable_hours, parking_fee};
use plaza_core::validation::validate_plate;
use plaza_core::{CoreError, ParkingTicket, Session, Tariffs};
use plaza_db::{Database, LogCategory, LogLevel};

use crate::error::AppError;

/// Fee preview for an open ticket, shown before the charge is confirmed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingQuote {
    pub ticket_id: String,
    pub plate: String,
    pub billable_hours: i64,
    pub fee_cents: i64,
}

/// Service for parking ticket operations.
#[derive(Debug, Clone)]
pub struct ParkingService {
    db: Database,
    tariffs: Tariffs,
}

impl ParkingService {
    /// Creates a new ParkingService with the posted rates.
    pub fn new(db: Database, tariffs: Tariffs) -> Self {
        ParkingService { db, tariffs }
    }

    /// Opens a ticket for a plate at the current time.
    pub async fn open_ticket(
        &self,
        plate: &str,
        session: &Session,
    ) -> Result<ParkingTicket, AppError> {
        validate_plate(plate).map_err(CoreError::from)?;

        let ticket = self.db.parking().open(plate.trim(), session).await?;

        info!(ticket_id = %ticket.id, plate = %ticket.plate, "Parking ticket opened");
        self.audit(
            LogLevel::Info,
            &format!("Ticket {} opened for plate {}", ticket.id, ticket.plate),
            session,
        )
        .await;

        Ok(ticket)
    }

    /// Previews the fee an open ticket would be charged right now.
    ///
    /// ## Errors
    /// `AlreadyPaid` when the ticket already carries a fee.
    pub async fn quote(&self, ticket_id: &str) -> Result<ParkingQuote, AppError> {
        let ticket = self.get_open(ticket_id).await?;

        let now = Utc::now();
        let hours = billable_hours(ticket.entered_at, now);
        let fee = parking_fee(ticket.entered_at, now, &self.tariffs);

        Ok(ParkingQuote {
            ticket_id: ticket.id,
            plate: ticket.plate,
            billable_hours: hours,
            fee_cents: fee.cents(),
        })
    }

    /// Charges an open ticket: stamps exit time and the fee computed from
    /// the elapsed stay.
    ///
    /// ## Errors
    /// `AlreadyPaid` on a second charge attempt; the stored fee is never
    /// altered.
    pub async fn charge(
        &self,
        ticket_id: &str,
        session: &Session,
    ) -> Result<ParkingTicket, AppError> {
        let ticket = self.get_open(ticket_id).await?;

        let now = Utc::now();
        let fee = parking_fee(ticket.entered_at, now, &self.tariffs);

        self.db
            .parking()
            .close_with_fee(&ticket.id, now, fee.cents())
            .await?;

        info!(ticket_id = %ticket.id, fee = %fee, "Parking ticket charged");
        self.audit(
            LogLevel::Info,
            &format!("Ticket {} charged {}", ticket.id, fee),
            session,
        )
        .await;

        self.db
            .parking()
            .get_by_id(&ticket.id)
            .await?
            .ok_or_else(|| AppError::internal("Charged ticket vanished"))
    }

    /// Lists open tickets, scoped to the session's role.
    pub async fn pending(&self, session: &Session) -> Result<Vec<ParkingTicket>, AppError> {
        Ok(self.db.parking().list_open(&session.scope()).await?)
    }

    /// Loads a ticket and rejects the paid ones.
    async fn get_open(&self, ticket_id: &str) -> Result<ParkingTicket, AppError> {
        let ticket = self
            .db
            .parking()
            .get_by_id(ticket_id)
            .await?
            .ok_or_else(|| CoreError::TicketNotFound(ticket_id.to_string()))?;

        if ticket.is_paid() {
            warn!(ticket_id = %ticket.id, "Charge attempt on paid ticket");
            return Err(CoreError::AlreadyPaid {
                entity: "Ticket",
                id: ticket.id,
            }
            .into());
        }

        Ok(ticket)
    }

    /// Best-effort audit trail write; failures are logged and swallowed.
    async fn audit(&self, level: LogLevel, message: &str, session: &Session) {
        if let Err(e) = self
            .db
            .logs()
            .append(level, LogCategory::Tickets, message, None, Some(session))
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

    async fn test_service() -> (Database, ParkingService) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = ParkingService::new(db.clone(), Tariffs::default());
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
    async fn test_open_quote_charge() {
        let (_db, service) = test_service().await;
        let clerk = session();

        let ticket = service.open_ticket("ABC-123", &clerk).await.unwrap();

        // Just opened: one started hour at the default rate.
        let quote = service.quote(&ticket.id).await.unwrap();
        assert_eq!(quote.billable_hours, 1);
        assert_eq!(quote.fee_cents, 1000);

        let charged = service.charge(&ticket.id, &clerk).await.unwrap();
        assert_eq!(charged.fee_cents, Some(1000));
        assert!(charged.exited_at.is_some());
    }

    #[tokio::test]
    async fn test_double_charge_rejected() {
        let (db, service) = test_service().await;
        let clerk = session();

        let ticket = service.open_ticket("XYZ-999", &clerk).await.unwrap();
        let charged = service.charge(&ticket.id, &clerk).await.unwrap();

        let err = service.charge(&ticket.id, &clerk).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyPaid);

        // Quotes on paid tickets are rejected too.
        let err = service.quote(&ticket.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyPaid);

        // The stored fee is untouched.
        let stored = db.parking().get_by_id(&ticket.id).await.unwrap().unwrap();
        assert_eq!(stored.fee_cents, charged.fee_cents);
    }

    #[tokio::test]
    async fn test_unknown_ticket() {
        let (_db, service) = test_service().await;
        let err = service.quote("no-such-ticket").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_bad_plate_rejected() {
        let (_db, service) = test_service().await;
        let err = service.open_ticket("  ", &session()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_pending_lists_open_only() {
        let (_db, service) = test_service().await;
        let clerk = session();

        let open = service.open_ticket("AAA-111", &clerk).await.unwrap();
        let paid = service.open_ticket("BBB-222", &clerk).await.unwrap();
        service.charge(&paid.id, &clerk).await.unwrap();

        let pending = service.pending(&clerk).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, open.id);
    }
}
