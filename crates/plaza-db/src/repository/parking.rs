//! # Parking Ticket Repository
//!
//! Database operations for parking sessions.
//!
//! ## Paid Guard
//! Every closing statement carries `AND fee_cents IS NULL`. Once a fee is
//! recorded the ticket is paid, and no later statement can overwrite it.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use plaza_core::{ParkingTicket, Scope, Session};

const TICKET_COLUMNS: &str = "id, plate, entered_at, exited_at, fee_cents, user_id, user_name";

/// Repository for parking ticket database operations.
#[derive(Debug, Clone)]
pub struct ParkingRepository {
    pool: SqlitePool,
}

impl ParkingRepository {
    /// Creates a new ParkingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ParkingRepository { pool }
    }

    /// Opens a new ticket for the given plate, attributed to the session.
    pub async fn open(&self, plate: &str, session: &Session) -> DbResult<ParkingTicket> {
        let ticket = ParkingTicket {
            id: Uuid::new_v4().to_string(),
            plate: plate.to_string(),
            entered_at: Utc::now(),
            exited_at: None,
            fee_cents: None,
            user_id: session.user_id.clone(),
            user_name: session.full_name.clone(),
        };

        debug!(id = %ticket.id, plate = %ticket.plate, "Opening parking ticket");

        sqlx::query(
            r#"
            INSERT INTO parking_tickets (
                id, plate, entered_at, exited_at, fee_cents, user_id, user_name
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&ticket.id)
        .bind(&ticket.plate)
        .bind(ticket.entered_at)
        .bind(ticket.exited_at)
        .bind(ticket.fee_cents)
        .bind(&ticket.user_id)
        .bind(&ticket.user_name)
        .execute(&self.pool)
        .await?;

        Ok(ticket)
    }

    /// Gets a ticket by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ParkingTicket>> {
        let sql = format!("SELECT {TICKET_COLUMNS} FROM parking_tickets WHERE id = ?1");
        let ticket = sqlx::query_as::<_, ParkingTicket>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(ticket)
    }

    /// Lists open (unpaid) tickets, newest entry first.
    ///
    /// Employees only see their own tickets; admins see everyone's.
    pub async fn list_open(&self, scope: &Scope) -> DbResult<Vec<ParkingTicket>> {
        let tickets = match scope {
            Scope::All => {
                let sql = format!(
                    "SELECT {TICKET_COLUMNS} FROM parking_tickets \
                     WHERE fee_cents IS NULL ORDER BY entered_at DESC"
                );
                sqlx::query_as::<_, ParkingTicket>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
            Scope::User(user_id) => {
                let sql = format!(
                    "SELECT {TICKET_COLUMNS} FROM parking_tickets \
                     WHERE fee_cents IS NULL AND user_id = ?1 ORDER BY entered_at DESC"
                );
                sqlx::query_as::<_, ParkingTicket>(&sql)
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(tickets)
    }

    /// Records exit time and fee on an open ticket, closing it.
    ///
    /// The `fee_cents IS NULL` guard means a paid ticket is never
    /// overwritten: closing one twice reports the ticket as not found
    /// among the open ones.
    pub async fn close_with_fee(
        &self,
        id: &str,
        exited_at: DateTime<Utc>,
        fee_cents: i64,
    ) -> DbResult<()> {
        debug!(id = %id, fee_cents = %fee_cents, "Closing parking ticket");

        let result = sqlx::query(
            r#"
            UPDATE parking_tickets
            SET exited_at = ?2, fee_cents = ?3
            WHERE id = ?1 AND fee_cents IS NULL
            "#,
        )
        .bind(id)
        .bind(exited_at)
        .bind(fee_cents)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Open ticket", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use plaza_core::Role;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn session(user_id: &str, role: Role) -> Session {
        Session {
            user_id: user_id.to_string(),
            username: format!("user-{user_id}"),
            full_name: format!("User {user_id}"),
            role,
        }
    }

    #[tokio::test]
    async fn test_open_and_close() {
        let db = test_db().await;
        let clerk = session("u-1", Role::Employee);

        let ticket = db.parking().open("ABC-123", &clerk).await.unwrap();
        assert!(!ticket.is_paid());
        assert_eq!(ticket.user_id, "u-1");

        db.parking()
            .close_with_fee(&ticket.id, Utc::now(), 2000)
            .await
            .unwrap();

        let closed = db.parking().get_by_id(&ticket.id).await.unwrap().unwrap();
        assert_eq!(closed.fee_cents, Some(2000));
        assert!(closed.exited_at.is_some());
    }

    #[tokio::test]
    async fn test_close_twice_keeps_original_fee() {
        let db = test_db().await;
        let clerk = session("u-1", Role::Employee);

        let ticket = db.parking().open("XYZ-999", &clerk).await.unwrap();
        db.parking()
            .close_with_fee(&ticket.id, Utc::now(), 1000)
            .await
            .unwrap();

        let second = db
            .parking()
            .close_with_fee(&ticket.id, Utc::now(), 9999)
            .await;
        assert!(matches!(second, Err(DbError::NotFound { .. })));

        let stored = db.parking().get_by_id(&ticket.id).await.unwrap().unwrap();
        assert_eq!(stored.fee_cents, Some(1000));
    }

    #[tokio::test]
    async fn test_list_open_scoping() {
        let db = test_db().await;
        let clerk_a = session("u-1", Role::Employee);
        let clerk_b = session("u-2", Role::Employee);

        let a1 = db.parking().open("AAA-111", &clerk_a).await.unwrap();
        db.parking().open("BBB-222", &clerk_b).await.unwrap();
        let paid = db.parking().open("CCC-333", &clerk_a).await.unwrap();
        db.parking()
            .close_with_fee(&paid.id, Utc::now(), 1000)
            .await
            .unwrap();

        // Admin scope: every open ticket, none of the paid ones.
        let all = db.parking().list_open(&Scope::All).await.unwrap();
        assert_eq!(all.len(), 2);

        // Employee scope: only the caller's open tickets.
        let own = db
            .parking()
            .list_open(&Scope::User("u-1".to_string()))
            .await
            .unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].id, a1.id);
        assert!(own.iter().all(|t| t.user_id == "u-1"));
    }
}
