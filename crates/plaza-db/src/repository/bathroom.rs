//! # Bathroom Use Repository
//!
//! Each bathroom use is a single immutable row at the flat fee.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use plaza_core::{BathroomUse, Session};

const USE_COLUMNS: &str = "id, used_at, fee_cents, user_id, user_name";

/// Repository for bathroom use database operations.
#[derive(Debug, Clone)]
pub struct BathroomRepository {
    pool: SqlitePool,
}

impl BathroomRepository {
    /// Creates a new BathroomRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BathroomRepository { pool }
    }

    /// Records a bathroom use at the given fee, attributed to the session.
    pub async fn record(&self, fee_cents: i64, session: &Session) -> DbResult<BathroomUse> {
        let bathroom_use = BathroomUse {
            id: Uuid::new_v4().to_string(),
            used_at: Utc::now(),
            fee_cents,
            user_id: session.user_id.clone(),
            user_name: session.full_name.clone(),
        };

        debug!(id = %bathroom_use.id, fee_cents = %fee_cents, "Recording bathroom use");

        sqlx::query(
            r#"
            INSERT INTO bathroom_uses (id, used_at, fee_cents, user_id, user_name)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&bathroom_use.id)
        .bind(bathroom_use.used_at)
        .bind(bathroom_use.fee_cents)
        .bind(&bathroom_use.user_id)
        .bind(&bathroom_use.user_name)
        .execute(&self.pool)
        .await?;

        Ok(bathroom_use)
    }

    /// Lists the most recent uses.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<BathroomUse>> {
        let sql = format!("SELECT {USE_COLUMNS} FROM bathroom_uses ORDER BY used_at DESC LIMIT ?1");
        let uses = sqlx::query_as::<_, BathroomUse>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(uses)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
