//! # Package Repository
//!
//! Database operations for package storage.
//!
//! The lifecycle mirrors parking tickets: a package is open while its fee
//! is NULL and closed once pickup time and fee are recorded. The same
//! `fee_cents IS NULL` guard keeps paid packages from being re-charged.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use plaza_core::{Package, Scope, Session};

const PACKAGE_COLUMNS: &str = "id, dropped_off_at, picked_up_at, fee_cents, user_id, user_name";

/// Repository for package database operations.
#[derive(Debug, Clone)]
pub struct PackageRepository {
    pool: SqlitePool,
}

impl PackageRepository {
    /// Creates a new PackageRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PackageRepository { pool }
    }

    /// Registers a package drop-off, attributed to the session.
    pub async fn drop_off(&self, session: &Session) -> DbResult<Package> {
        let package = Package {
            id: Uuid::new_v4().to_string(),
            dropped_off_at: Utc::now(),
            picked_up_at: None,
            fee_cents: None,
            user_id: session.user_id.clone(),
            user_name: session.full_name.clone(),
        };

        debug!(id = %package.id, "Registering package drop-off");

        sqlx::query(
            r#"
            INSERT INTO packages (
                id, dropped_off_at, picked_up_at, fee_cents, user_id, user_name
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&package.id)
        .bind(package.dropped_off_at)
        .bind(package.picked_up_at)
        .bind(package.fee_cents)
        .bind(&package.user_id)
        .bind(&package.user_name)
        .execute(&self.pool)
        .await?;

        Ok(package)
    }

    /// Gets a package by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Package>> {
        let sql = format!("SELECT {PACKAGE_COLUMNS} FROM packages WHERE id = ?1");
        let package = sqlx::query_as::<_, Package>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(package)
    }

    /// Lists packages still in storage, newest drop-off first.
    pub async fn list_pending(&self, scope: &Scope) -> DbResult<Vec<Package>> {
        let packages = match scope {
            Scope::All => {
                let sql = format!(
                    "SELECT {PACKAGE_COLUMNS} FROM packages \
                     WHERE fee_cents IS NULL ORDER BY dropped_off_at DESC"
                );
                sqlx::query_as::<_, Package>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
            Scope::User(user_id) => {
                let sql = format!(
                    "SELECT {PACKAGE_COLUMNS} FROM packages \
                     WHERE fee_cents IS NULL AND user_id = ?1 ORDER BY dropped_off_at DESC"
                );
                sqlx::query_as::<_, Package>(&sql)
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(packages)
    }

    /// Records pickup time and fee on a stored package, closing it.
    pub async fn close_with_fee(
        &self,
        id: &str,
        picked_up_at: DateTime<Utc>,
        fee_cents: i64,
    ) -> DbResult<()> {
        debug!(id = %id, fee_cents = %fee_cents, "Recording package pickup");

        let result = sqlx::query(
            r#"
            UPDATE packages
            SET picked_up_at = ?2, fee_cents = ?3
            WHERE id = ?1 AND fee_cents IS NULL
            "#,
        )
        .bind(id)
        .bind(picked_up_at)
        .bind(fee_cents)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Stored package", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
