//! # Audit Log Repository
//!
//! Persistent application log, written best-effort by the service layer.
//!
//! ## Why a Table and Not Just tracing?
//! `tracing` output lives in the console and vanishes with the process.
//! The shop owner reads the audit trail inside the app days later, so the
//! interesting events (logins, lockouts, charges, failures) also land in
//! the `app_logs` table. Callers treat writes as fire-and-forget: a failed
//! log write must never abort the user action that triggered it.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::DbResult;
use plaza_core::Session;

/// Severity of an audit log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Stable TEXT representation stored in the table.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }
}

/// Functional area an audit log entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Database,
    Auth,
    Sales,
    Tickets,
    Bathrooms,
    Packages,
    System,
}

impl LogCategory {
    /// Stable TEXT representation stored in the table.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Database => "DATABASE",
            LogCategory::Auth => "AUTH",
            LogCategory::Sales => "SALES",
            LogCategory::Tickets => "TICKETS",
            LogCategory::Bathrooms => "BATHROOMS",
            LogCategory::Packages => "PACKAGES",
            LogCategory::System => "SYSTEM",
        }
    }
}

/// A stored audit log row.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub level: String,
    pub category: String,
    pub message: String,
    pub details: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub created_at: chrono::DateTime<Utc>,
}

const LOG_COLUMNS: &str = "id, level, category, message, details, user_id, user_name, created_at";

/// Repository for audit log database operations.
#[derive(Debug, Clone)]
pub struct LogRepository {
    pool: SqlitePool,
}

impl LogRepository {
    /// Creates a new LogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LogRepository { pool }
    }

    /// Appends an entry, attributed to the session when one is present.
    pub async fn append(
        &self,
        level: LogLevel,
        category: LogCategory,
        message: &str,
        details: Option<&str>,
        session: Option<&Session>,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO app_logs (
                id, level, category, message, details, user_id, user_name, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(level.as_str())
        .bind(category.as_str())
        .bind(message)
        .bind(details)
        .bind(session.map(|s| s.user_id.clone()))
        .bind(session.map(|s| s.full_name.clone()))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists the most recent entries, optionally filtered by level and
    /// category.
    pub async fn list(
        &self,
        level: Option<LogLevel>,
        category: Option<LogCategory>,
        limit: i64,
    ) -> DbResult<Vec<LogEntry>> {
        let mut sql = format!("SELECT {LOG_COLUMNS} FROM app_logs WHERE 1=1");
        if level.is_some() {
            sql.push_str(" AND level = ?");
        }
        if category.is_some() {
            sql.push_str(" AND category = ?");
        }
        sql.push_str(" ORDER BY created_at DESC LIMIT ?");

        let mut query = sqlx::query_as::<_, LogEntry>(&sql);
        if let Some(level) = level {
            query = query.bind(level.as_str());
        }
        if let Some(category) = category {
            query = query.bind(category.as_str());
        }
        query = query.bind(limit);

        let entries = query.fetch_all(&self.pool).await?;
        Ok(entries)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
