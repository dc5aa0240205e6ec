//! # User Repository
//!
//! Database operations for system accounts: creation, lockout bookkeeping,
//! activation, and credential storage.
//!
//! ## Credential Storage
//! Passwords are stored as argon2 hashes. The hash/verify helpers at the
//! bottom of this module are the only code that touches raw passwords.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use plaza_core::{Role, User};

const USER_COLUMNS: &str = "id, username, password_hash, full_name, email, role, is_active, \
                            created_at, last_login_at, failed_attempts, locked_until";

/// Login name of the account seeded on first start.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Initial password of the seeded admin account. Meant to be changed on
/// first login.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Repository for system account database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new account.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` when the username is taken.
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(id = %user.id, username = %user.username, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, password_hash, full_name, email, role,
                is_active, created_at, last_login_at, failed_attempts, locked_until
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(user.role)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.last_login_at)
        .bind(user.failed_attempts)
        .bind(user.locked_until)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Finds an account by login name.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Gets an account by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Lists every account, newest first.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC");
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;

        Ok(users)
    }

    /// Stores the failure counter and optional lockout deadline after a
    /// failed login attempt.
    pub async fn record_failed_attempt(
        &self,
        id: &str,
        failed_attempts: i64,
        locked_until: Option<DateTime<Utc>>,
    ) -> DbResult<()> {
        debug!(id = %id, failed_attempts = %failed_attempts, "Recording failed login attempt");

        let result = sqlx::query(
            r#"
            UPDATE users
            SET failed_attempts = ?2, locked_until = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(failed_attempts)
        .bind(locked_until)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Stamps a successful login: last-login time, counter reset, lock
    /// cleared.
    pub async fn record_login(&self, id: &str, now: DateTime<Utc>) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET last_login_at = ?2, failed_attempts = 0, locked_until = NULL
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Clears the failure counter and lockout deadline.
    ///
    /// Used both for expired windows and for the admin's manual unlock.
    pub async fn reset_lockout(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET failed_attempts = 0, locked_until = NULL
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Activates or deactivates an account.
    pub async fn set_active(&self, id: &str, active: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE users SET is_active = ?2 WHERE id = ?1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Replaces the stored password hash.
    pub async fn set_password_hash(&self, id: &str, password_hash: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = ?2 WHERE id = ?1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Seeds the default admin account when none exists yet.
    ///
    /// Idempotent: called on every startup right after migrations.
    pub async fn ensure_default_admin(&self) -> DbResult<()> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?1")
            .bind(DEFAULT_ADMIN_USERNAME)
            .fetch_one(&self.pool)
            .await?;

        if count > 0 {
            return Ok(());
        }

        info!("Seeding default admin account");

        let admin = User {
            id: Uuid::new_v4().to_string(),
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            password_hash: hash_password(DEFAULT_ADMIN_PASSWORD)?,
            full_name: "Administrator".to_string(),
            email: Some("admin@plaza.local".to_string()),
            role: Role::Admin,
            is_active: true,
            created_at: Utc::now(),
            last_login_at: None,
            failed_attempts: 0,
            locked_until: None,
        };

        self.insert(&admin).await
    }
}

// =============================================================================
// Credential Helpers
// =============================================================================

/// Hashes a password for storage.
pub fn hash_password(password: &str) -> DbResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verifies a password against its stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn test_user(username: &str, role: Role) -> User {
        User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: hash_password("secret1").unwrap(),
            full_name: format!("Test {username}"),
            email: None,
            role,
            is_active: true,
            created_at: Utc::now(),
            last_login_at: None,
            failed_attempts: 0,
            locked_until: None,
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret1").unwrap();
        assert_ne!(hash, "secret1");
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("secret1", "not-a-hash"));
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = test_db().await;
        let user = test_user("maria", Role::Employee);
        db.users().insert(&user).await.unwrap();

        let found = db.users().find_by_username("maria").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.role, Role::Employee);
        assert!(found.is_active);

        assert!(db.users().find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = test_db().await;
        db.users().insert(&test_user("maria", Role::Employee)).await.unwrap();

        let result = db.users().insert(&test_user("maria", Role::Admin)).await;
        assert!(matches!(result, Err(DbError::UniqueViolation { .. })));
    }

    #[tokio::test]
    async fn test_lockout_bookkeeping() {
        let db = test_db().await;
        let user = test_user("maria", Role::Employee);
        db.users().insert(&user).await.unwrap();

        let until = Utc::now() + Duration::minutes(30);
        db.users()
            .record_failed_attempt(&user.id, 5, Some(until))
            .await
            .unwrap();

        let locked = db.users().get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(locked.failed_attempts, 5);
        assert!(locked.locked_until.is_some());

        db.users().reset_lockout(&user.id).await.unwrap();
        let unlocked = db.users().get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(unlocked.failed_attempts, 0);
        assert!(unlocked.locked_until.is_none());
    }

    #[tokio::test]
    async fn test_record_login_resets_counter() {
        let db = test_db().await;
        let user = test_user("maria", Role::Employee);
        db.users().insert(&user).await.unwrap();

        db.users()
            .record_failed_attempt(&user.id, 3, None)
            .await
            .unwrap();

        let now = Utc::now();
        db.users().record_login(&user.id, now).await.unwrap();

        let loaded = db.users().get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(loaded.failed_attempts, 0);
        assert!(loaded.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_ensure_default_admin_is_idempotent() {
        let db = test_db().await;
        db.users().ensure_default_admin().await.unwrap();
        db.users().ensure_default_admin().await.unwrap();

        let admin = db
            .users()
            .find_by_username(DEFAULT_ADMIN_USERNAME)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(verify_password(DEFAULT_ADMIN_PASSWORD, &admin.password_hash));

        assert_eq!(db.users().list().await.unwrap().len(), 1);
    }
}
