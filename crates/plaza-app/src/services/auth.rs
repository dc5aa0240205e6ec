//! # Authentication Service
//!
//! Login validation, lockout tracking, and account administration.
//!
//! ## Lockout State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Account Lockout                                     │
//! │                                                                         │
//! │            wrong password (attempt 1..4)                               │
//! │   ┌────────┐ ───────────────────────────► failed_attempts += 1        │
//! │   │ active │                                                           │
//! │   └────────┘ ◄─────────────┐                                           │
//! │        │                   │ success: counter = 0,                     │
//! │        │ 5th failure       │ last_login stamped                        │
//! │        ▼                   │                                           │
//! │   ┌────────┐               │                                           │
//! │   │ locked │  locked_until = now + 30 min                              │
//! │   └────────┘                                                           │
//! │        │                                                               │
//! │        ├── any attempt before locked_until → rejected ("locked")       │
//! │        ├── attempt after locked_until      → lock cleared, verify      │
//! │        └── admin unlock                    → lock cleared              │
//! │                                                                         │
//! │  The locked check runs BEFORE password verification: a locked account  │
//! │  rejects even the correct password.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use plaza_core::validation::{validate_password, validate_username};
use plaza_core::{CoreError, Role, Session, User, ValidationError, LOCKOUT_MINUTES, MAX_FAILED_ATTEMPTS};
use plaza_db::{hash_password, verify_password, Database, LogCategory, LogLevel};

use crate::error::AppError;

/// Input for creating a new system account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: Option<String>,
    pub role: Role,
}

/// Service for login and account administration.
#[derive(Debug, Clone)]
pub struct AuthService {
    db: Database,
}

impl AuthService {
    /// Creates a new AuthService.
    pub fn new(db: Database) -> Self {
        AuthService { db }
    }

    /// Validates a username/password pair and returns a session.
    ///
    /// ## Errors
    /// - `AuthFailed` for unknown, inactive, or wrong-password accounts
    /// - `AccountLocked` while the lockout window is open
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AppError> {
        self.login_at(username, password, Utc::now()).await
    }

    /// Login with an explicit clock, so the lockout window is testable.
    pub(crate) async fn login_at(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<Session, AppError> {
        let Some(user) = self.db.users().find_by_username(username).await? else {
            return Err(CoreError::InvalidCredentials.into());
        };

        // Deactivated accounts behave exactly like unknown ones.
        if !user.is_active {
            return Err(CoreError::InvalidCredentials.into());
        }

        let mut failed_attempts = user.failed_attempts;

        if let Some(until) = user.locked_until {
            if now < until {
                warn!(username = %username, until = %until, "Login attempt on locked account");
                self.audit(
                    LogLevel::Warning,
                    &format!("Login attempt on locked account '{}'", username),
                    None,
                )
                .await;
                return Err(CoreError::AccountLocked { until }.into());
            }

            // The window has elapsed: clear the lock and start counting
            // failures from zero again.
            self.db.users().reset_lockout(&user.id).await?;
            failed_attempts = 0;
        }

        if !verify_password(password, &user.password_hash) {
            failed_attempts += 1;

            if failed_attempts >= MAX_FAILED_ATTEMPTS {
                let until = now + Duration::minutes(LOCKOUT_MINUTES);
                self.db
                    .users()
                    .record_failed_attempt(&user.id, failed_attempts, Some(until))
                    .await?;

                warn!(username = %username, until = %until, "Account locked after repeated failures");
                self.audit(
                    LogLevel::Warning,
                    &format!("Account '{}' locked after {} failed attempts", username, failed_attempts),
                    None,
                )
                .await;
                return Err(CoreError::AccountLocked { until }.into());
            }

            self.db
                .users()
                .record_failed_attempt(&user.id, failed_attempts, None)
                .await?;
            return Err(CoreError::InvalidCredentials.into());
        }

        self.db.users().record_login(&user.id, now).await?;

        let session = user.to_session();
        info!(username = %username, role = ?session.role, "Login succeeded");
        self.audit(
            LogLevel::Info,
            &format!("'{}' signed in", username),
            Some(&session),
        )
        .await;

        Ok(session)
    }

    /// Creates a new account. Admin only.
    pub async fn create_user(&self, session: &Session, new_user: NewUser) -> Result<User, AppError> {
        require_admin(session)?;
        validate_username(&new_user.username).map_err(CoreError::from)?;
        validate_password(&new_user.password).map_err(CoreError::from)?;

        if self
            .db
            .users()
            .find_by_username(new_user.username.trim())
            .await?
            .is_some()
        {
            return Err(CoreError::Validation(ValidationError::Duplicate {
                field: "username".to_string(),
                value: new_user.username.clone(),
            })
            .into());
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: new_user.username.trim().to_string(),
            password_hash: hash_password(&new_user.password)?,
            full_name: new_user.full_name.trim().to_string(),
            email: new_user.email,
            role: new_user.role,
            is_active: true,
            created_at: Utc::now(),
            last_login_at: None,
            failed_attempts: 0,
            locked_until: None,
        };

        self.db.users().insert(&user).await?;

        info!(username = %user.username, role = ?user.role, "User created");
        self.audit(
            LogLevel::Info,
            &format!("User '{}' created", user.username),
            Some(session),
        )
        .await;

        Ok(user)
    }

    /// Changes an account's password after verifying the current one.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self
            .db
            .users()
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| CoreError::UserNotFound(user_id.to_string()))?;

        if !verify_password(current_password, &user.password_hash) {
            return Err(CoreError::InvalidCredentials.into());
        }

        validate_password(new_password).map_err(CoreError::from)?;

        let new_hash = hash_password(new_password)?;
        self.db.users().set_password_hash(user_id, &new_hash).await?;

        info!(username = %user.username, "Password changed");
        Ok(())
    }

    /// Activates or deactivates an account. Admin only.
    pub async fn set_active(
        &self,
        session: &Session,
        user_id: &str,
        active: bool,
    ) -> Result<(), AppError> {
        require_admin(session)?;
        self.db.users().set_active(user_id, active).await?;

        self.audit(
            LogLevel::Info,
            &format!(
                "User {} {}",
                user_id,
                if active { "activated" } else { "deactivated" }
            ),
            Some(session),
        )
        .await;

        Ok(())
    }

    /// Clears a lockout before its window expires. Admin only.
    pub async fn unlock(&self, session: &Session, user_id: &str) -> Result<(), AppError> {
        require_admin(session)?;
        self.db.users().reset_lockout(user_id).await?;

        info!(user_id = %user_id, "Account unlocked by admin");
        self.audit(
            LogLevel::Info,
            &format!("User {} unlocked", user_id),
            Some(session),
        )
        .await;

        Ok(())
    }

    /// Lists every account. Admin only.
    pub async fn list_users(&self, session: &Session) -> Result<Vec<User>, AppError> {
        require_admin(session)?;
        Ok(self.db.users().list().await?)
    }

    /// Best-effort audit trail write; failures are logged and swallowed.
    async fn audit(&self, level: LogLevel, message: &str, session: Option<&Session>) {
        if let Err(e) = self
            .db
            .logs()
            .append(level, LogCategory::Auth, message, None, session)
            .await
        {
            warn!("Audit log write failed: {}", e);
        }
    }
}

/// Rejects non-admin sessions.
fn require_admin(session: &Session) -> Result<(), AppError> {
    if session.is_admin() {
        Ok(())
    } else {
        Err(CoreError::AdminRequired.into())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use plaza_db::DbConfig;

    async fn test_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users().ensure_default_admin().await.unwrap();
        db
    }

    async fn admin_session(auth: &AuthService) -> Session {
        auth.login("admin", "admin123").await.unwrap()
    }

    async fn seed_clerk(auth: &AuthService) -> Session {
        let admin = admin_session(auth).await;
        auth.create_user(
            &admin,
            NewUser {
                username: "maria".to_string(),
                password: "secret1".to_string(),
                full_name: "Maria Lopez".to_string(),
                email: None,
                role: Role::Employee,
            },
        )
        .await
        .unwrap()
        .to_session()
    }

    #[tokio::test]
    async fn test_login_success_and_failure() {
        let db = test_db().await;
        let auth = AuthService::new(db);

        let session = auth.login("admin", "admin123").await.unwrap();
        assert!(session.is_admin());

        let err = auth.login("admin", "wrong").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthFailed);

        let err = auth.login("ghost", "whatever").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthFailed);
    }

    #[tokio::test]
    async fn test_lockout_after_five_failures() {
        let db = test_db().await;
        let auth = AuthService::new(db.clone());
        seed_clerk(&auth).await;

        let now = Utc::now();

        for attempt in 1..=4 {
            let err = auth.login_at("maria", "wrong", now).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::AuthFailed, "attempt {attempt}");
        }

        // The 5th failure locks the account.
        let err = auth.login_at("maria", "wrong", now).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountLocked);

        // Correct password is still rejected while locked.
        let err = auth.login_at("maria", "secret1", now).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountLocked);

        // Once the window elapses the correct password works again and the
        // counter is reset.
        let later = now + Duration::minutes(LOCKOUT_MINUTES + 1);
        let session = auth.login_at("maria", "secret1", later).await.unwrap();
        assert_eq!(session.username, "maria");

        let user = db.users().find_by_username("maria").await.unwrap().unwrap();
        assert_eq!(user.failed_attempts, 0);
        assert!(user.locked_until.is_none());
    }

    #[tokio::test]
    async fn test_expired_lock_restarts_counter() {
        let db = test_db().await;
        let auth = AuthService::new(db.clone());
        seed_clerk(&auth).await;

        let now = Utc::now();
        for _ in 0..5 {
            let _ = auth.login_at("maria", "wrong", now).await;
        }

        // After expiry a single wrong attempt counts as 1, not 6.
        let later = now + Duration::minutes(LOCKOUT_MINUTES + 1);
        let err = auth.login_at("maria", "wrong", later).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthFailed);

        let user = db.users().find_by_username("maria").await.unwrap().unwrap();
        assert_eq!(user.failed_attempts, 1);
    }

    #[tokio::test]
    async fn test_admin_unlock() {
        let db = test_db().await;
        let auth = AuthService::new(db.clone());
        let clerk = seed_clerk(&auth).await;
        let admin = admin_session(&auth).await;

        let now = Utc::now();
        for _ in 0..5 {
            let _ = auth.login_at("maria", "wrong", now).await;
        }
        assert_eq!(
            auth.login_at("maria", "secret1", now).await.unwrap_err().code,
            ErrorCode::AccountLocked
        );

        auth.unlock(&admin, &clerk.user_id).await.unwrap();

        let session = auth.login_at("maria", "secret1", now).await.unwrap();
        assert_eq!(session.user_id, clerk.user_id);
    }

    #[tokio::test]
    async fn test_deactivated_account_cannot_login() {
        let db = test_db().await;
        let auth = AuthService::new(db);
        let clerk = seed_clerk(&auth).await;
        let admin = admin_session(&auth).await;

        auth.set_active(&admin, &clerk.user_id, false).await.unwrap();

        let err = auth.login("maria", "secret1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthFailed);

        auth.set_active(&admin, &clerk.user_id, true).await.unwrap();
        assert!(auth.login("maria", "secret1").await.is_ok());
    }

    #[tokio::test]
    async fn test_admin_gates() {
        let db = test_db().await;
        let auth = AuthService::new(db);
        let clerk = seed_clerk(&auth).await;

        let err = auth
            .create_user(
                &clerk,
                NewUser {
                    username: "other".to_string(),
                    password: "secret1".to_string(),
                    full_name: "Other".to_string(),
                    email: None,
                    role: Role::Employee,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        assert_eq!(
            auth.list_users(&clerk).await.unwrap_err().code,
            ErrorCode::Forbidden
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = test_db().await;
        let auth = AuthService::new(db);
        seed_clerk(&auth).await;
        let admin = admin_session(&auth).await;

        let err = auth
            .create_user(
                &admin,
                NewUser {
                    username: "maria".to_string(),
                    password: "secret1".to_string(),
                    full_name: "Impostor".to_string(),
                    email: None,
                    role: Role::Employee,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_change_password() {
        let db = test_db().await;
        let auth = AuthService::new(db);
        let clerk = seed_clerk(&auth).await;

        // Wrong current password is rejected.
        let err = auth
            .change_password(&clerk.user_id, "nope", "newsecret")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthFailed);

        auth.change_password(&clerk.user_id, "secret1", "newsecret")
            .await
            .unwrap();

        assert!(auth.login("maria", "secret1").await.is_err());
        assert!(auth.login("maria", "newsecret").await.is_ok());
    }
}
