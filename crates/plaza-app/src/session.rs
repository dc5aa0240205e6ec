//! # Session State
//!
//! Holds the signed-in account for the lifetime of the process.
//!
//! ## Explicit Context, Not a Global
//! The data layer never reads this state. Services take a `&Session`
//! parameter; the shell fetches the current session from here and passes
//! it down. That keeps the coupling between UI and data access visible in
//! every signature.
//!
//! ## Thread Safety
//! Wrapped in `Arc<RwLock<..>>`: the shell reads the session on every
//! call, writes only at login/logout.

use std::sync::{Arc, RwLock};

use plaza_core::Session;

use crate::error::{AppError, ErrorCode};

/// Holder for the currently signed-in session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionState {
    /// Creates an empty (signed-out) session state.
    pub fn new() -> Self {
        SessionState::default()
    }

    /// Stores the session returned by a successful login.
    pub fn sign_in(&self, session: Session) {
        let mut guard = self.inner.write().expect("session lock poisoned");
        *guard = Some(session);
    }

    /// Clears the session at logout.
    pub fn sign_out(&self) {
        let mut guard = self.inner.write().expect("session lock poisoned");
        *guard = None;
    }

    /// Returns a copy of the current session, if signed in.
    pub fn current(&self) -> Option<Session> {
        self.inner.read().expect("session lock poisoned").clone()
    }

    /// Returns the current session or an auth error for the shell to show.
    pub fn require(&self) -> Result<Session, AppError> {
        self.current()
            .ok_or_else(|| AppError::new(ErrorCode::AuthFailed, "No active session"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
