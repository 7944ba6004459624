//! Login overlay gating: session reuse plus failed-attempt lockout

use chrono::{DateTime, Local};

use crate::backend::Credentials;
use crate::error::{KioskError, Result};
use crate::lockout::{LockoutPolicy, LockoutTracker};
use crate::session::{SessionGuard, SessionStore};

/// Shown when the login request itself fails
pub const LOGIN_FAILED: &str = "Login failed.";

/// Result of applying a login response
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Session established; hide the overlay
    Authenticated,
    /// Wrong credentials; carries the deadline if this failure locked the terminal
    Rejected {
        lockout_until: Option<DateTime<Local>>,
    },
    /// The request did not complete
    Failed,
    /// No login was pending
    Ignored,
}

/// Decides whether a login may be attempted and applies its outcome
pub struct LoginGate<S: SessionStore> {
    guard: SessionGuard<S>,
    lockout: LockoutTracker,
    pending: Option<String>,
    message: Option<String>,
    authenticated: bool,
}

impl<S: SessionStore> LoginGate<S> {
    pub fn new(store: S, policy: LockoutPolicy) -> Self {
        Self {
            guard: SessionGuard::new(store),
            lockout: LockoutTracker::new(policy),
            pending: None,
            message: None,
            authenticated: false,
        }
    }

    /// Startup check: true if the overlay can be skipped
    pub fn restore(&mut self, now: DateTime<Local>) -> bool {
        self.authenticated = self.guard.restore(now);
        self.authenticated
    }

    /// Validate a submission before any network request is made
    pub fn begin(&mut self, id: &str, pass: &str, now: DateTime<Local>) -> Result<Credentials> {
        let checked = self.check(id, pass, now);
        match &checked {
            Ok(credentials) => {
                self.pending = Some(credentials.id.clone());
                self.message = None;
            }
            Err(KioskError::Busy) => {}
            Err(e) => self.message = Some(e.to_string()),
        }
        checked
    }

    fn check(&self, id: &str, pass: &str, now: DateTime<Local>) -> Result<Credentials> {
        if let Some(remaining_secs) = self.lockout.remaining_secs(now) {
            return Err(KioskError::LockedOut { remaining_secs });
        }
        if self.pending.is_some() {
            return Err(KioskError::Busy);
        }

        let (id, pass) = (id.trim(), pass.trim());
        if id.is_empty() || pass.is_empty() {
            return Err(KioskError::MissingCredentials);
        }
        Ok(Credentials {
            id: id.to_string(),
            pass: pass.to_string(),
        })
    }

    /// Apply the backend's login answer
    pub fn resolve(&mut self, result: Result<bool>, now: DateTime<Local>) -> LoginOutcome {
        let Some(identity) = self.pending.take() else {
            return LoginOutcome::Ignored;
        };

        match result {
            Ok(true) => {
                self.lockout.record_success();
                if let Err(e) = self.guard.establish(&identity, now) {
                    tracing::warn!("Failed to persist session: {}", e);
                }
                tracing::info!(%identity, "kiosk login accepted");
                self.message = None;
                self.authenticated = true;
                LoginOutcome::Authenticated
            }
            Ok(false) => {
                let lockout_until = self.lockout.record_failure(now);
                tracing::info!(
                    %identity,
                    failed_count = self.lockout.failed_count(),
                    "kiosk login rejected"
                );
                self.message = Some(match self.lockout.remaining_secs(now) {
                    Some(remaining_secs) => KioskError::LockedOut { remaining_secs }.to_string(),
                    None => KioskError::InvalidCredentials.to_string(),
                });
                LoginOutcome::Rejected { lockout_until }
            }
            Err(e) => {
                tracing::error!("login request failed: {}", e);
                self.message = Some(LOGIN_FAILED.to_string());
                LoginOutcome::Failed
            }
        }
    }

    /// Countdown tick while locked out, carrying the countdown task's own value
    pub fn show_countdown(&mut self, remaining_secs: u64) {
        if self.lockout.lockout_until().is_some() {
            self.message = Some(KioskError::LockedOut { remaining_secs }.to_string());
        }
    }

    /// Lockout window elapsed
    pub fn release_lockout(&mut self) {
        self.lockout.release();
        self.message = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_locked(&self, now: DateTime<Local>) -> bool {
        self.lockout.is_locked(now)
    }

    /// Line shown under the login fields
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn lockout(&self) -> &LockoutTracker {
        &self.lockout
    }

    pub fn session(&self) -> &SessionGuard<S> {
        &self.guard
    }
}
