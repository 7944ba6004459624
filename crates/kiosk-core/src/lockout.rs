//! Brute-force protection for the login overlay
//!
//! Failed logins are counted in memory only. Reaching the threshold opens a
//! fixed lockout window during which login submissions are refused before any
//! request goes out. Reloading the kiosk forgets everything.

use chrono::{DateTime, Local, TimeDelta};

/// Lockout policy for failed login attempts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockoutPolicy {
    /// Consecutive failures that trigger a lockout
    pub max_failures: u32,
    /// How long the lockout lasts
    pub window: TimeDelta,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failures: 5,
            window: TimeDelta::minutes(15),
        }
    }
}

impl LockoutPolicy {
    /// Create a custom lockout policy
    pub fn custom(max_failures: u32, window: TimeDelta) -> Self {
        Self {
            max_failures: max_failures.max(1),
            window,
        }
    }
}

/// Tracks consecutive failures and the active lockout window
#[derive(Clone, Debug, Default)]
pub struct LockoutTracker {
    policy: LockoutPolicy,
    failed_count: u32,
    lockout_until: Option<DateTime<Local>>,
}

impl LockoutTracker {
    pub fn new(policy: LockoutPolicy) -> Self {
        Self {
            policy,
            failed_count: 0,
            lockout_until: None,
        }
    }

    /// Count a failed login.
    ///
    /// Returns the lockout deadline when this failure engages the lockout, so
    /// the caller can start its countdown.
    pub fn record_failure(&mut self, now: DateTime<Local>) -> Option<DateTime<Local>> {
        // An elapsed window starts a fresh count even if release() has not run yet
        if self.lockout_until.is_some_and(|until| now >= until) {
            self.release();
        }
        self.failed_count = self.failed_count.saturating_add(1);

        if self.failed_count >= self.policy.max_failures && !self.is_locked(now) {
            let until = now + self.policy.window;
            self.lockout_until = Some(until);
            tracing::warn!(
                failed_count = self.failed_count,
                until = %until.to_rfc3339(),
                "login locked out"
            );
            return Some(until);
        }
        None
    }

    /// A successful login clears the failure count only
    pub fn record_success(&mut self) {
        self.failed_count = 0;
    }

    pub fn is_locked(&self, now: DateTime<Local>) -> bool {
        self.lockout_until.is_some_and(|until| now < until)
    }

    /// Seconds left in the lockout, rounded up
    pub fn remaining_secs(&self, now: DateTime<Local>) -> Option<u64> {
        let until = self.lockout_until.filter(|&until| now < until)?;
        let millis = (until - now).num_milliseconds().max(0) as u64;
        Some(millis.div_ceil(1000))
    }

    /// End the lockout once its window has elapsed
    pub fn release(&mut self) {
        if self.lockout_until.take().is_some() {
            tracing::info!("login lockout released");
        }
        self.failed_count = 0;
    }

    pub fn failed_count(&self) -> u32 {
        self.failed_count
    }

    pub fn lockout_until(&self) -> Option<DateTime<Local>> {
        self.lockout_until
    }
}
