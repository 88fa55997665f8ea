//! Login lockout policy
//!
//! After `max_failures` consecutive failed logins an account is locked for
//! `window`, measured from the most recent failure. Attempts made while the
//! lock is open are rejected before the credential is checked, so they do not
//! move the window.

use crate::types::Account;
use chrono::{DateTime, TimeDelta, Utc};

/// Consecutive failures and lock window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    max_failures: u32,
    window: TimeDelta,
}

impl LockoutPolicy {
    pub fn new(max_failures: u32, window: TimeDelta) -> Self {
        LockoutPolicy {
            max_failures,
            window,
        }
    }

    pub fn max_failures(&self) -> u32 {
        self.max_failures
    }

    pub fn window(&self) -> TimeDelta {
        self.window
    }

    /// Time left in the account's lock window, or `None` if it may attempt a login
    pub fn remaining_lock(&self, account: &Account, now: DateTime<Utc>) -> Option<TimeDelta> {
        if account.failed_logins < self.max_failures {
            return None;
        }
        let last_failure = account.last_failure?;
        let elapsed = now - last_failure;
        if elapsed < self.window {
            Some(self.window - elapsed)
        } else {
            None
        }
    }

    /// Record a failed attempt, returning the attempts left before lockout
    pub fn record_failure(&self, account: &mut Account, now: DateTime<Utc>) -> u32 {
        account.failed_logins = account.failed_logins.saturating_add(1);
        account.last_failure = Some(now);
        self.max_failures.saturating_sub(account.failed_logins)
    }

    /// Record a successful login
    pub fn record_success(&self, account: &mut Account) {
        account.failed_logins = 0;
        account.last_failure = None;
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        LockoutPolicy::new(3, TimeDelta::seconds(30))
    }
}

/// Whole seconds in `remaining`, rounded up so a lock never reports 0s
pub fn whole_seconds(remaining: TimeDelta) -> i64 {
    let millis = remaining.num_milliseconds();
    (millis + 999) / 1000
}
