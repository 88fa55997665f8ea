//! Engine settings
//!
//! Tunables for the login lockout policy and the password hashing cost.

use crate::core::credentials::CredentialHasher;
use crate::core::lockout::LockoutPolicy;
use argon2::Params;
use chrono::TimeDelta;
use tracing::warn;

/// Default number of consecutive failed logins before lockout
pub const DEFAULT_MAX_FAILED_LOGINS: u32 = 3;

/// Default lock window in seconds
pub const DEFAULT_LOCKOUT_SECS: u64 = 30;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Consecutive failures that lock an account
    pub max_failed_logins: u32,

    /// Lock window in seconds, measured from the last failure
    pub lockout_secs: u64,

    /// Argon2 memory cost in KiB
    pub hash_memory_kib: u32,

    /// Argon2 iteration count
    pub hash_iterations: u32,
}

impl EngineSettings {
    /// Create settings with the given lockout policy
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(max_failed_logins: u32, lockout_secs: u64) -> Self {
        let defaults = EngineSettings::default();

        let max_failed_logins = if max_failed_logins == 0 {
            warn!(
                default = defaults.max_failed_logins,
                "max_failed_logins must be greater than 0, using default"
            );
            defaults.max_failed_logins
        } else {
            max_failed_logins
        };

        let lockout_secs = if lockout_secs == 0 {
            warn!(
                default = defaults.lockout_secs,
                "lockout_secs must be greater than 0, using default"
            );
            defaults.lockout_secs
        } else {
            lockout_secs
        };

        EngineSettings {
            max_failed_logins,
            lockout_secs,
            ..defaults
        }
    }

    /// Override the Argon2 cost
    pub fn with_hash_cost(mut self, memory_kib: u32, iterations: u32) -> Self {
        self.hash_memory_kib = memory_kib;
        self.hash_iterations = iterations;
        self
    }

    pub fn lockout_policy(&self) -> LockoutPolicy {
        let secs = i64::try_from(self.lockout_secs).unwrap_or(i64::MAX / 1000);
        let window = TimeDelta::try_seconds(secs)
            .unwrap_or_else(|| TimeDelta::seconds(DEFAULT_LOCKOUT_SECS as i64));
        LockoutPolicy::new(self.max_failed_logins, window)
    }

    pub fn hasher(&self) -> CredentialHasher {
        CredentialHasher::new(self.hash_memory_kib, self.hash_iterations)
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            max_failed_logins: DEFAULT_MAX_FAILED_LOGINS,
            lockout_secs: DEFAULT_LOCKOUT_SECS,
            hash_memory_kib: Params::DEFAULT_M_COST,
            hash_iterations: Params::DEFAULT_T_COST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults_match_lockout_rules() {
        let policy = EngineSettings::default().lockout_policy();
        assert_eq!(policy.max_failures(), 3);
        assert_eq!(policy.window(), TimeDelta::seconds(30));
    }

    #[rstest]
    #[case::custom(5, 60, 5, 60)]
    #[case::zero_failures(0, 60, 3, 60)]
    #[case::zero_window(5, 0, 5, 30)]
    fn test_new_falls_back_on_zero(
        #[case] max_failed_logins: u32,
        #[case] lockout_secs: u64,
        #[case] expected_failures: u32,
        #[case] expected_secs: u64,
    ) {
        let settings = EngineSettings::new(max_failed_logins, lockout_secs);
        assert_eq!(settings.max_failed_logins, expected_failures);
        assert_eq!(settings.lockout_secs, expected_secs);
    }

    #[test]
    fn test_with_hash_cost() {
        let settings = EngineSettings::default().with_hash_cost(8, 1);
        assert_eq!(settings.hash_memory_kib, 8);
        assert_eq!(settings.hash_iterations, 1);
    }
}
