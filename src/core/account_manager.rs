//! Account management module
//!
//! This module provides the `AccountManager` struct which applies login
//! bookkeeping and account changes to the accounts of a snapshot.
//!
//! The AccountManager is responsible for:
//! - Authenticating operators under the lockout policy
//! - Seeding the default accounts on first boot
//! - Upgrading legacy plaintext credentials to hashes
//! - Renaming accounts and replacing their passwords

use crate::core::credentials::CredentialHasher;
use crate::core::lockout::{whole_seconds, LockoutPolicy};
use crate::core::validators::password_meets_policy;
use crate::types::{Account, Credential, EngineError, Privilege, Snapshot};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Seeded superuser identifier
pub const DEFAULT_SUPERUSER: &str = "admin";

/// Seeded superuser password
pub const DEFAULT_SUPERUSER_PASSWORD: &str = "Admin1234";

/// Seeded standard account identifier
pub const DEFAULT_STANDARD_USER: &str = "user1";

/// Seeded standard account password
pub const DEFAULT_STANDARD_PASSWORD: &str = "User123456";

/// Applies authentication and account changes
///
/// The manager holds no accounts itself; it operates on the accounts of the
/// snapshot it is handed, so the engine decides what gets committed.
#[derive(Debug, Clone, Default)]
pub struct AccountManager {
    lockout: LockoutPolicy,
    hasher: CredentialHasher,
}

impl AccountManager {
    pub fn new(lockout: LockoutPolicy, hasher: CredentialHasher) -> Self {
        AccountManager { lockout, hasher }
    }

    /// Authenticate `id` with `password`
    ///
    /// Updates the account's failure counter and timestamp in place.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No account has identifier `id`
    /// - The account is inside its lock window (even if the password is right)
    /// - The password does not match
    pub fn authenticate(
        &self,
        accounts: &mut [Account],
        id: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        let id = id.trim();
        let account = accounts
            .iter_mut()
            .find(|account| account.id == id)
            .ok_or_else(|| EngineError::unknown_account(id))?;

        if let Some(remaining) = self.lockout.remaining_lock(account, now) {
            return Err(EngineError::account_locked(id, whole_seconds(remaining)));
        }

        if self.hasher.verify(&account.credential, password) {
            self.lockout.record_success(account);
            Ok(())
        } else {
            let remaining_attempts = self.lockout.record_failure(account, now);
            debug!(
                account = id,
                failed_logins = account.failed_logins,
                "Login failed"
            );
            Err(EngineError::InvalidCredentials { remaining_attempts })
        }
    }

    /// The two accounts created on first boot, one per privilege level
    pub fn seed_accounts(&self) -> Result<Vec<Account>, EngineError> {
        Ok(vec![
            Account::new(
                DEFAULT_SUPERUSER,
                self.hasher.hash(DEFAULT_SUPERUSER_PASSWORD)?,
                Privilege::Superuser,
            ),
            Account::new(
                DEFAULT_STANDARD_USER,
                self.hasher.hash(DEFAULT_STANDARD_PASSWORD)?,
                Privilege::Standard,
            ),
        ])
    }

    /// Replace every plaintext credential with its hash
    ///
    /// # Returns
    ///
    /// The number of accounts upgraded
    pub fn upgrade_credentials(&self, accounts: &mut [Account]) -> Result<usize, EngineError> {
        let mut upgraded = 0;
        for account in accounts.iter_mut() {
            if let Credential::Plaintext(password) = &account.credential {
                account.credential = self.hasher.hash(password)?;
                info!(account = %account.id, "Upgraded plaintext credential");
                upgraded += 1;
            }
        }
        Ok(upgraded)
    }

    /// Rename account `old_id` to `new_id` and set its password
    ///
    /// `new_id` may equal `old_id` to change only the password.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `new_id` is empty
    /// - No account has identifier `old_id`
    /// - Another account already uses `new_id`
    /// - `new_password` fails the password policy
    pub fn modify_account(
        &self,
        snapshot: &mut Snapshot,
        old_id: &str,
        new_id: &str,
        new_password: &str,
    ) -> Result<(), EngineError> {
        let old_id = old_id.trim();
        let new_id = new_id.trim();
        if new_id.is_empty() {
            return Err(EngineError::missing_field("New account name"));
        }

        if snapshot.account(old_id).is_none() {
            return Err(EngineError::unknown_account(old_id));
        }

        if new_id != old_id && snapshot.account(new_id).is_some() {
            return Err(EngineError::account_id_taken(new_id));
        }

        if !password_meets_policy(new_password) {
            return Err(EngineError::WeakPassword);
        }

        let credential = self.hasher.hash(new_password)?;
        let account = snapshot
            .account_mut(old_id)
            .ok_or_else(|| EngineError::unknown_account(old_id))?;
        account.id = new_id.to_string();
        account.credential = credential;

        Ok(())
    }
}
