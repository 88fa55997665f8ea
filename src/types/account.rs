//! Account-related types for the inventory engine
//!
//! This module defines the operator Account, its privilege level and the
//! credential it authenticates with.

use chrono::{DateTime, Utc};
use std::fmt;

/// Account identifier (mutable through the modify-account operation)
pub type AccountId = String;

/// Privilege level of an operator account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Privilege {
    /// May manage products (add, modify, list)
    Standard,

    /// May perform every operation, including orders, deletes,
    /// account changes, backup/restore and log management
    Superuser,
}

impl Privilege {
    /// Whether this privilege level satisfies `required`
    pub fn satisfies(self, required: Privilege) -> bool {
        match required {
            Privilege::Standard => true,
            Privilege::Superuser => self == Privilege::Superuser,
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Privilege::Standard => f.write_str("standard"),
            Privilege::Superuser => f.write_str("superuser"),
        }
    }
}

/// Stored credential of an account
///
/// Freshly loaded stores written by older tooling may still carry a
/// plaintext password. Those are upgraded to a hash as soon as the engine
/// opens, so `Plaintext` never survives a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Argon2id PHC string
    Hashed(String),

    /// Legacy plaintext credential awaiting upgrade
    Plaintext(String),
}

/// Operator account
///
/// Accounts are created by seeding (first boot) or loaded from the store.
/// They are mutated by login bookkeeping and by modify-account, and never
/// deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Unique identifier used to log in
    pub id: AccountId,

    /// Credential checked on login
    pub credential: Credential,

    /// Privilege level
    pub privilege: Privilege,

    /// Consecutive failed login attempts since the last success
    pub failed_logins: u32,

    /// Time of the most recent failed login, if any
    pub last_failure: Option<DateTime<Utc>>,
}

impl Account {
    /// Create a new account with a clean login history
    pub fn new(id: impl Into<AccountId>, credential: Credential, privilege: Privilege) -> Self {
        Account {
            id: id.into(),
            credential,
            privilege,
            failed_logins: 0,
            last_failure: None,
        }
    }

    /// Whether this account holds superuser privilege
    pub fn is_superuser(&self) -> bool {
        self.privilege == Privilege::Superuser
    }
}
