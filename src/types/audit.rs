//! Audit trail types
//!
//! Every engine operation, successful or not, produces exactly one
//! [`AuditEntry`]. Entries render to a single line:
//!
//! ```text
//! 2024-05-01 12:00:00 - admin - create_order - 0.0012s - success: O1
//! ```

use crate::types::order::TIMESTAMP_FORMAT;
use chrono::NaiveDateTime;
use std::fmt;
use std::time::Duration;

/// Actor recorded when no account is authenticated
pub const ANONYMOUS_ACTOR: &str = "anonymous";

/// Actor recorded for engine housekeeping (seeding, credential upgrades)
pub const SYSTEM_ACTOR: &str = "system";

/// Operations recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Open,
    Authenticate,
    Logout,
    ModifyAccount,
    AddProduct,
    ListProducts,
    DeleteProduct,
    ModifyProduct,
    CreateOrder,
    GetOrder,
    CancelOrder,
    OrderStatistics,
    Backup,
    Restore,
    RecentLogs,
    ClearLogs,
    Shutdown,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Open => "open",
            Operation::Authenticate => "authenticate",
            Operation::Logout => "logout",
            Operation::ModifyAccount => "modify_account",
            Operation::AddProduct => "add_product",
            Operation::ListProducts => "list_products",
            Operation::DeleteProduct => "delete_product",
            Operation::ModifyProduct => "modify_product",
            Operation::CreateOrder => "create_order",
            Operation::GetOrder => "get_order",
            Operation::CancelOrder => "cancel_order",
            Operation::OrderStatistics => "order_statistics",
            Operation::Backup => "backup",
            Operation::Restore => "restore",
            Operation::RecentLogs => "recent_logs",
            Operation::ClearLogs => "clear_logs",
            Operation::Shutdown => "shutdown",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result tag of an audited operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Failure(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn detail(&self) -> &str {
        match self {
            Outcome::Success(detail) | Outcome::Failure(detail) => detail,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(detail) if detail.is_empty() => f.write_str("success"),
            Outcome::Success(detail) => write!(f, "success: {}", detail),
            Outcome::Failure(detail) => write!(f, "fail: {}", detail),
        }
    }
}

/// One line of the audit trail
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    /// Local time the operation finished
    pub timestamp: NaiveDateTime,

    /// Account identifier, [`ANONYMOUS_ACTOR`] or [`SYSTEM_ACTOR`]
    pub actor: String,

    pub operation: Operation,

    /// Wall time spent inside the operation
    pub elapsed: Duration,

    pub outcome: Outcome,
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {} - {:.4}s - {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.actor,
            self.operation,
            self.elapsed.as_secs_f64(),
            self.outcome
        )
    }
}
