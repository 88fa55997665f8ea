//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Operator accounts, privileges and credentials
//! - `product`: Products, editable fields and money rounding
//! - `order`: Orders and order details
//! - `snapshot`: The complete set of accounts, products and orders
//! - `audit`: Audit trail entries
//! - `error`: Error types for the engine and its storage

pub mod account;
pub mod audit;
pub mod error;
pub mod order;
pub mod product;
pub mod snapshot;

pub use account::{Account, AccountId, Credential, Privilege};
pub use audit::{AuditEntry, Operation, Outcome, ANONYMOUS_ACTOR, SYSTEM_ACTOR};
pub use error::{EngineError, StoreError};
pub use order::{Order, OrderDetail, OrderId, TIMESTAMP_FORMAT};
pub use product::{
    price_in_range, round_money, Product, ProductEdit, ProductField, ProductId, MAX_PRICE,
    MAX_PRICE_DIGITS,
};
pub use snapshot::Snapshot;
