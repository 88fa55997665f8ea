//! Error types for the inventory engine
//!
//! This module defines the errors an engine operation can report and the
//! errors raised by the storage collaborators.
//!
//! # Error Categories
//!
//! - **Authorization Errors**: not logged in, insufficient privilege, lockout
//! - **Validation Errors**: bad number/phone format, weak password, empty fields
//! - **Not-Found Errors**: unknown account, product or order
//! - **Conflict Errors**: duplicate identifiers, insufficient stock
//! - **Storage Errors**: commit, backup and restore failures
//!
//! Every [`EngineError`] renders as the reason shown to the operator. Storage
//! failures never expose the underlying [`StoreError`]; the engine logs the
//! cause and reports a generic message.

use crate::types::product::{MAX_PRICE, MAX_PRICE_DIGITS};
use std::path::Path;
use thiserror::Error;

/// Error reported by an engine operation
///
/// Each variant is a distinct, user-facing reason. An operation that returns
/// one of these has left the in-memory snapshot exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// No account is logged in
    #[error("Permission denied: please log in first")]
    NotAuthenticated,

    /// The logged-in account lacks the privilege the operation requires
    #[error("Permission denied: {operation} requires superuser privilege")]
    PermissionDenied {
        /// Operation that was refused
        operation: String,
    },

    /// Login or account lookup for an identifier that does not exist
    #[error("Account {account} does not exist")]
    UnknownAccount {
        /// Identifier that was not found
        account: String,
    },

    /// Wrong password supplied at login
    #[error("Incorrect password, {remaining_attempts} attempt(s) left before lockout")]
    InvalidCredentials {
        /// Failures still allowed before the account locks
        remaining_attempts: u32,
    },

    /// Login refused because the account is inside its lock window
    #[error("Account {account} is locked, try again in {remaining_secs}s")]
    AccountLocked {
        /// Locked account
        account: String,
        /// Whole seconds until the lock window closes
        remaining_secs: i64,
    },

    /// Rename to an identifier held by another account
    #[error("Account name {account} is already taken")]
    AccountIdTaken {
        /// Requested identifier
        account: String,
    },

    /// New password fails the password policy
    #[error("Password must contain upper and lower case letters and a digit, and be at least 8 characters long")]
    WeakPassword,

    /// The new password could not be hashed
    #[error("Password could not be secured")]
    HashingFailed,

    /// A required text input was empty
    #[error("{field} must not be empty")]
    MissingField {
        /// Name of the empty input
        field: String,
    },

    /// Product identifier already in use
    #[error("Product {product} already exists")]
    DuplicateProduct {
        /// Conflicting identifier
        product: String,
    },

    /// Price input is not a number greater than zero
    #[error("Price must be a number greater than 0, got '{value}'")]
    InvalidPrice {
        /// Raw input
        value: String,
    },

    /// Price beyond the accepted range or precision
    #[error("Price must be at most {max} with at most {digits} significant digits, got '{value}'")]
    PriceOutOfRange {
        /// Raw input
        value: String,
        /// Largest accepted price
        max: i64,
        /// Most significant digits accepted
        digits: u32,
    },

    /// Stock input is not an integer greater than zero
    #[error("Stock must be an integer greater than 0, got '{value}'")]
    InvalidStock {
        /// Raw input
        value: String,
    },

    /// Product field name outside the editable set
    #[error("Unknown product field '{field}': expected name, category, price or stock")]
    UnknownField {
        /// Raw field name
        field: String,
    },

    /// Product identifier not found
    #[error("Product {product} does not exist")]
    ProductNotFound {
        /// Identifier that was not found
        product: String,
    },

    /// Order identifier already in use
    #[error("Order {order} already exists")]
    DuplicateOrder {
        /// Conflicting identifier
        order: String,
    },

    /// Phone input is not exactly 11 digits
    #[error("Phone number must be exactly 11 digits, got '{phone}'")]
    InvalidPhone {
        /// Raw input
        phone: String,
    },

    /// Quantity input is not an integer greater than zero
    #[error("Quantity must be an integer greater than 0, got '{value}'")]
    InvalidQuantity {
        /// Raw input
        value: String,
    },

    /// Order quantity exceeds the product's stock
    #[error("Insufficient stock for product {product}: available {available}, requested {requested}")]
    InsufficientStock {
        /// Product identifier
        product: String,
        /// Units in stock
        available: u32,
        /// Units requested
        requested: u32,
    },

    /// Restoring stock would exceed the representable range
    #[error("Stock for product {product} would overflow")]
    StockOverflow {
        /// Product identifier
        product: String,
    },

    /// A money amount derived from price and quantity does not fit a decimal
    #[error("Amount for product {product} is too large")]
    AmountOverflow {
        /// Product identifier
        product: String,
    },

    /// Order identifier not found
    #[error("Order {order} does not exist")]
    OrderNotFound {
        /// Identifier that was not found
        order: String,
    },

    /// Cancel refused because the ordered product has been deleted
    #[error("Order {order} references product {product}, which no longer exists")]
    OrderProductMissing {
        /// Order identifier
        order: String,
        /// Dangling product identifier
        product: String,
    },

    /// Backup refused because there is no primary store yet
    #[error("Backup failed: there is no saved data to back up")]
    NothingToBackUp,

    /// Backup could not be written
    #[error("Backup failed")]
    BackupFailed,

    /// Restore refused because the backup is missing or unreadable
    #[error("Restore failed: the backup does not exist or cannot be read")]
    RestoreUnavailable,

    /// Persisting the snapshot failed; the mutation was not applied
    #[error("Save failed: changes were not applied")]
    Storage,

    /// Log clearing requested but the audit log does not exist
    #[error("The audit log does not exist")]
    LogUnavailable,

    /// The audit log could not be read or truncated
    #[error("The audit log could not be accessed")]
    LogFailed,
}

impl EngineError {
    /// Create a PermissionDenied error
    pub fn permission_denied(operation: &str) -> Self {
        EngineError::PermissionDenied {
            operation: operation.to_string(),
        }
    }

    /// Create an UnknownAccount error
    pub fn unknown_account(account: &str) -> Self {
        EngineError::UnknownAccount {
            account: account.to_string(),
        }
    }

    /// Create an AccountLocked error
    pub fn account_locked(account: &str, remaining_secs: i64) -> Self {
        EngineError::AccountLocked {
            account: account.to_string(),
            remaining_secs,
        }
    }

    /// Create an AccountIdTaken error
    pub fn account_id_taken(account: &str) -> Self {
        EngineError::AccountIdTaken {
            account: account.to_string(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: &str) -> Self {
        EngineError::MissingField {
            field: field.to_string(),
        }
    }

    /// Create a DuplicateProduct error
    pub fn duplicate_product(product: &str) -> Self {
        EngineError::DuplicateProduct {
            product: product.to_string(),
        }
    }

    /// Create an InvalidPrice error
    pub fn invalid_price(value: &str) -> Self {
        EngineError::InvalidPrice {
            value: value.to_string(),
        }
    }

    /// Create an InvalidStock error
    pub fn invalid_stock(value: &str) -> Self {
        EngineError::InvalidStock {
            value: value.to_string(),
        }
    }

    /// Create an UnknownField error
    pub fn unknown_field(field: &str) -> Self {
        EngineError::UnknownField {
            field: field.to_string(),
        }
    }

    /// Create a ProductNotFound error
    pub fn product_not_found(product: &str) -> Self {
        EngineError::ProductNotFound {
            product: product.to_string(),
        }
    }

    /// Create a DuplicateOrder error
    pub fn duplicate_order(order: &str) -> Self {
        EngineError::DuplicateOrder {
            order: order.to_string(),
        }
    }

    /// Create an InvalidPhone error
    pub fn invalid_phone(phone: &str) -> Self {
        EngineError::InvalidPhone {
            phone: phone.to_string(),
        }
    }

    /// Create an InvalidQuantity error
    pub fn invalid_quantity(value: &str) -> Self {
        EngineError::InvalidQuantity {
            value: value.to_string(),
        }
    }

    /// Create an InsufficientStock error
    pub fn insufficient_stock(product: &str, available: u32, requested: u32) -> Self {
        EngineError::InsufficientStock {
            product: product.to_string(),
            available,
            requested,
        }
    }

    /// Create a StockOverflow error
    pub fn stock_overflow(product: &str) -> Self {
        EngineError::StockOverflow {
            product: product.to_string(),
        }
    }

    /// Create a PriceOutOfRange error
    pub fn price_out_of_range(value: &str) -> Self {
        EngineError::PriceOutOfRange {
            value: value.to_string(),
            max: MAX_PRICE,
            digits: MAX_PRICE_DIGITS,
        }
    }

    /// Create an AmountOverflow error
    pub fn amount_overflow(product: &str) -> Self {
        EngineError::AmountOverflow {
            product: product.to_string(),
        }
    }

    /// Create an OrderNotFound error
    pub fn order_not_found(order: &str) -> Self {
        EngineError::OrderNotFound {
            order: order.to_string(),
        }
    }

    /// Create an OrderProductMissing error
    pub fn order_product_missing(order: &str, product: &str) -> Self {
        EngineError::OrderProductMissing {
            order: order.to_string(),
            product: product.to_string(),
        }
    }
}

/// Error raised by the persistence gateway or an audit sink
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The file to read or copy does not exist
    #[error("File not found: {path}")]
    NotFound {
        /// Missing path
        path: String,
    },

    /// Reading, writing or renaming failed
    #[error("I/O error on {path}: {message}")]
    Io {
        /// Path involved
        path: String,
        /// Description of the I/O error
        message: String,
    },

    /// The store could not be serialized or parsed
    #[error("Encoding error: {message}")]
    Encoding {
        /// Description of the encoding error
        message: String,
    },

    /// Failure injected by an in-memory store
    #[error("Simulated storage failure")]
    Simulated,
}

impl StoreError {
    /// Create a NotFound error
    pub fn not_found(path: &Path) -> Self {
        StoreError::NotFound {
            path: path.display().to_string(),
        }
    }

    /// Create an Io error, mapping `NotFound` kinds to [`StoreError::NotFound`]
    pub fn io(path: &Path, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            return StoreError::not_found(path);
        }
        StoreError::Io {
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

// Conversion from serde_json::Error to StoreError
impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        StoreError::Encoding {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::not_authenticated(
        EngineError::NotAuthenticated,
        "Permission denied: please log in first"
    )]
    #[case::permission_denied(
        EngineError::permission_denied("create_order"),
        "Permission denied: create_order requires superuser privilege"
    )]
    #[case::invalid_credentials(
        EngineError::InvalidCredentials { remaining_attempts: 2 },
        "Incorrect password, 2 attempt(s) left before lockout"
    )]
    #[case::account_locked(
        EngineError::account_locked("admin", 17),
        "Account admin is locked, try again in 17s"
    )]
    #[case::invalid_price(
        EngineError::invalid_price("abc"),
        "Price must be a number greater than 0, got 'abc'"
    )]
    #[case::price_out_of_range(
        EngineError::price_out_of_range("1e13"),
        "Price must be at most 1000000000000 with at most 15 significant digits, got '1e13'"
    )]
    #[case::amount_overflow(
        EngineError::amount_overflow("P1"),
        "Amount for product P1 is too large"
    )]
    #[case::insufficient_stock(
        EngineError::insufficient_stock("P1", 2, 3),
        "Insufficient stock for product P1: available 2, requested 3"
    )]
    #[case::order_product_missing(
        EngineError::order_product_missing("O1", "P1"),
        "Order O1 references product P1, which no longer exists"
    )]
    #[case::storage(EngineError::Storage, "Save failed: changes were not applied")]
    fn test_engine_error_display(#[case] error: EngineError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::duplicate_product(
        EngineError::duplicate_product("P1"),
        EngineError::DuplicateProduct { product: "P1".to_string() }
    )]
    #[case::invalid_phone(
        EngineError::invalid_phone("123"),
        EngineError::InvalidPhone { phone: "123".to_string() }
    )]
    #[case::order_not_found(
        EngineError::order_not_found("O9"),
        EngineError::OrderNotFound { order: "O9".to_string() }
    )]
    fn test_helper_functions(#[case] result: EngineError, #[case] expected: EngineError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error = StoreError::io(Path::new("data.json"), io_error);
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "File not found: data.json");
    }

    #[test]
    fn test_io_error_keeps_message() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error = StoreError::io(Path::new("data.json"), io_error);
        assert_eq!(
            error.to_string(),
            "I/O error on data.json: Permission denied"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: StoreError = json_error.into();
        assert!(matches!(error, StoreError::Encoding { .. }));
    }
}
