//! Inventory Engine Library
//! # Overview
//!
//! This library provides the transaction engine of a small shop's back office:
//! operator accounts with login lockout, a product catalog, purchase orders
//! that move stock, and a JSON data file with backup, restore and an audit log.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Product, Order, Snapshot, errors)
//! - [`cli`] - CLI arguments parsing, command execution and the interactive shell
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Operation orchestration, permission checks and commits
//!   - [`core::account_manager`] - Authentication, seeding and account changes
//!   - [`core::catalog`] / [`core::order_book`] - Product and order mutations
//!   - [`core::statistics`] - Order totals by product category
//! - [`io`] - Data file format, file and in-memory stores, audit sinks, CSV reports
//!
//! # Operations
//!
//! | Operation | Privilege |
//! |---|---|
//! | authenticate, logout, shutdown | none |
//! | add-product, list-products, modify-product | standard |
//! | modify-account, delete-product, create/get/cancel-order, order-statistics, backup, restore, recent/clear-logs | superuser |
//!
//! Every operation is a transaction: it validates and mutates a copy of the
//! current snapshot, saves the copy, and only then makes it current. A failed
//! save leaves the engine exactly as it was. Each operation, successful or
//! not, writes one audit line.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use core::{EngineSettings, InventoryEngine, OrderStatistics, SystemClock};
pub use io::{write_products_csv, write_statistics_csv, FileAuditLog, FileStore};
pub use types::{
    Account, EngineError, Order, OrderDetail, Privilege, Product, ProductField, Snapshot,
    StoreError,
};
