//! I/O module
//!
//! Handles persistence, the audit trail and report output.
//!
//! # Components
//!
//! - `store_format` - JSON store format (record conversion, document encoding)
//! - `file_store` - File-backed snapshot store with atomic writes and backups
//! - `memory_store` - In-memory snapshot store with failure injection
//! - `audit_log` - File and in-memory audit sinks
//! - `report` - CSV product and statistics reports

pub mod audit_log;
pub mod file_store;
pub mod memory_store;
pub mod report;
pub mod store_format;

pub use audit_log::{FileAuditLog, MemoryAuditLog};
pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use report::{write_products_csv, write_statistics_csv};
pub use store_format::{decode_snapshot, encode_snapshot};
