//! Core business logic module
//!
//! This module contains the inventory processing components:
//! - `traits` - Collaborator traits injected into the engine
//! - `engine` - Operation orchestration, permission checks and commits
//! - `account_manager` - Authentication, seeding and account changes
//! - `catalog` - Product validation and mutation
//! - `order_book` - Order placement and cancellation
//! - `statistics` - Order totals by category
//! - `credentials` / `lockout` / `validators` - Rules shared by the above

pub mod account_manager;
pub mod catalog;
pub mod clock;
pub mod credentials;
pub mod engine;
pub mod lockout;
pub mod order_book;
pub mod settings;
pub mod statistics;
pub mod traits;
pub mod validators;

pub use account_manager::AccountManager;
pub use clock::{ManualClock, SystemClock};
pub use credentials::CredentialHasher;
pub use engine::{InventoryEngine, RECENT_LOG_LIMIT};
pub use lockout::LockoutPolicy;
pub use settings::EngineSettings;
pub use statistics::{CategoryTotals, OrderStatistics};
pub use traits::{AuditSink, Clock, SnapshotStore};
