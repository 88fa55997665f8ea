//! Collaborator traits injected into the engine
//!
//! The engine owns its snapshot but delegates durability, auditing and time
//! to these collaborators, so file-backed and in-memory implementations can
//! be used interchangeably.

use crate::types::{AuditEntry, Snapshot, StoreError};
use chrono::{DateTime, Utc};

/// Persistence gateway for full snapshots
///
/// Implementations write the whole snapshot on every save; there is no
/// partial update.
pub trait SnapshotStore {
    /// Load the primary store
    ///
    /// Returns an empty snapshot if the store is absent or unreadable.
    /// Malformed individual records are skipped.
    fn load(&self) -> Snapshot;

    /// Replace the primary store with `snapshot`
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError>;

    /// Copy the primary store to the backup location
    ///
    /// Fails with [`StoreError::NotFound`] if there is no primary store.
    fn backup(&mut self) -> Result<(), StoreError>;

    /// Read the snapshot held at the backup location
    fn restore(&self) -> Result<Snapshot, StoreError>;
}

/// Append-only audit trail
pub trait AuditSink {
    /// Append one entry
    ///
    /// Sinks report their own write failures; recording never fails the
    /// operation being audited.
    fn record(&mut self, entry: &AuditEntry);

    /// The last `limit` lines, optionally restricted to lines containing
    /// `keyword` (case-insensitive), oldest first
    fn recent(&self, limit: usize, keyword: Option<&str>) -> Result<Vec<String>, StoreError>;

    /// Discard every recorded line
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Source of the current time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}
