//! In-memory snapshot store
//!
//! Keeps the primary and backup snapshots as values and counts save
//! attempts. Saves and backups can be made to fail on demand.

use crate::core::traits::SnapshotStore;
use crate::types::{Snapshot, StoreError};

/// Snapshot store held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    primary: Option<Snapshot>,
    backup: Option<Snapshot>,
    save_count: usize,
    fail_saves: bool,
    fail_backups: bool,
}

impl MemoryStore {
    /// A store whose primary already holds `snapshot`
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        MemoryStore {
            primary: Some(snapshot),
            ..MemoryStore::default()
        }
    }

    /// Make every following save fail (or succeed again)
    pub fn fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Make every following backup fail (or succeed again)
    pub fn fail_backups(&mut self, fail: bool) {
        self.fail_backups = fail;
    }

    /// Number of save attempts, failed ones included
    pub fn save_count(&self) -> usize {
        self.save_count
    }

    pub fn primary(&self) -> Option<&Snapshot> {
        self.primary.as_ref()
    }

    pub fn backup_snapshot(&self) -> Option<&Snapshot> {
        self.backup.as_ref()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Snapshot {
        self.primary.clone().unwrap_or_default()
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        self.save_count += 1;
        if self.fail_saves {
            return Err(StoreError::Simulated);
        }
        self.primary = Some(snapshot.clone());
        Ok(())
    }

    fn backup(&mut self) -> Result<(), StoreError> {
        if self.fail_backups {
            return Err(StoreError::Simulated);
        }
        let primary = self.primary.clone().ok_or_else(|| StoreError::NotFound {
            path: "memory".to_string(),
        })?;
        self.backup = Some(primary);
        Ok(())
    }

    fn restore(&self) -> Result<Snapshot, StoreError> {
        self.backup.clone().ok_or_else(|| StoreError::NotFound {
            path: "memory backup".to_string(),
        })
    }
}
