//! File-backed snapshot store
//!
//! The primary and backup stores are JSON documents. Writes go to a
//! temporary file in the destination directory which is then renamed over
//! the destination, so a reader never sees a half-written store.

use crate::core::traits::SnapshotStore;
use crate::io::store_format::{decode_snapshot, encode_snapshot};
use crate::types::{Snapshot, StoreError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Snapshot store over a primary and a backup JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
    primary: PathBuf,
    backup: PathBuf,
}

impl FileStore {
    pub fn new(primary: impl Into<PathBuf>, backup: impl Into<PathBuf>) -> Self {
        FileStore {
            primary: primary.into(),
            backup: backup.into(),
        }
    }

    pub fn primary_path(&self) -> &Path {
        &self.primary
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup
    }
}

impl SnapshotStore for FileStore {
    fn load(&self) -> Snapshot {
        let text = match fs::read_to_string(&self.primary) {
            Ok(text) => text,
            Err(e) => {
                let e = StoreError::io(&self.primary, e);
                if e.is_not_found() {
                    info!(path = %self.primary.display(), "No data file, starting empty");
                } else {
                    warn!(error = %e, "Data file unreadable, starting empty");
                }
                return Snapshot::default();
            }
        };

        decode_snapshot(&text).unwrap_or_else(|e| {
            warn!(path = %self.primary.display(), error = %e, "Data file corrupt, starting empty");
            Snapshot::default()
        })
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let text = encode_snapshot(snapshot)?;
        write_atomic(&self.primary, text.as_bytes())?;
        debug!(path = %self.primary.display(), bytes = text.len(), "Snapshot saved");
        Ok(())
    }

    fn backup(&mut self) -> Result<(), StoreError> {
        let bytes = fs::read(&self.primary).map_err(|e| StoreError::io(&self.primary, e))?;
        write_atomic(&self.backup, &bytes)?;
        info!(path = %self.backup.display(), "Backup written");
        Ok(())
    }

    fn restore(&self) -> Result<Snapshot, StoreError> {
        let text =
            fs::read_to_string(&self.backup).map_err(|e| StoreError::io(&self.backup, e))?;
        decode_snapshot(&text)
    }
}

/// Replace `path` with `bytes` through a temporary file in the same directory
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    file.write_all(bytes)
        .and_then(|()| file.as_file().sync_all())
        .map_err(|e| StoreError::io(file.path(), e))?;
    file.persist(path)
        .map_err(|e| StoreError::io(path, e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Account, Credential, Privilege};
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileStore {
        FileStore::new(dir.path().join("data.json"), dir.path().join("backup.json"))
    }

    fn snapshot() -> Snapshot {
        Snapshot::new(
            vec![Account::new(
                "admin",
                Credential::Hashed("$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA".to_string()),
                Privilege::Superuser,
            )],
            vec![],
            vec![],
        )
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store_in(&dir).load().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.primary_path(), "{ not json").unwrap();

        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.save(&snapshot()).unwrap();

        assert_eq!(store.load(), snapshot());
    }

    #[test]
    fn test_save_leaves_no_temporary_files() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.save(&snapshot()).unwrap();
        store.save(&snapshot()).unwrap();

        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(
            dir.path().join("missing").join("data.json"),
            dir.path().join("backup.json"),
        );

        assert!(store.save(&snapshot()).is_err());
    }

    #[test]
    fn test_backup_copies_primary_verbatim() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.save(&snapshot()).unwrap();

        store.backup().unwrap();

        let primary = fs::read(store.primary_path()).unwrap();
        let backup = fs::read(store.backup_path()).unwrap();
        assert_eq!(primary, backup);
        assert_eq!(store.restore().unwrap(), snapshot());
    }

    #[test]
    fn test_backup_without_primary() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let result = store.backup();

        assert!(result.unwrap_err().is_not_found());
        assert!(!store.backup_path().exists());
    }

    #[test]
    fn test_restore_without_backup() {
        let dir = TempDir::new().unwrap();
        let result = store_in(&dir).restore();
        assert!(result.unwrap_err().is_not_found());
    }
}
