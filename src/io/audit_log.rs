//! Audit trail sinks
//!
//! The file sink appends one line per entry to a text file. The memory sink
//! keeps entries as values.

use crate::core::traits::AuditSink;
use crate::types::{AuditEntry, StoreError};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::error;

/// Keep the last `limit` of `lines` that contain `keyword`, ignoring case
fn tail_matching<'a>(
    lines: impl Iterator<Item = &'a str>,
    limit: usize,
    keyword: Option<&str>,
) -> Vec<String> {
    let keyword = keyword.map(str::to_lowercase);
    let matching: Vec<&str> = lines
        .filter(|line| !line.trim().is_empty())
        .filter(|line| match &keyword {
            Some(keyword) => line.to_lowercase().contains(keyword),
            None => true,
        })
        .collect();

    let skip = matching.len().saturating_sub(limit);
    matching[skip..].iter().map(|line| line.to_string()).collect()
}

/// Audit sink appending to a text file
#[derive(Debug, Clone)]
pub struct FileAuditLog {
    path: PathBuf,
}

impl FileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileAuditLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }
}

impl AuditSink for FileAuditLog {
    fn record(&mut self, entry: &AuditEntry) {
        if let Err(e) = self.append(&entry.to_string()) {
            error!(path = %self.path.display(), error = %e, "Failed to write audit entry");
        }
    }

    fn recent(&self, limit: usize, keyword: Option<&str>) -> Result<Vec<String>, StoreError> {
        let text = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        Ok(tail_matching(text.lines(), limit, keyword))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map(|_| ())
            .map_err(|e| StoreError::io(&self.path, e))
    }
}

/// Audit sink holding entries in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditLog {
    entries: Vec<AuditEntry>,
}

impl MemoryAuditLog {
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }
}

impl AuditSink for MemoryAuditLog {
    fn record(&mut self, entry: &AuditEntry) {
        self.entries.push(entry.clone());
    }

    fn recent(&self, limit: usize, keyword: Option<&str>) -> Result<Vec<String>, StoreError> {
        let lines: Vec<String> = self.entries.iter().map(ToString::to_string).collect();
        Ok(tail_matching(
            lines.iter().map(String::as_str),
            limit,
            keyword,
        ))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        Ok(())
    }
}
