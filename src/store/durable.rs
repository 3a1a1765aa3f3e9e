//! Atomic snapshot file.
//!
//! Write protocol:
//! 1. Write the full payload to a sibling temp file
//! 2. fsync the temp file (durability)
//! 3. Rename temp over the target (atomicity, POSIX)
//! 4. fsync the parent directory (the rename itself)
//!
//! The durable file is therefore always either the previous snapshot or
//! the complete new one, even if the process dies mid-write.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::crash_point::{maybe_crash, points};

use super::errors::{StoreError, StoreResult};
use super::snapshot::LedgerSnapshot;

/// Handle to the durable snapshot location.
///
/// Owned by exactly one store instance per file; two processes sharing one
/// snapshot path is unsupported.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    /// Path to the snapshot file
    path: PathBuf,

    /// Sibling path used during atomic writes
    temp_path: PathBuf,
}

impl SnapshotFile {
    /// Create a handle for the snapshot at `path`.
    pub fn new(path: &Path) -> Self {
        let mut temp = path.to_path_buf().into_os_string();
        temp.push(".tmp");
        Self {
            path: path.to_path_buf(),
            temp_path: PathBuf::from(temp),
        }
    }

    /// Path to the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling temp path used during atomic writes.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Whether a snapshot already exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Create the parent directory if missing.
    pub fn ensure_parent_dir(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::snapshot_write(format!(
                    "failed to create data directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Write a snapshot atomically.
    pub fn write_atomic(&self, snapshot: &LedgerSnapshot) -> StoreResult<()> {
        let payload = snapshot.to_json()?;

        maybe_crash(points::SNAPSHOT_BEFORE_TEMP_WRITE);

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)
            .map_err(|e| {
                StoreError::snapshot_write(format!(
                    "failed to create temp file {}: {}",
                    self.temp_path.display(),
                    e
                ))
            })?;

        file.write_all(payload.as_bytes()).map_err(|e| {
            StoreError::snapshot_write(format!(
                "failed to write temp file {}: {}",
                self.temp_path.display(),
                e
            ))
        })?;

        file.sync_all().map_err(|e| {
            StoreError::snapshot_write(format!(
                "failed to fsync temp file {}: {}",
                self.temp_path.display(),
                e
            ))
        })?;

        maybe_crash(points::SNAPSHOT_AFTER_TEMP_WRITE);
        maybe_crash(points::SNAPSHOT_BEFORE_RENAME);

        fs::rename(&self.temp_path, &self.path).map_err(|e| {
            StoreError::snapshot_write(format!(
                "failed to rename {} over {}: {}",
                self.temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        maybe_crash(points::SNAPSHOT_AFTER_RENAME);

        if let Some(parent) = self.path.parent() {
            let dir = File::open(parent).map_err(|e| {
                StoreError::snapshot_write(format!(
                    "failed to open directory {} for fsync: {}",
                    parent.display(),
                    e
                ))
            })?;

            dir.sync_all().map_err(|e| {
                StoreError::snapshot_write(format!(
                    "failed to fsync directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }

    /// Read and parse the snapshot.
    pub fn read(&self) -> StoreResult<LedgerSnapshot> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            StoreError::snapshot_load(format!(
                "failed to read snapshot {}: {}",
                self.path.display(),
                e
            ))
        })?;

        LedgerSnapshot::from_json(&raw)
    }
}
