//! Serialized, atomic snapshot writes.

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::{partition_dir, snapshot_path, Snapshot};
use crate::source::Record;
use crate::storage;

/// Writes snapshot files under a data directory. Safe to share between workers;
/// one physical write happens at a time.
#[derive(Debug)]
pub struct SnapshotWriter {
    data_dir: PathBuf,
    lock: Mutex<()>,
}

impl SnapshotWriter {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Persist `records` for (partition, period), creating the partition directory if needed.
    /// Returns the final snapshot path.
    pub fn save(&self, partition_key: &str, period: i32, records: &[Record]) -> Result<PathBuf> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let dir = partition_dir(&self.data_dir, partition_key);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create dir: {}", dir.display()))?;

        let snapshot = Snapshot {
            partition_key: partition_key.to_string(),
            period,
            fetched_at: Utc::now(),
            record_count: records.len(),
            records: records.to_vec(),
        };
        let json = serde_json::to_vec_pretty(&snapshot).context("serialize snapshot")?;

        let path = snapshot_path(&self.data_dir, partition_key, period);
        storage::write_atomic(&path, &json)?;
        Ok(path)
    }
}
