//! Per-partition snapshot files: layout, writer, and existence oracle.
//!
//! Layout: `<data_dir>/<sanitized partition key>/wages_<period>.json`.
//! Downstream statistics and upload tools read these files directly.

mod oracle;
mod writer;

pub use oracle::exists;
pub use writer::SnapshotWriter;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::sanitize::sanitize_partition_key;
use crate::source::Record;

/// Persisted output of one completed task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "location")]
    pub partition_key: String,
    #[serde(rename = "year")]
    pub period: i32,
    #[serde(rename = "scraped_at")]
    pub fetched_at: DateTime<Utc>,
    #[serde(rename = "total_records")]
    pub record_count: usize,
    #[serde(default)]
    pub records: Vec<Record>,
}

/// Directory holding every snapshot of one partition.
pub fn partition_dir(data_dir: &Path, partition_key: &str) -> PathBuf {
    data_dir.join(sanitize_partition_key(partition_key))
}

/// Expected snapshot path for a (partition, period) pair.
pub fn snapshot_path(data_dir: &Path, partition_key: &str, period: i32) -> PathBuf {
    partition_dir(data_dir, partition_key).join(format!("wages_{}.json", period))
}

/// Read and decode a snapshot file.
pub fn read(path: &Path) -> Result<Snapshot> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read snapshot: {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse snapshot: {}", path.display()))
}
