//! Existence oracle: derives task completion from on-disk snapshots alone.

use std::path::Path;

use super::{read, snapshot_path};

/// True only if the snapshot file exists, decodes, belongs to (`partition_key`, `period`),
/// and holds at least one record.
///
/// A zero-record or unreadable snapshot counts as absent so the task is fetched again.
/// So does one written for another key that sanitizes to the same directory.
pub fn exists(data_dir: &Path, partition_key: &str, period: i32) -> bool {
    let path = snapshot_path(data_dir, partition_key, period);
    if !path.exists() {
        return false;
    }
    match read(&path) {
        Ok(snapshot) if snapshot.partition_key != partition_key || snapshot.period != period => {
            tracing::debug!(
                path = %path.display(),
                found = %snapshot.partition_key,
                found_year = snapshot.period,
                "snapshot belongs to another task"
            );
            false
        }
        Ok(snapshot) => snapshot.record_count > 0,
        Err(e) => {
            tracing::debug!(path = %path.display(), "ignoring invalid snapshot: {:#}", e);
            false
        }
    }
}
