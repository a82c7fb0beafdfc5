//! Atomic whole-file replacement for snapshots and the progress ledger.
//!
//! Data is written to a `.part` sibling, synced, and renamed over the final
//! path, so readers only ever see the old file or the complete new one.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `wages_2020.json` → `wages_2020.json.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Write `data` to `final_path` via temp file + fsync + rename.
/// The parent directory must exist. Fails if the rename crosses filesystems.
pub fn write_atomic(final_path: &Path, data: &[u8]) -> Result<()> {
    let temp = temp_path(final_path);
    {
        let mut file = File::create(&temp)
            .with_context(|| format!("failed to create temp file: {}", temp.display()))?;
        file.write_all(data)
            .with_context(|| format!("failed to write temp file: {}", temp.display()))?;
        file.sync_all().context("storage sync failed")?;
    }
    std::fs::rename(&temp, final_path).with_context(|| {
        format!(
            "failed to rename {} to {}",
            temp.display(),
            final_path.display()
        )
    })?;
    Ok(())
}
