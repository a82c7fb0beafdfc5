//! `harvest status` – show ledger progress.

use anyhow::Result;
use harvest_core::ledger::{ProgressLedger, LEDGER_FILE_NAME};
use std::path::Path;

pub fn run_status(data_dir: &Path) -> Result<()> {
    let path = data_dir.join(LEDGER_FILE_NAME);
    if !path.exists() {
        println!("No progress recorded at {}.", path.display());
        return Ok(());
    }

    let status = ProgressLedger::load(&path).status();
    println!("Ledger:   {}", path.display());
    println!(
        "Progress: {}/{} tasks ({:.1}%)",
        status.completed_count, status.total_tasks, status.percent_complete
    );
    println!("Started:  {}", status.started_at.to_rfc3339());
    println!("Updated:  {}", status.last_updated_at.to_rfc3339());
    if !status.recent.is_empty() {
        println!("Recently completed:");
        for key in &status.recent {
            println!("  {}", key);
        }
    }
    Ok(())
}
