//! `harvest reset` – delete the progress ledger.

use anyhow::Result;
use harvest_core::ledger::{ProgressLedger, LEDGER_FILE_NAME};
use std::path::Path;

pub fn run_reset(data_dir: &Path) -> Result<()> {
    let ledger = ProgressLedger::load(data_dir.join(LEDGER_FILE_NAME));
    ledger.reset()?;
    println!("Progress ledger removed: {}", ledger.path().display());
    Ok(())
}
