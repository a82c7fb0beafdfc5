//! Durable progress ledger (JSON file, default `<data_dir>/progress.json`).
//!
//! Records which (partition, period) tasks completed so an interrupted run
//! resumes without refetching. Every completion is flushed immediately and
//! each flush atomically replaces the whole file.

mod store;
mod types;

pub use store::ProgressLedger;
pub use types::{LedgerFile, LedgerStatus};

/// File name of the ledger inside the data directory.
pub const LEDGER_FILE_NAME: &str = "progress.json";

/// Number of completed keys shown by [`ProgressLedger::status`].
pub const RECENT_LIMIT: usize = 10;

#[cfg(test)]
mod tests;
