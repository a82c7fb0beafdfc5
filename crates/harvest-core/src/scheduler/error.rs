//! Per-task failure taxonomy. Caught at the worker boundary and counted.

use thiserror::Error;

use crate::source::FetchError;

#[derive(Debug, Error)]
pub enum TaskError {
    /// Transport or protocol failure on any page.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The source returned zero records; treated as a failure so the task is retried next run.
    #[error("no records returned")]
    EmptyResult,
    /// Snapshot directory or file write failed.
    #[error("save snapshot: {0:#}")]
    Persistence(anyhow::Error),
    /// Snapshot was written but the ledger flush failed.
    #[error("update ledger: {0:#}")]
    Ledger(anyhow::Error),
    /// A blocking fetch or write task panicked or was cancelled.
    #[error("blocking task join: {0}")]
    Join(#[from] tokio::task::JoinError),
}
