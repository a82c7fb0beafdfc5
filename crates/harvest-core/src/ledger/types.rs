//! Types used by the progress ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::task::TaskKey;

/// On-disk ledger layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerFile {
    pub completed_tasks: BTreeMap<String, bool>,
    pub start_time: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub total_tasks: usize,
    pub completed_count: usize,
}

/// Read-only projection used by the CLI `status` command.
#[derive(Debug, Clone)]
pub struct LedgerStatus {
    pub total_tasks: usize,
    pub completed_count: usize,
    /// Completed share of `total_tasks` in percent (0 when the total is unknown).
    pub percent_complete: f64,
    pub started_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
    /// Tail of the sorted completed key list.
    pub recent: Vec<String>,
}

/// In-memory ledger state guarded by the store's mutex.
#[derive(Debug, Clone)]
pub(super) struct LedgerState {
    pub completed: BTreeSet<TaskKey>,
    pub total_tasks: usize,
    pub started_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
}

impl LedgerState {
    pub fn fresh() -> Self {
        let now = Utc::now();
        Self {
            completed: BTreeSet::new(),
            total_tasks: 0,
            started_at: now,
            last_updated_at: now,
        }
    }

    /// Only keys marked `true` count; `completed_count` is rebuilt from the set.
    pub fn from_file(file: LedgerFile) -> Self {
        let completed = file
            .completed_tasks
            .into_iter()
            .filter(|(_, done)| *done)
            .map(|(k, _)| TaskKey::from(k))
            .collect();
        Self {
            completed,
            total_tasks: file.total_tasks,
            started_at: file.start_time,
            last_updated_at: file.last_updated,
        }
    }

    pub fn to_file(&self) -> LedgerFile {
        LedgerFile {
            completed_tasks: self
                .completed
                .iter()
                .map(|k| (k.as_str().to_string(), true))
                .collect(),
            start_time: self.started_at,
            last_updated: self.last_updated_at,
            total_tasks: self.total_tasks,
            completed_count: self.completed.len(),
        }
    }
}
