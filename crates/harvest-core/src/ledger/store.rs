//! Mutex-guarded ledger handle shared by all workers.

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::types::{LedgerFile, LedgerState, LedgerStatus};
use super::RECENT_LIMIT;
use crate::storage;
use crate::task::Task;

/// Handle to the progress ledger file.
///
/// All methods take `&self`; one mutex covers both the in-memory update and
/// the flush, so concurrent `mark_complete` calls never lose an update.
#[derive(Debug)]
pub struct ProgressLedger {
    path: PathBuf,
    state: Mutex<LedgerState>,
}

impl ProgressLedger {
    /// Load the ledger at `path`. A missing or undecodable file yields a fresh,
    /// empty ledger; this never fails.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match read_file(&path) {
            Ok(Some(file)) => {
                let state = LedgerState::from_file(file);
                tracing::debug!(
                    path = %path.display(),
                    completed = state.completed.len(),
                    total = state.total_tasks,
                    "loaded progress ledger"
                );
                state
            }
            Ok(None) => LedgerState::fresh(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "progress ledger unreadable, starting fresh: {:#}",
                    e
                );
                LedgerState::fresh()
            }
        };
        Self {
            path,
            state: Mutex::new(state),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_complete(&self, task: &Task) -> bool {
        self.lock().completed.contains(&task.key())
    }

    /// Mark `task` complete and flush. Returns false (and does not flush) if it
    /// was already complete.
    pub fn mark_complete(&self, task: &Task) -> Result<bool> {
        let mut state = self.lock();
        let key = task.key();
        if !state.completed.insert(key.clone()) {
            return Ok(false);
        }
        if let Err(e) = flush_locked(&self.path, &mut state) {
            // Memory must not claim more than the file holds.
            state.completed.remove(&key);
            return Err(e);
        }
        Ok(true)
    }

    /// Serialize the whole ledger and atomically replace the file.
    pub fn flush(&self) -> Result<()> {
        let mut state = self.lock();
        flush_locked(&self.path, &mut state)
    }

    /// Record the size of the task space, only if none was recorded before.
    /// Returns true if the total was set (and flushed).
    pub fn set_total_tasks_if_unset(&self, total: usize) -> Result<bool> {
        let mut state = self.lock();
        if state.total_tasks != 0 {
            return Ok(false);
        }
        state.total_tasks = total;
        if let Err(e) = flush_locked(&self.path, &mut state) {
            state.total_tasks = 0;
            return Err(e);
        }
        Ok(true)
    }

    pub fn total_tasks(&self) -> usize {
        self.lock().total_tasks
    }

    pub fn completed_count(&self) -> usize {
        self.lock().completed.len()
    }

    /// Clear all progress and delete the file (explicit full re-run).
    pub fn reset(&self) -> Result<()> {
        let mut state = self.lock();
        *state = LedgerState::fresh();
        for p in [self.path.clone(), storage::temp_path(&self.path)] {
            match std::fs::remove_file(&p) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("remove ledger: {}", p.display()))
                }
            }
        }
        tracing::info!(path = %self.path.display(), "progress ledger reset");
        Ok(())
    }

    pub fn status(&self) -> LedgerStatus {
        let state = self.lock();
        let completed_count = state.completed.len();
        let percent_complete = if state.total_tasks == 0 {
            0.0
        } else {
            completed_count as f64 * 100.0 / state.total_tasks as f64
        };
        let skip = completed_count.saturating_sub(RECENT_LIMIT);
        let recent = state
            .completed
            .iter()
            .skip(skip)
            .map(|k| k.as_str().to_string())
            .collect();
        LedgerStatus {
            total_tasks: state.total_tasks,
            completed_count,
            percent_complete,
            started_at: state.started_at,
            last_updated_at: state.last_updated_at,
            recent,
        }
    }
}

fn read_file(path: &Path) -> Result<Option<LedgerFile>> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read ledger: {}", path.display())),
    };
    let file = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse ledger: {}", path.display()))?;
    Ok(Some(file))
}

fn flush_locked(path: &Path, state: &mut LedgerState) -> Result<()> {
    state.last_updated_at = Utc::now();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
    }
    let json = serde_json::to_vec_pretty(&state.to_file()).context("serialize ledger")?;
    storage::write_atomic(path, &json)
}
