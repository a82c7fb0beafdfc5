//! Task expansion, filtering and ledger reconciliation (before any worker starts).

use anyhow::Result;
use std::collections::HashSet;

use super::Pipeline;
use crate::snapshot;
use crate::task::Task;

/// Work selected for one run.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub total: usize,
    /// Tasks neither ledger-complete nor backed by a valid snapshot, in expansion order.
    pub pending: Vec<Task>,
    pub skipped: usize,
    /// Tasks with a valid snapshot that the ledger did not list yet; now marked complete.
    pub reconciled: usize,
}

/// Record the task space size on first run, split `tasks` into pending and
/// skipped, and repair ledger drift from on-disk snapshots.
///
/// Duplicate tasks are dropped so no task can reach two workers.
pub fn plan(pipeline: &Pipeline, tasks: Vec<Task>) -> Result<Plan> {
    let cfg = &pipeline.config;
    let mut seen = HashSet::with_capacity(tasks.len());
    let tasks: Vec<Task> = tasks.into_iter().filter(|t| seen.insert(t.key())).collect();
    let total = tasks.len();

    if pipeline.ledger.set_total_tasks_if_unset(total)? {
        tracing::debug!(total, "recorded task space size in ledger");
    }

    let mut plan = Plan {
        total,
        ..Plan::default()
    };

    for task in tasks {
        let in_ledger = pipeline.ledger.is_complete(&task);
        let on_disk = snapshot::exists(&cfg.data_dir, &task.partition_key, task.period);

        if on_disk && !in_ledger {
            match pipeline.ledger.mark_complete(&task) {
                Ok(_) => {
                    tracing::info!(task = %task, "reconciled: valid snapshot found, marked complete");
                    plan.reconciled += 1;
                }
                Err(e) => {
                    tracing::warn!(task = %task, "could not reconcile ledger: {:#}", e);
                }
            }
        }

        if in_ledger || on_disk {
            tracing::debug!(task = %task, "skip: already complete");
            plan.skipped += 1;
        } else {
            plan.pending.push(task);
        }
    }

    Ok(plan)
}
