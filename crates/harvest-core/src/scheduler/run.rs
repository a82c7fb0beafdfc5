//! Drive one pipeline invocation: plan, fan out, join, summarize.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, Mutex};

use super::plan::plan;
use super::summary::{Counters, RunSummary};
use super::worker::worker_loop;
use super::Pipeline;
use crate::task::{self, Task};

/// Runs the configured partition keys × periods with `config.workers`
/// concurrent workers (at least 1).
///
/// Per-task failures are counted, logged and left for the next run. Only
/// failing to create the data directory, to write the initial ledger, or to
/// join a worker aborts the run.
pub async fn run_pipeline(pipeline: &Pipeline) -> Result<RunSummary> {
    let cfg = &pipeline.config;
    tracing::info!(
        locations = cfg.partition_keys.len(),
        years = cfg.periods.len(),
        "expanding task space"
    );
    let tasks = task::expand(&cfg.partition_keys, &cfg.periods);
    run_tasks(pipeline, tasks).await
}

/// Like [`run_pipeline`] but over an explicit task list instead of the
/// configured cross product.
pub async fn run_tasks(pipeline: &Pipeline, tasks: Vec<Task>) -> Result<RunSummary> {
    let start = Instant::now();
    let cfg = &pipeline.config;

    std::fs::create_dir_all(&cfg.data_dir)
        .with_context(|| format!("create data dir: {}", cfg.data_dir.display()))?;

    let workers = cfg.workers.max(1);
    tracing::info!(
        workers,
        delay_secs = cfg.delay.as_secs_f64(),
        tasks = tasks.len(),
        "starting harvest"
    );

    // Planning reads every existing snapshot file.
    let plan = tokio::task::spawn_blocking({
        let pipeline = pipeline.clone();
        move || plan(&pipeline, tasks)
    })
    .await
    .context("planning task")??;
    tracing::info!(
        total = plan.total,
        pending = plan.pending.len(),
        skipped = plan.skipped,
        reconciled = plan.reconciled,
        "planned tasks"
    );

    if plan.pending.is_empty() {
        tracing::info!("all tasks complete, nothing to fetch");
        return Ok(RunSummary {
            total: plan.total,
            skipped: plan.skipped,
            reconciled: plan.reconciled,
            successful: 0,
            failed: 0,
            elapsed: start.elapsed(),
        });
    }

    let (tx, rx) = mpsc::channel(plan.pending.len());
    for task in plan.pending {
        tx.send(task)
            .await
            .map_err(|_| anyhow::anyhow!("task queue closed before dispatch"))?;
    }
    drop(tx);

    let queue = Arc::new(Mutex::new(rx));
    let counters = Arc::new(Counters::default());
    let mut join_set = tokio::task::JoinSet::new();
    for worker_id in 0..workers {
        join_set.spawn(worker_loop(
            worker_id,
            pipeline.clone(),
            Arc::clone(&queue),
            Arc::clone(&counters),
        ));
    }

    while let Some(res) = join_set.join_next().await {
        res.map_err(|e| anyhow::anyhow!("worker join: {}", e))?;
    }

    let (successful, failed) = counters.load();
    let summary = RunSummary {
        total: plan.total,
        skipped: plan.skipped,
        reconciled: plan.reconciled,
        successful,
        failed,
        elapsed: start.elapsed(),
    };
    tracing::info!(
        total = summary.total,
        successful,
        failed,
        skipped = summary.skipped,
        elapsed_secs = summary.elapsed.as_secs_f64(),
        "harvest complete"
    );
    Ok(summary)
}
