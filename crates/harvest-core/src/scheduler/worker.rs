//! One worker: pull from the shared queue until it is drained.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use super::error::TaskError;
use super::summary::Counters;
use super::Pipeline;
use crate::snapshot;
use crate::source::{self, fetch_all};
use crate::task::Task;

pub(super) type SharedQueue = Arc<Mutex<mpsc::Receiver<Task>>>;

/// How a dispatched task ended when it did not fail.
#[derive(Debug)]
pub(super) enum TaskOutcome {
    /// Became complete between planning and execution; nothing fetched.
    AlreadyDone,
    Saved { path: PathBuf, records: usize },
}

pub(super) async fn worker_loop(
    worker_id: usize,
    pipeline: Pipeline,
    queue: SharedQueue,
    counters: Arc<Counters>,
) {
    let delay = pipeline.config.delay;
    loop {
        let next = queue.lock().await.recv().await;
        let Some(task) = next else {
            break;
        };

        match process_task(&pipeline, &task).await {
            Ok(TaskOutcome::AlreadyDone) => {
                tracing::info!(worker = worker_id, task = %task, "skip: completed meanwhile");
                counters.record_success();
            }
            Ok(TaskOutcome::Saved { path, records }) => {
                tracing::info!(
                    worker = worker_id,
                    task = %task,
                    records,
                    path = %path.display(),
                    "done"
                );
                counters.record_success();
            }
            Err(TaskError::EmptyResult) => {
                tracing::warn!(worker = worker_id, task = %task, "no data");
                counters.record_failure();
            }
            Err(TaskError::Fetch(e)) => {
                let kind = source::classify(&e);
                tracing::warn!(worker = worker_id, task = %task, ?kind, "fetch failed: {}", e);
                counters.record_failure();
            }
            Err(e) => {
                tracing::warn!(worker = worker_id, task = %task, "task failed: {}", e);
                counters.record_failure();
            }
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
    tracing::debug!(worker = worker_id, "queue drained, worker exiting");
}

/// Re-check completion, fetch every page, persist the snapshot, then mark the ledger.
pub(super) async fn process_task(pipeline: &Pipeline, task: &Task) -> Result<TaskOutcome, TaskError> {
    if pipeline.ledger.is_complete(task) {
        return Ok(TaskOutcome::AlreadyDone);
    }
    let on_disk = tokio::task::spawn_blocking({
        let data_dir = pipeline.writer.data_dir().to_path_buf();
        let task = task.clone();
        move || snapshot::exists(&data_dir, &task.partition_key, task.period)
    })
    .await?;
    if on_disk {
        pipeline.ledger.mark_complete(task).map_err(TaskError::Ledger)?;
        return Ok(TaskOutcome::AlreadyDone);
    }

    tracing::info!(task = %task, "fetch");

    let records = tokio::task::spawn_blocking({
        let source = Arc::clone(&pipeline.source);
        let task = task.clone();
        let delay = pipeline.config.delay;
        move || fetch_all(source.as_ref(), &task, delay)
    })
    .await??;

    if records.is_empty() {
        return Err(TaskError::EmptyResult);
    }

    let writer = Arc::clone(&pipeline.writer);
    let ledger = Arc::clone(&pipeline.ledger);
    let task = task.clone();
    tokio::task::spawn_blocking(move || -> Result<TaskOutcome, TaskError> {
        let path = writer
            .save(&task.partition_key, task.period, &records)
            .map_err(TaskError::Persistence)?;
        ledger.mark_complete(&task).map_err(TaskError::Ledger)?;
        Ok(TaskOutcome::Saved {
            path,
            records: records.len(),
        })
    })
    .await?
}
