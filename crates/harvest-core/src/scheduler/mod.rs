//! Task scheduler and worker pool.
//!
//! Expands partition keys × periods, filters finished work through the
//! progress ledger and the snapshot oracle, then drains the remaining tasks
//! through a fixed number of workers sharing one queue:
//! fetch (all pages) → snapshot write → ledger flush.

mod error;
mod plan;
mod run;
mod summary;
mod worker;

pub use error::TaskError;
pub use plan::{plan, Plan};
pub use run::{run_pipeline, run_tasks};
pub use summary::RunSummary;

use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::ledger::ProgressLedger;
use crate::snapshot::SnapshotWriter;
use crate::source::PageSource;

/// Everything a pipeline run needs. Cheap to clone; workers each hold a clone.
#[derive(Clone)]
pub struct Pipeline {
    pub config: PipelineConfig,
    pub source: Arc<dyn PageSource>,
    pub ledger: Arc<ProgressLedger>,
    pub writer: Arc<SnapshotWriter>,
}

impl Pipeline {
    /// Build a pipeline with the ledger at `<data_dir>/progress.json` and
    /// snapshots under `data_dir`.
    pub fn new(config: PipelineConfig, source: Arc<dyn PageSource>) -> Self {
        let ledger = Arc::new(ProgressLedger::load(config.ledger_path()));
        let writer = Arc::new(SnapshotWriter::new(config.data_dir.clone()));
        Self {
            config,
            source,
            ledger,
            writer,
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("ledger", &self.ledger.path())
            .field("data_dir", &self.writer.data_dir())
            .finish_non_exhaustive()
    }
}
