//! Fire-and-forget run submission over a bounded pool.
//!
//! `submit` records the run as queued and returns its id immediately; the
//! run task waits for a pool permit before the pipeline touches anything.
//! There is no cancellation — once started, a run ends only at its terminal
//! state (per-network-call timeouts are the only deadlines).

use std::sync::Arc;

use uuid::Uuid;

use jobsignal_common::{JobSignalError, PipelineRun, RunStatus};

use crate::pipeline::Pipeline;
use crate::pool::TaskPool;
use crate::run_tracker::{fetch_run, RunTracker};
use crate::store::KvStore;

pub struct RunPool {
    pipeline: Arc<Pipeline>,
    store: Arc<dyn KvStore>,
    pool: TaskPool,
    default_window_minutes: i64,
}

impl RunPool {
    pub fn new(
        pipeline: Arc<Pipeline>,
        store: Arc<dyn KvStore>,
        max_concurrent_runs: usize,
        default_window_minutes: i64,
    ) -> Self {
        Self {
            pipeline,
            store,
            pool: TaskPool::new(max_concurrent_runs),
            default_window_minutes,
        }
    }

    /// Submit a new run. Returns the run id once the queued state is
    /// recorded; the pipeline itself runs in the background.
    pub async fn submit(&self, window_minutes: Option<i64>) -> Result<String, JobSignalError> {
        let run_id = Uuid::new_v4().to_string();
        let window = window_minutes.unwrap_or(self.default_window_minutes);

        let tracker = RunTracker::new(self.store.clone(), &run_id);
        tracker.set_status(RunStatus::Queued).await?;
        tracker.set_progress(0).await?;

        let pipeline = self.pipeline.clone();
        let id = run_id.clone();
        self.pool.spawn(async move {
            pipeline.run(&id, window).await;
        });

        tracing::info!(run_id = %run_id, window_minutes = window, "Run submitted");
        Ok(run_id)
    }

    /// Status lookup. `None` for unknown or TTL-expired run ids.
    pub async fn status(&self, run_id: &str) -> Result<Option<PipelineRun>, JobSignalError> {
        fetch_run(self.store.as_ref(), run_id).await
    }
}
