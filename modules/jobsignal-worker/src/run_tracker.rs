//! Per-run status/progress/result record with TTL.
//!
//! Keys are `status:{id}`, `progress:{id}`, `result:{id}`. The TTL is set
//! at each write and not refreshed on reads; an expired status key means
//! the run is gone. Only the orchestrator owning a run writes through a
//! tracker; everyone else reads via [`fetch_run`].

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use jobsignal_common::{JobSignalError, PipelineRun, RunStatus};

use crate::store::KvStore;

/// Retention for run state keys.
pub const RUN_TTL: Duration = Duration::from_secs(3 * 24 * 60 * 60);

pub struct RunTracker {
    store: Arc<dyn KvStore>,
    run_id: String,
    last_progress: AtomicU8,
}

impl RunTracker {
    pub fn new(store: Arc<dyn KvStore>, run_id: impl Into<String>) -> Self {
        Self {
            store,
            run_id: run_id.into(),
            last_progress: AtomicU8::new(0),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub async fn set_status(&self, status: RunStatus) -> Result<(), JobSignalError> {
        self.store
            .set_ex(&format!("status:{}", self.run_id), status.as_str(), RUN_TTL)
            .await
    }

    /// Write a progress checkpoint. Progress is monotonically non-decreasing
    /// within a run; a lower value than the last write is dropped.
    pub async fn set_progress(&self, value: u8) -> Result<(), JobSignalError> {
        let value = value.min(100);
        let last = self.last_progress.load(Ordering::Acquire);
        if value < last {
            warn!(run_id = %self.run_id, last, value, "Ignoring backwards progress write");
            return Ok(());
        }
        self.last_progress.store(value, Ordering::Release);
        self.store
            .set_ex(
                &format!("progress:{}", self.run_id),
                &value.to_string(),
                RUN_TTL,
            )
            .await
    }

    pub async fn set_result(&self, result: &serde_json::Value) -> Result<(), JobSignalError> {
        self.store
            .set_ex(
                &format!("result:{}", self.run_id),
                &result.to_string(),
                RUN_TTL,
            )
            .await
    }
}

/// Read one run back from the store. `None` when the status key was never
/// written or has expired.
pub async fn fetch_run(
    store: &dyn KvStore,
    run_id: &str,
) -> Result<Option<PipelineRun>, JobSignalError> {
    let Some(raw_status) = store.get(&format!("status:{run_id}")).await? else {
        return Ok(None);
    };
    let status = RunStatus::parse(&raw_status)
        .ok_or_else(|| JobSignalError::StateStore(format!("Bad status value: {raw_status}")))?;

    let progress = store
        .get(&format!("progress:{run_id}"))
        .await?
        .and_then(|p| p.parse().ok())
        .unwrap_or(0);

    let result = match store.get(&format!("result:{run_id}")).await? {
        Some(raw) => Some(
            serde_json::from_str(&raw)
                .map_err(|e| JobSignalError::StateStore(format!("Bad result JSON: {e}")))?,
        ),
        None => None,
    };

    Ok(Some(PipelineRun {
        job_id: run_id.to_string(),
        status,
        progress,
        result,
    }))
}
