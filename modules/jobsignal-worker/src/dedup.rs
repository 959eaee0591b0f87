//! Content-addressable dedup across both job sources.
//!
//! A fingerprint key existing in the store means "already notified". The
//! check-then-reserve pair is deliberately not atomic: two concurrent runs
//! can both see a fingerprint absent and both reserve it, producing at most
//! one duplicate notification. That trade-off is accepted; do not promote
//! this to a transactional guarantee.

use std::sync::Arc;
use std::time::Duration;

use jobsignal_common::{JobRecord, JobSignalError};

use crate::store::KvStore;

/// Retention for dedup entries, independent of any run.
pub const DEDUP_TTL: Duration = Duration::from_secs(3 * 24 * 60 * 60);

#[derive(Clone)]
pub struct DedupStore {
    store: Arc<dyn KvStore>,
}

impl DedupStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub async fn exists(&self, fingerprint: &str) -> Result<bool, JobSignalError> {
        self.store.exists(fingerprint).await
    }

    /// Set-if-absent with TTL. Idempotent: reserving an already-present
    /// fingerprint is a no-op and preserves the first-written value.
    pub async fn reserve(&self, fingerprint: &str, url: &str) -> Result<(), JobSignalError> {
        self.store.set_nx_ex(fingerprint, url, DEDUP_TTL).await?;
        Ok(())
    }

    /// Keep only jobs whose fingerprint has not been seen, reserving each
    /// new fingerprint as it is admitted.
    pub async fn filter_new(&self, jobs: Vec<JobRecord>) -> Result<Vec<JobRecord>, JobSignalError> {
        let mut new_jobs = Vec::new();
        for job in jobs {
            let fingerprint = job.fingerprint();
            if self.exists(&fingerprint).await? {
                continue;
            }
            self.reserve(&fingerprint, &job.url).await?;
            new_jobs.push(job);
        }
        Ok(new_jobs)
    }
}
