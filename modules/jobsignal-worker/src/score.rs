//! Best-effort resume scoring with rate-limit retry.
//!
//! Scoring never fails a run: exhausted retries, non-retryable errors, and
//! an unconfigured scorer all degrade to score 0 and the pipeline moves on.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use ai_client::ResumeScorer;
use jobsignal_common::JobRecord;

use crate::pool::TaskPool;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Backoff after attempt N is `N × base_wait`, N starting at 1.
    pub base_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_wait: Duration::from_secs(30),
        }
    }
}

/// Score one job, retrying rate-limit failures with linearly increasing
/// backoff. Any other failure degrades to 0 immediately.
pub async fn score_with_retry(
    scorer: &dyn ResumeScorer,
    job: &JobRecord,
    policy: &RetryPolicy,
) -> u8 {
    let description = format!("Location: {}. Terms: {}.", job.location, job.terms);

    for attempt in 1..=policy.max_attempts {
        match scorer
            .score_job_match(&job.title, &job.company, &description)
            .await
        {
            Ok(score) => return score,
            Err(err) if err.is_rate_limit() && attempt < policy.max_attempts => {
                let wait = policy.base_wait * attempt;
                warn!(
                    title = %job.title,
                    attempt,
                    wait_secs = wait.as_secs(),
                    "Scorer rate limited, backing off"
                );
                tokio::time::sleep(wait).await;
            }
            Err(err) if err.is_rate_limit() => {
                warn!(title = %job.title, attempt, "Scorer retries exhausted, degrading to 0");
                return 0;
            }
            Err(err) => {
                warn!(title = %job.title, error = %err, "Scoring failed, degrading to 0");
                return 0;
            }
        }
    }
    0
}

/// Bounded concurrent scoring stage. The pool is shared across runs; the
/// caller blocks until every submitted job is scored (barrier), so partial
/// results never leak downstream.
pub struct ScoringStage {
    scorer: Arc<dyn ResumeScorer>,
    pool: TaskPool,
    policy: RetryPolicy,
}

impl ScoringStage {
    pub fn new(scorer: Arc<dyn ResumeScorer>, pool: TaskPool, policy: RetryPolicy) -> Self {
        Self {
            scorer,
            pool,
            policy,
        }
    }

    pub async fn score_all(&self, mut jobs: Vec<JobRecord>) -> Vec<JobRecord> {
        if jobs.is_empty() {
            return jobs;
        }
        if !self.scorer.is_configured() {
            info!("Scorer not configured, skipping scoring");
            for job in &mut jobs {
                job.score = Some(0);
            }
            return jobs;
        }

        let mut handles = Vec::with_capacity(jobs.len());
        for job in &jobs {
            let scorer = self.scorer.clone();
            let policy = self.policy.clone();
            let job = job.clone();
            handles.push(
                self.pool
                    .spawn(async move { score_with_retry(scorer.as_ref(), &job, &policy).await }),
            );
        }

        for (job, handle) in jobs.iter_mut().zip(handles) {
            let score = match handle.await {
                Ok(score) => score,
                Err(err) => {
                    warn!(error = %err, "Scoring task aborted, degrading to 0");
                    0
                }
            };
            job.score = Some(score);
        }
        jobs
    }
}
