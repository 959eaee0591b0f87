//! The five-stage ingestion pipeline.
//!
//! Stage boundaries advance the run's progress checkpoints: 0 at start, 25
//! after the mandatory feed (fetch, recency filter, dedup), 75 after the
//! optional feed (or its skip), 85 after the scoring barrier, 100 at the
//! terminal transition. The outer handler in [`Pipeline::run`] is the single
//! point converting any escaped error into a failed/100/{error} outcome, so
//! callers never observe a run stuck in `started` beyond its TTL.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use jobsignal_common::{JobRecord, JobSignalError, RunResult, RunStatus, SourceTag};

use crate::dedup::DedupStore;
use crate::digest::{render_digest, subject};
use crate::mailer::{EmailMessage, Mailer};
use crate::normalize::{filter_recent, normalize_linkedin, normalize_simplify};
use crate::run_tracker::RunTracker;
use crate::score::ScoringStage;
use crate::sources::{ActorFetcher, ListingsFetcher};
use crate::store::KvStore;

pub struct Pipeline {
    store: Arc<dyn KvStore>,
    listings: Arc<dyn ListingsFetcher>,
    actor: Option<Arc<dyn ActorFetcher>>,
    scoring: ScoringStage,
    mailer: Arc<dyn Mailer>,
    recipients: Vec<String>,
    from: String,
    send_empty_digest: bool,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn KvStore>,
        listings: Arc<dyn ListingsFetcher>,
        actor: Option<Arc<dyn ActorFetcher>>,
        scoring: ScoringStage,
        mailer: Arc<dyn Mailer>,
        recipients: Vec<String>,
    ) -> Self {
        Self {
            store,
            listings,
            actor,
            scoring,
            mailer,
            recipients,
            from: crate::mailer::DEFAULT_FROM.to_string(),
            send_empty_digest: false,
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    /// Send a digest even when both sources report zero new jobs.
    pub fn with_send_empty_digest(mut self, send: bool) -> Self {
        self.send_empty_digest = send;
        self
    }

    /// Execute one run to its terminal state. Never returns an error: every
    /// failure ends up recorded in the run's state instead.
    pub async fn run(&self, run_id: &str, window_minutes: i64) {
        let tracker = RunTracker::new(self.store.clone(), run_id);
        match self.execute(&tracker, window_minutes).await {
            Ok(result) => {
                info!(run_id, ?result, "Pipeline run finished");
                if let Err(err) = Self::finish(&tracker, &result).await {
                    error!(run_id, error = %err, "Failed to record finished state");
                }
            }
            Err(err) => {
                error!(run_id, error = %err, "Pipeline run failed");
                if let Err(store_err) = Self::fail(&tracker, &err).await {
                    error!(run_id, error = %store_err, "Failed to record failed state");
                }
            }
        }
    }

    async fn execute(
        &self,
        tracker: &RunTracker,
        window_minutes: i64,
    ) -> Result<RunResult, JobSignalError> {
        tracker.set_status(RunStatus::Started).await?;
        tracker.set_progress(0).await?;
        info!(run_id = %tracker.run_id(), window_minutes, "Pipeline run started");

        let dedup = DedupStore::new(self.store.clone());

        // Stage 1: mandatory listings feed. A failure here fails the run.
        let listings = self.listings.fetch().await?;
        let recent = filter_recent(listings, Utc::now(), window_minutes);
        let recent_count = recent.len();
        let simplify_jobs: Vec<JobRecord> = recent.iter().map(normalize_simplify).collect();
        let new_simplify = dedup.filter_new(simplify_jobs).await?;
        tracker.set_progress(25).await?;

        // Stage 2: optional actor feed. A failure is logged and the run
        // proceeds with empty results for this source only.
        let (total_linkedin, new_linkedin) = match &self.actor {
            None => (0, Vec::new()),
            Some(actor) => match actor.fetch().await {
                Ok(items) => {
                    let jobs: Vec<JobRecord> = items.iter().map(normalize_linkedin).collect();
                    let total = jobs.len();
                    (total, dedup.filter_new(jobs).await?)
                }
                Err(err) => {
                    warn!(error = %err, "Optional source fetch failed, skipping");
                    (0, Vec::new())
                }
            },
        };
        tracker.set_progress(75).await?;

        // Stage 3: score the union of newly-deduplicated jobs from both
        // sources. Blocks until every scoring task completes.
        let to_score: Vec<JobRecord> = new_simplify.into_iter().chain(new_linkedin).collect();
        let scored = self.scoring.score_all(to_score).await;
        tracker.set_progress(85).await?;

        let (new_simplify, new_linkedin): (Vec<JobRecord>, Vec<JobRecord>) = scored
            .into_iter()
            .partition(|job| job.source == SourceTag::Simplify);

        let result = RunResult {
            recent_jobs_count: recent_count,
            new_simplify_jobs: new_simplify.len(),
            total_apify_jobs: total_linkedin,
            new_apify_jobs: new_linkedin.len(),
        };

        // Stage 4: digest. A send failure is logged, never fatal.
        if new_simplify.is_empty() && new_linkedin.is_empty() && !self.send_empty_digest {
            info!(run_id = %tracker.run_id(), "No new jobs from either source, skipping digest");
        } else {
            let message = EmailMessage {
                from: self.from.clone(),
                to: self.recipients.clone(),
                subject: subject(new_simplify.len(), new_linkedin.len()),
                html: render_digest(&new_simplify, &new_linkedin),
            };
            if let Err(err) = self.mailer.send(&message).await {
                warn!(error = %err, "Digest send failed, run still finishing");
            }
        }

        Ok(result)
    }

    async fn finish(tracker: &RunTracker, result: &RunResult) -> Result<(), JobSignalError> {
        tracker.set_progress(100).await?;
        tracker.set_status(RunStatus::Finished).await?;
        tracker
            .set_result(&serde_json::to_value(result).expect("RunResult serializes"))
            .await
    }

    async fn fail(tracker: &RunTracker, err: &JobSignalError) -> Result<(), JobSignalError> {
        tracker.set_progress(100).await?;
        tracker.set_status(RunStatus::Failed).await?;
        tracker
            .set_result(&serde_json::json!({ "error": err.to_string() }))
            .await
    }
}
