//! Test doubles for the pipeline seams, plus record builders.
//!
//! Tests follow MOCK → FUNCTION → OUTPUT: build fakes, call one real
//! component, assert what came out.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use ai_client::{ResumeScorer, ScoreError};
use apify_client::LinkedInJob;
use jobsignal_common::{JobRecord, JobSignalError, SimplifyListing, SourceTag};

use crate::mailer::{EmailMessage, Mailer};
use crate::sources::{ActorFetcher, ListingsFetcher};
use crate::store::KvStore;

// ---------------------------------------------------------------------------
// Record builders
// ---------------------------------------------------------------------------

pub fn simplify_job(title: &str, company: &str, url: &str) -> JobRecord {
    JobRecord {
        source: SourceTag::Simplify,
        title: title.to_string(),
        company: company.to_string(),
        location: "Remote".to_string(),
        url: url.to_string(),
        posted_at: None,
        terms: String::new(),
        sponsorship: String::new(),
        degrees: String::new(),
        score: None,
    }
}

/// An active, visible listing posted at `posted` (unix seconds).
pub fn recent_listing(title: &str, company: &str, url: &str, posted: i64) -> SimplifyListing {
    SimplifyListing {
        title: Some(title.to_string()),
        company_name: Some(company.to_string()),
        url: Some(url.to_string()),
        active: true,
        is_visible: true,
        date_posted: Some(posted),
        ..Default::default()
    }
}

pub fn linkedin_item(title: &str, company: &str, url: &str) -> LinkedInJob {
    LinkedInJob {
        title: Some(title.to_string()),
        company_name: Some(company.to_string()),
        location: Some("United States".to_string()),
        job_url: Some(url.to_string()),
        contract_type: Some("Internship".to_string()),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// In-memory KvStore
// ---------------------------------------------------------------------------

/// HashMap-backed store. TTLs are accepted and ignored; the write log keeps
/// every `set_ex` in order so tests can assert checkpoint sequences.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<(String, String)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw_get(&self, key: &str) -> Option<String> {
        self.data.lock().unwrap().get(key).cloned()
    }

    /// Every progress value written for `run_id`, in write order.
    pub fn progress_writes(&self, run_id: &str) -> Vec<u8> {
        let key = format!("progress:{run_id}");
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.parse().unwrap())
            .collect()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, JobSignalError> {
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    async fn set_ex(&self, key: &str, value: &str, _ttl: Duration) -> Result<(), JobSignalError> {
        self.data
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.writes
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string()));
        Ok(())
    }

    async fn set_nx_ex(
        &self,
        key: &str,
        value: &str,
        _ttl: Duration,
    ) -> Result<bool, JobSignalError> {
        let mut data = self.data.lock().unwrap();
        if data.contains_key(key) {
            return Ok(false);
        }
        data.insert(key.to_string(), value.to_string());
        Ok(true)
    }

    async fn exists(&self, key: &str) -> Result<bool, JobSignalError> {
        Ok(self.data.lock().unwrap().contains_key(key))
    }
}

// ---------------------------------------------------------------------------
// Source fetchers
// ---------------------------------------------------------------------------

pub struct StaticListings {
    listings: Vec<SimplifyListing>,
}

impl StaticListings {
    pub fn new(listings: Vec<SimplifyListing>) -> Self {
        Self { listings }
    }
}

#[async_trait]
impl ListingsFetcher for StaticListings {
    async fn fetch(&self) -> Result<Vec<SimplifyListing>, JobSignalError> {
        Ok(self.listings.clone())
    }
}

pub struct FailingListings;

#[async_trait]
impl ListingsFetcher for FailingListings {
    async fn fetch(&self) -> Result<Vec<SimplifyListing>, JobSignalError> {
        Err(JobSignalError::source_fetch(
            "simplify",
            "connection refused",
        ))
    }
}

pub struct StaticActorFeed {
    items: Vec<LinkedInJob>,
}

impl StaticActorFeed {
    pub fn new(items: Vec<LinkedInJob>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl ActorFetcher for StaticActorFeed {
    async fn fetch(&self) -> Result<Vec<LinkedInJob>, JobSignalError> {
        Ok(self.items.clone())
    }
}

pub struct FailingActorFeed;

#[async_trait]
impl ActorFetcher for FailingActorFeed {
    async fn fetch(&self) -> Result<Vec<LinkedInJob>, JobSignalError> {
        Err(JobSignalError::source_fetch("linkedin", "actor run aborted"))
    }
}

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

enum ScorerMode {
    Fixed(u8),
    RateLimitedTimes { failures: u32, then: u8 },
    AlwaysFailing,
    Unconfigured,
}

pub struct ScriptedScorer {
    mode: ScorerMode,
    calls: AtomicU32,
}

impl ScriptedScorer {
    pub fn fixed(score: u8) -> Self {
        Self {
            mode: ScorerMode::Fixed(score),
            calls: AtomicU32::new(0),
        }
    }

    /// Rate-limit the first `failures` calls, then return `then`.
    pub fn rate_limited_times(failures: u32, then: u8) -> Self {
        Self {
            mode: ScorerMode::RateLimitedTimes { failures, then },
            calls: AtomicU32::new(0),
        }
    }

    pub fn always_failing() -> Self {
        Self {
            mode: ScorerMode::AlwaysFailing,
            calls: AtomicU32::new(0),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            mode: ScorerMode::Unconfigured,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResumeScorer for ScriptedScorer {
    fn is_configured(&self) -> bool {
        !matches!(self.mode, ScorerMode::Unconfigured)
    }

    async fn score_job_match(
        &self,
        _job_title: &str,
        _company_name: &str,
        _job_description: &str,
    ) -> Result<u8, ScoreError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        match &self.mode {
            ScorerMode::Fixed(score) => Ok(*score),
            ScorerMode::RateLimitedTimes { failures, then } => {
                if call <= *failures {
                    Err(ScoreError::RateLimited("quota exceeded".to_string()))
                } else {
                    Ok(*then)
                }
            }
            ScorerMode::AlwaysFailing => Err(ScoreError::Other("model unavailable".to_string())),
            ScorerMode::Unconfigured => Err(ScoreError::Other("not configured".to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), JobSignalError> {
        if self.fail {
            return Err(JobSignalError::Notification(
                "provider rejected the message".to_string(),
            ));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
