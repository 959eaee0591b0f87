use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// --- Canonical job record ---

/// Which external provider a job came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    Simplify,
    LinkedIn,
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceTag::Simplify => write!(f, "simplify"),
            SourceTag::LinkedIn => write!(f, "linkedin"),
        }
    }
}

/// One job posting in canonical shape. Source adapters produce this; only
/// the scoring stage mutates it afterwards (the `score` field).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub source: SourceTag,
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub terms: String,
    pub sponsorship: String,
    pub degrees: String,
    pub score: Option<u8>,
}

impl JobRecord {
    /// Deduplication fingerprint: SHA-256 over (title, company, url) only.
    /// Case-sensitive, missing fields hash as empty strings. Every other
    /// field is free to vary without changing the fingerprint.
    pub fn fingerprint(&self) -> String {
        let key = format!("{}-{}-{}", self.title, self.company, self.url);
        let digest = Sha256::digest(key.as_bytes());
        hex::encode(digest)
    }
}

// --- Raw source record shapes ---

/// A raw listing from the Simplify listings.json feed. Every field is
/// tolerated missing; the feed is inconsistently populated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimplifyListing {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "companyName")]
    pub company_name: Option<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub terms: Vec<String>,
    #[serde(default)]
    pub degrees: Vec<String>,
    #[serde(default)]
    pub sponsorship: Option<String>,
    #[serde(default, alias = "jobUrl")]
    pub url: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    /// Unix timestamp (seconds). Kept raw; the recency filter decides
    /// whether it parses.
    #[serde(default)]
    pub date_posted: Option<i64>,
}

fn default_true() -> bool {
    true
}

impl SimplifyListing {
    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        self.date_posted
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }
}

// --- Run state ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    Started,
    Finished,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::Started => "started",
            RunStatus::Finished => "finished",
            RunStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(RunStatus::Queued),
            "started" => Some(RunStatus::Started),
            "finished" => Some(RunStatus::Finished),
            "failed" => Some(RunStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Finished | RunStatus::Failed)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one pipeline run as read back from the state store.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub job_id: String,
    pub status: RunStatus,
    pub progress: u8,
    pub result: Option<serde_json::Value>,
}

/// Success payload written at the finished transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub recent_jobs_count: usize,
    pub new_simplify_jobs: usize,
    pub total_apify_jobs: usize,
    pub new_apify_jobs: usize,
}
