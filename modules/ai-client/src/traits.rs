use async_trait::async_trait;

use crate::error::ScoreError;

/// Scores how well a loaded resume matches one job posting.
///
/// Implementations are best-effort enrichment: callers treat any terminal
/// failure as "score unknown", never as a pipeline failure.
#[async_trait]
pub trait ResumeScorer: Send + Sync {
    /// True when the scorer has both a model credential and a resume.
    fn is_configured(&self) -> bool;

    /// Score the match in [0, 100]. Implementations clamp out-of-range
    /// model output into range.
    async fn score_job_match(
        &self,
        job_title: &str,
        company_name: &str,
        job_description: &str,
    ) -> Result<u8, ScoreError>;
}
