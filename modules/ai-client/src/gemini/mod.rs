mod client;
pub(crate) mod types;

use async_trait::async_trait;
use tracing::debug;

use client::GeminiClient;
use types::GenerateContentRequest;

use crate::error::ScoreError;
use crate::traits::ResumeScorer;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

/// Resume-fit scorer backed by Gemini. Holds the resume text for the life
/// of the process; one request per job.
pub struct GeminiScorer {
    api_key: String,
    model: String,
    resume_text: Option<String>,
    base_url: Option<String>,
}

impl GeminiScorer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            resume_text: None,
            base_url: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_resume(mut self, resume_text: impl Into<String>) -> Self {
        let text = resume_text.into();
        let text = text.trim();
        if !text.is_empty() {
            self.resume_text = Some(text.to_string());
        }
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    fn client(&self) -> GeminiClient {
        let client = GeminiClient::new(&self.api_key);
        match &self.base_url {
            Some(url) => client.with_base_url(url),
            None => client,
        }
    }

    fn build_prompt(&self, job_title: &str, company_name: &str, job_description: &str) -> String {
        let resume = self.resume_text.as_deref().unwrap_or_default();
        format!(
            "You are an expert resume reviewer. Score how well this resume matches the job posting.\n\
             \n\
             RESUME:\n{resume}\n\
             \n\
             JOB POSTING:\n\
             Title: {job_title}\n\
             Company: {company_name}\n\
             Description: {job_description}\n\
             \n\
             Format:\n\
             SCORE: [number 0-100]"
        )
    }
}

/// Pull the score out of a model reply. Accepts "SCORE: 87", a bare number,
/// or digits buried in the first matching line; clamps into [0, 100].
pub(crate) fn parse_score(reply: &str) -> Result<u8, ScoreError> {
    let line = reply
        .lines()
        .find(|l| l.contains("SCORE") || l.chars().any(|c| c.is_ascii_digit()))
        .ok_or_else(|| ScoreError::Other(format!("No score in model reply: {reply:?}")))?;

    let digits: String = line.chars().filter(|c| c.is_ascii_digit()).collect();
    let value: u32 = digits
        .parse()
        .map_err(|_| ScoreError::Other(format!("No score in model reply: {reply:?}")))?;

    Ok(value.min(100) as u8)
}

#[async_trait]
impl ResumeScorer for GeminiScorer {
    fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && self.resume_text.is_some()
    }

    async fn score_job_match(
        &self,
        job_title: &str,
        company_name: &str,
        job_description: &str,
    ) -> Result<u8, ScoreError> {
        if !self.is_configured() {
            return Err(ScoreError::Other("scorer not configured".to_string()));
        }

        let prompt = self.build_prompt(job_title, company_name, job_description);
        let request = GenerateContentRequest::from_text(prompt);
        let response = self.client().generate_content(&self.model, &request).await?;

        let reply = response
            .text()
            .ok_or_else(|| ScoreError::Other("Empty model response".to_string()))?;
        let score = parse_score(reply)?;
        debug!(job_title, company_name, score, "Scored job match");
        Ok(score)
    }
}
