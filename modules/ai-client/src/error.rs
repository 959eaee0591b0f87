use thiserror::Error;

/// Scoring failures, split by how the caller should react: rate limits are
/// worth retrying, anything else is not.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Scoring error: {0}")]
    Other(String),
}

impl ScoreError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ScoreError::RateLimited(_))
    }
}

impl From<reqwest::Error> for ScoreError {
    fn from(err: reqwest::Error) -> Self {
        ScoreError::Other(err.to_string())
    }
}
