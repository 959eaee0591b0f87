use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApifyError>;

/// Failures from the Apify surface as the LinkedIn scrape sees them. A
/// malformed response body surfaces as `Network` (reqwest decodes JSON for
/// us); a terminal actor state other than SUCCEEDED is its own case because
/// the pipeline logs it differently from a rejected request.
#[derive(Debug, Error)]
pub enum ApifyError {
    #[error("Apify request failed: {0}")]
    Network(String),

    #[error("Apify rejected the call (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LinkedIn scrape run ended with status: {0}")]
    RunFailed(String),
}

impl From<reqwest::Error> for ApifyError {
    fn from(err: reqwest::Error) -> Self {
        ApifyError::Network(err.to_string())
    }
}
