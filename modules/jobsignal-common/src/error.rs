use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobSignalError {
    /// Fetching or decoding one of the job sources failed. Fatal for the
    /// mandatory listings feed, recoverable for the optional actor feed.
    #[error("Source fetch error ({source_name}): {message}")]
    SourceFetch {
        source_name: &'static str,
        message: String,
    },

    /// The state store misbehaved. Never handled locally; the run's
    /// top-level handler turns this into a failed run.
    #[error("State store error: {0}")]
    StateStore(String),

    /// Digest dispatch failed. Logged only; the run still finishes.
    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl JobSignalError {
    pub fn source_fetch(source_name: &'static str, err: impl std::fmt::Display) -> Self {
        JobSignalError::SourceFetch {
            source_name,
            message: err.to_string(),
        }
    }
}
