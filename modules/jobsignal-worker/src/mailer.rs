//! Email dispatch seam plus the Resend implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use jobsignal_common::JobSignalError;

pub const DEFAULT_FROM: &str = "alerts@resend.dev";

#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), JobSignalError>;
}

// --- Resend ---

const RESEND_API_URL: &str = "https://api.resend.com/emails";

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ResendMailer {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ResendMailer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(SEND_TIMEOUT)
                .build()
                .expect("reqwest client"),
            api_key: api_key.into(),
            base_url: RESEND_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), JobSignalError> {
        let response = self
            .http
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await
            .map_err(|e| JobSignalError::Notification(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JobSignalError::Notification(format!(
                "Resend API error ({status}): {body}"
            )));
        }

        tracing::info!(to = ?message.to, subject = %message.subject, "Digest email sent");
        Ok(())
    }
}
