use std::time::Duration;

use tracing::debug;

use super::types::*;
use crate::error::ScoreError;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

pub(crate) struct GeminiClient {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("reqwest client"),
            base_url: GEMINI_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ScoreError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        debug!(model, "Gemini generateContent request");

        let response = self.http.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            // Quota exhaustion surfaces as 429 or a RESOURCE_EXHAUSTED body.
            if status.as_u16() == 429 || error_text.contains("RESOURCE_EXHAUSTED") {
                return Err(ScoreError::RateLimited(format!(
                    "Gemini API ({status}): {error_text}"
                )));
            }
            return Err(ScoreError::Other(format!(
                "Gemini API error ({status}): {error_text}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ScoreError::Other(e.to_string()))
    }
}
