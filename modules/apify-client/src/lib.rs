pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{LinkedInJob, LinkedInJobsInput, ProxyConfig, RunData};

use std::time::Duration;

use serde::de::DeserializeOwned;
use types::ApiResponse;

const BASE_URL: &str = "https://api.apify.com/v2";

/// Per-request timeout. Actor completion itself is covered by the
/// `waitForFinish` long-poll, not this.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("reqwest client"),
            token,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Start an actor run. Returns immediately with run metadata.
    pub async fn start_actor_run<I: serde::Serialize>(
        &self,
        actor_id: &str,
        input: &I,
    ) -> Result<RunData> {
        let url = format!("{}/acts/{}/runs", self.base_url, actor_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: ApiResponse<RunData> = resp.json().await?;
        Ok(api_resp.data)
    }

    /// Poll until a run completes. Uses `waitForFinish=60` for efficient
    /// long-polling.
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunData> {
        loop {
            let url = format!("{}/actor-runs/{}?waitForFinish=60", self.base_url, run_id);
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(ApifyError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let api_resp: ApiResponse<RunData> = resp.json().await?;
            match api_resp.data.status.as_str() {
                "SUCCEEDED" => return Ok(api_resp.data),
                "FAILED" | "ABORTED" | "TIMED-OUT" => {
                    return Err(ApifyError::RunFailed(api_resp.data.status));
                }
                _ => {
                    tracing::debug!(run_id, status = %api_resp.data.status, "Run still in progress");
                    continue;
                }
            }
        }
    }

    /// Fetch dataset items from a completed run.
    pub async fn get_dataset_items<T: DeserializeOwned>(&self, dataset_id: &str) -> Result<Vec<T>> {
        let url = format!(
            "{}/datasets/{}/items?format=json",
            self.base_url, dataset_id
        );
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let items: Vec<T> = resp.json().await?;
        Ok(items)
    }

    /// Scrape LinkedIn job postings end-to-end: start run, poll, fetch
    /// dataset items.
    pub async fn scrape_linkedin_jobs(
        &self,
        actor_id: &str,
        input: &LinkedInJobsInput,
    ) -> Result<Vec<LinkedInJob>> {
        tracing::info!(actor_id, title = %input.title, "Starting LinkedIn jobs scrape");

        let run = self.start_actor_run(actor_id, input).await?;
        tracing::info!(run_id = %run.id, "Apify run started, polling for completion");

        let completed = self.wait_for_run(&run.id).await?;
        tracing::info!(
            run_id = %completed.id,
            dataset_id = %completed.default_dataset_id,
            "Run completed, fetching results"
        );

        let jobs: Vec<LinkedInJob> = self
            .get_dataset_items(&completed.default_dataset_id)
            .await?;
        tracing::info!(count = jobs.len(), "Fetched LinkedIn jobs");

        Ok(jobs)
    }
}
