//! Source fetcher seams and their production implementations.
//!
//! Both fetchers are black boxes to the pipeline: they return raw records
//! or fail. The listings feed is mandatory (its failure fails the run); the
//! actor feed is optional (its failure is logged and skipped).

use std::time::Duration;

use async_trait::async_trait;

use apify_client::{ApifyClient, LinkedInJob, LinkedInJobsInput};
use jobsignal_common::{JobSignalError, SimplifyListing};

// --- Fetcher traits ---

/// Mandatory HTTP+JSON listings feed.
#[async_trait]
pub trait ListingsFetcher: Send + Sync {
    async fn fetch(&self) -> Result<Vec<SimplifyListing>, JobSignalError>;
}

/// Optional actor-run feed.
#[async_trait]
pub trait ActorFetcher: Send + Sync {
    async fn fetch(&self) -> Result<Vec<LinkedInJob>, JobSignalError>;
}

// --- Simplify listings over HTTP ---

const LISTINGS_TIMEOUT: Duration = Duration::from_secs(20);

pub struct HttpListingsFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpListingsFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(LISTINGS_TIMEOUT)
                .build()
                .expect("reqwest client"),
            url: url.into(),
        }
    }
}

#[async_trait]
impl ListingsFetcher for HttpListingsFetcher {
    async fn fetch(&self) -> Result<Vec<SimplifyListing>, JobSignalError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| JobSignalError::source_fetch("simplify", e))?
            .error_for_status()
            .map_err(|e| JobSignalError::source_fetch("simplify", e))?;

        let listings: Vec<SimplifyListing> = response
            .json()
            .await
            .map_err(|e| JobSignalError::source_fetch("simplify", e))?;

        tracing::info!(count = listings.len(), "Fetched Simplify listings");
        Ok(listings)
    }
}

// --- LinkedIn jobs via Apify ---

pub struct ApifyJobsFetcher {
    client: ApifyClient,
    actor_id: String,
    input: LinkedInJobsInput,
}

impl ApifyJobsFetcher {
    pub fn new(token: String, actor_id: String) -> Self {
        Self {
            client: ApifyClient::new(token),
            actor_id,
            input: LinkedInJobsInput::default(),
        }
    }

    pub fn with_input(mut self, input: LinkedInJobsInput) -> Self {
        self.input = input;
        self
    }
}

#[async_trait]
impl ActorFetcher for ApifyJobsFetcher {
    async fn fetch(&self) -> Result<Vec<LinkedInJob>, JobSignalError> {
        self.client
            .scrape_linkedin_jobs(&self.actor_id, &self.input)
            .await
            .map_err(|e| JobSignalError::source_fetch("linkedin", e))
    }
}
