use serde::{Deserialize, Serialize};

/// Input for the LinkedIn jobs scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct LinkedInJobsInput {
    pub title: String,
    pub location: String,
    /// Relative published-at window, e.g. "r86400" for the past 24 hours.
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    pub rows: u32,
    pub proxy: ProxyConfig,
}

impl Default for LinkedInJobsInput {
    fn default() -> Self {
        Self {
            title: "summer 2026 intern".to_string(),
            location: "United States".to_string(),
            published_at: "r86400".to_string(),
            rows: 150,
            proxy: ProxyConfig::residential(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProxyConfig {
    #[serde(rename = "useApifyProxy")]
    pub use_apify_proxy: bool,
    #[serde(rename = "apifyProxyGroups")]
    pub apify_proxy_groups: Vec<String>,
}

impl ProxyConfig {
    pub fn residential() -> Self {
        Self {
            use_apify_proxy: true,
            apify_proxy_groups: vec!["RESIDENTIAL".to_string()],
        }
    }
}

/// A single job item from the LinkedIn scraper dataset. The actor's schema
/// drifts; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkedInJob {
    pub title: Option<String>,
    #[serde(rename = "companyName")]
    pub company_name: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "postedTime")]
    pub posted_time: Option<String>,
    #[serde(rename = "jobUrl")]
    pub job_url: Option<String>,
    #[serde(rename = "applicationsCount")]
    pub applications_count: Option<String>,
    #[serde(rename = "contractType")]
    pub contract_type: Option<String>,
}

/// Metadata for one actor run.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
}

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}
