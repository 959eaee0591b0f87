use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Mandatory listings feed
    pub listings_url: String,

    // State store
    pub redis_url: String,

    // Email
    pub resend_api_key: String,
    /// Comma-separated recipient list.
    pub emails: String,
    /// Send a digest even when both sources produced zero new jobs.
    pub send_empty_digest: bool,

    // Optional actor-run feed; both must be set for the feed to run.
    pub apify_token: Option<String>,
    pub apify_actor_id: Option<String>,

    // Optional resume scoring
    pub gemini_api_key: Option<String>,
    pub resume_path: Option<String>,
    pub resume_url: Option<String>,

    // Web server
    pub host: String,
    pub port: u16,

    // Pipeline tuning
    pub default_window_minutes: i64,
    pub max_concurrent_runs: usize,
    pub scoring_workers: usize,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            listings_url: required_env("LISTINGS_URL"),
            redis_url: required_env("REDIS_URL"),
            resend_api_key: required_env("RESEND_API_KEY"),
            emails: required_env("EMAILS"),
            send_empty_digest: flag_env("SEND_EMPTY_DIGEST", false),
            apify_token: env::var("APIFY_TOKEN").ok(),
            apify_actor_id: env::var("APIFY_ACTOR_ID").ok(),
            gemini_api_key: env::var("GEMINI_API_KEY").ok(),
            resume_path: env::var("RESUME_PATH").ok(),
            resume_url: env::var("RESUME_URL").ok(),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .expect("PORT must be a number"),
            default_window_minutes: numeric_env("DEFAULT_WINDOW_MINUTES", 60),
            max_concurrent_runs: numeric_env("MAX_CONCURRENT_RUNS", 3) as usize,
            scoring_workers: numeric_env("SCORING_WORKERS", 4) as usize,
        }
    }

    /// True when both Apify credentials are present.
    pub fn apify_configured(&self) -> bool {
        self.apify_token.is_some() && self.apify_actor_id.is_some()
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn numeric_env(key: &str, default: i64) -> i64 {
    env::var(key)
        .ok()
        .map(|v| v.parse().unwrap_or_else(|_| panic!("{key} must be a number")))
        .unwrap_or(default)
}

fn flag_env(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}
