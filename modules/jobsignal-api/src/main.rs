use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::{load_resume_best_effort, GeminiScorer, ResumeScorer};
use jobsignal_common::Config;
use jobsignal_worker::mailer::ResendMailer;
use jobsignal_worker::pool::TaskPool;
use jobsignal_worker::score::{RetryPolicy, ScoringStage};
use jobsignal_worker::sources::{ActorFetcher, ApifyJobsFetcher, HttpListingsFetcher};
use jobsignal_worker::{Pipeline, RedisStore, RunPool};

mod rest;

pub struct AppState {
    pub runs: RunPool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("jobsignal=info".parse()?))
        .init();

    let config = Config::from_env();

    let store = Arc::new(RedisStore::connect(&config.redis_url).await?);

    let listings = Arc::new(HttpListingsFetcher::new(config.listings_url.clone()));

    let actor: Option<Arc<dyn ActorFetcher>> =
        match (&config.apify_token, &config.apify_actor_id) {
            (Some(token), Some(actor_id)) => Some(Arc::new(ApifyJobsFetcher::new(
                token.clone(),
                actor_id.clone(),
            ))),
            _ => {
                info!("Apify credentials not set, optional source disabled");
                None
            }
        };

    let scorer: Arc<dyn ResumeScorer> = match &config.gemini_api_key {
        Some(key) => {
            let resume = load_resume_best_effort(
                config.resume_path.as_deref(),
                config.resume_url.as_deref(),
            )
            .await;
            let mut scorer = GeminiScorer::new(key.clone());
            if let Some(resume) = resume {
                scorer = scorer.with_resume(resume);
            }
            Arc::new(scorer)
        }
        None => {
            info!("GEMINI_API_KEY not set, scoring disabled");
            Arc::new(GeminiScorer::new(String::new()))
        }
    };

    let scoring = ScoringStage::new(
        scorer,
        TaskPool::new(config.scoring_workers),
        RetryPolicy::default(),
    );

    let mailer = Arc::new(ResendMailer::new(config.resend_api_key.clone()));
    let recipients: Vec<String> = config
        .emails
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let pipeline = Arc::new(
        Pipeline::new(store.clone(), listings, actor, scoring, mailer, recipients)
            .with_send_empty_digest(config.send_empty_digest),
    );

    let runs = RunPool::new(
        pipeline,
        store,
        config.max_concurrent_runs,
        config.default_window_minutes,
    );

    let state = Arc::new(AppState { runs });

    let app = Router::new()
        .route("/health", get(rest::health))
        .route("/jobs", post(rest::submit_run))
        .route("/jobs/{id}", get(rest::run_status))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        );

    let addr = format!("{}:{}", config.host, config.port);
    info!(addr = %addr, "jobsignal API listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
