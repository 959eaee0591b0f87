//! End-to-end pipeline tests against fake collaborators, one outcome per
//! test: build the doubles, run one pipeline, assert the observable state.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use jobsignal_common::RunStatus;

use crate::pipeline::Pipeline;
use crate::pool::TaskPool;
use crate::run_tracker::fetch_run;
use crate::runner::RunPool;
use crate::score::{RetryPolicy, ScoringStage};
use crate::testing::*;

fn scoring(scorer: ScriptedScorer) -> ScoringStage {
    ScoringStage::new(Arc::new(scorer), TaskPool::new(4), RetryPolicy::default())
}

fn pipeline_with(
    store: Arc<MemoryStore>,
    listings: Arc<dyn crate::sources::ListingsFetcher>,
    actor: Option<Arc<dyn crate::sources::ActorFetcher>>,
    mailer: Arc<RecordingMailer>,
) -> Pipeline {
    Pipeline::new(
        store,
        listings,
        actor,
        scoring(ScriptedScorer::fixed(50)),
        mailer,
        vec!["me@example.com".to_string()],
    )
}

#[tokio::test]
async fn successful_run_walks_every_checkpoint_in_order() {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let now = Utc::now().timestamp();

    let pipeline = pipeline_with(
        store.clone(),
        Arc::new(StaticListings::new(vec![recent_listing(
            "SWE Intern",
            "Acme",
            "https://acme.com/1",
            now,
        )])),
        Some(Arc::new(StaticActorFeed::new(vec![linkedin_item(
            "ML Intern",
            "Beta",
            "https://linkedin.com/jobs/9",
        )]))),
        mailer.clone(),
    );

    pipeline.run("run-ok", 60).await;

    assert_eq!(store.progress_writes("run-ok"), vec![0, 25, 75, 85, 100]);

    let run = fetch_run(store.as_ref(), "run-ok").await.unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Finished);
    assert_eq!(run.progress, 100);

    let result = run.result.unwrap();
    assert_eq!(result["recent_jobs_count"], 1);
    assert_eq!(result["new_simplify_jobs"], 1);
    assert_eq!(result["total_apify_jobs"], 1);
    assert_eq!(result["new_apify_jobs"], 1);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].subject.contains("1 new Simplify"));
    assert!(sent[0].subject.contains("1 new LinkedIn"));
    assert!(sent[0].html.contains("SWE Intern"));
    assert!(sent[0].html.contains("ML Intern"));
}

#[tokio::test]
async fn mandatory_source_failure_jumps_from_zero_to_terminal() {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());

    let pipeline = pipeline_with(store.clone(), Arc::new(FailingListings), None, mailer.clone());
    pipeline.run("run-bad", 60).await;

    // 25/75/85 are skipped entirely.
    assert_eq!(store.progress_writes("run-bad"), vec![0, 100]);

    let run = fetch_run(store.as_ref(), "run-bad").await.unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Failed);
    assert_eq!(run.progress, 100);
    let error = run.result.unwrap();
    assert!(error["error"]
        .as_str()
        .unwrap()
        .contains("connection refused"));

    assert_eq!(mailer.sent_count(), 0);
}

#[tokio::test]
async fn optional_source_failure_still_finishes_with_zero_counts() {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let now = Utc::now().timestamp();

    let pipeline = pipeline_with(
        store.clone(),
        Arc::new(StaticListings::new(vec![recent_listing(
            "SWE Intern",
            "Acme",
            "https://acme.com/1",
            now,
        )])),
        Some(Arc::new(FailingActorFeed)),
        mailer.clone(),
    );
    pipeline.run("run-partial", 60).await;

    let run = fetch_run(store.as_ref(), "run-partial")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(run.status, RunStatus::Finished);

    let result = run.result.unwrap();
    assert_eq!(result["new_simplify_jobs"], 1);
    assert_eq!(result["total_apify_jobs"], 0);
    assert_eq!(result["new_apify_jobs"], 0);
}

#[tokio::test]
async fn repeat_submission_reports_zero_new_jobs() {
    let store = Arc::new(MemoryStore::new());
    let now = Utc::now().timestamp();
    let listings = Arc::new(StaticListings::new(vec![recent_listing(
        "SWE Intern",
        "Acme",
        "https://acme.com/1",
        now,
    )]));

    let first_mailer = Arc::new(RecordingMailer::new());
    let pipeline = pipeline_with(store.clone(), listings.clone(), None, first_mailer);
    pipeline.run("run-first", 60).await;

    let first = fetch_run(store.as_ref(), "run-first").await.unwrap().unwrap();
    assert_eq!(first.result.unwrap()["new_simplify_jobs"], 1);

    // Same input again: the dedup store remembers the fingerprint.
    let second_mailer = Arc::new(RecordingMailer::new());
    let pipeline = pipeline_with(store.clone(), listings, None, second_mailer.clone());
    pipeline.run("run-second", 60).await;

    let second = fetch_run(store.as_ref(), "run-second")
        .await
        .unwrap()
        .unwrap();
    let result = second.result.unwrap();
    assert_eq!(result["recent_jobs_count"], 1);
    assert_eq!(result["new_simplify_jobs"], 0);
    // Nothing new, flag off: no digest.
    assert_eq!(second_mailer.sent_count(), 0);
}

#[tokio::test]
async fn send_failure_does_not_change_the_terminal_status() {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::failing());
    let now = Utc::now().timestamp();

    let pipeline = pipeline_with(
        store.clone(),
        Arc::new(StaticListings::new(vec![recent_listing(
            "SWE Intern",
            "Acme",
            "https://acme.com/1",
            now,
        )])),
        None,
        mailer,
    );
    pipeline.run("run-mailfail", 60).await;

    let run = fetch_run(store.as_ref(), "run-mailfail")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(run.status, RunStatus::Finished);
    assert_eq!(run.progress, 100);
}

#[tokio::test]
async fn empty_digest_is_sent_only_when_the_flag_says_so() {
    let now = Utc::now().timestamp();
    let stale = now - 7 * 24 * 60 * 60;

    for (flag, expected_sends) in [(false, 0), (true, 1)] {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(RecordingMailer::new());
        let pipeline = pipeline_with(
            store,
            Arc::new(StaticListings::new(vec![recent_listing(
                "Old Intern",
                "Acme",
                "https://acme.com/old",
                stale,
            )])),
            None,
            mailer.clone(),
        )
        .with_send_empty_digest(flag);

        pipeline.run("run-empty", 60).await;
        assert_eq!(mailer.sent_count(), expected_sends, "flag={flag}");
    }
}

#[tokio::test]
async fn scored_jobs_carry_their_score_into_the_digest() {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let now = Utc::now().timestamp();

    let pipeline = Pipeline::new(
        store,
        Arc::new(StaticListings::new(vec![recent_listing(
            "SWE Intern",
            "Acme",
            "https://acme.com/1",
            now,
        )])),
        None,
        scoring(ScriptedScorer::fixed(91)),
        mailer.clone(),
        vec!["me@example.com".to_string()],
    );
    pipeline.run("run-scored", 60).await;

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].html.contains("<td>91</td>"));
}

#[tokio::test]
async fn submitted_run_is_queued_then_reaches_terminal_state() {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let now = Utc::now().timestamp();

    let pipeline = Arc::new(pipeline_with(
        store.clone(),
        Arc::new(StaticListings::new(vec![recent_listing(
            "SWE Intern",
            "Acme",
            "https://acme.com/1",
            now,
        )])),
        None,
        mailer,
    ));
    let runs = RunPool::new(pipeline, store.clone(), 3, 60);

    let run_id = runs.submit(None).await.unwrap();

    // Queued state is visible immediately after submission.
    let snapshot = runs.status(&run_id).await.unwrap().unwrap();
    assert!(matches!(
        snapshot.status,
        RunStatus::Queued | RunStatus::Started | RunStatus::Finished
    ));

    // Poll to the terminal state.
    let mut status = snapshot.status;
    for _ in 0..100 {
        if status.is_terminal() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        status = runs.status(&run_id).await.unwrap().unwrap().status;
    }
    assert_eq!(status, RunStatus::Finished);
}

#[tokio::test]
async fn unknown_run_id_reads_as_not_found() {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let pipeline = Arc::new(pipeline_with(
        store.clone(),
        Arc::new(StaticListings::new(Vec::new())),
        None,
        mailer,
    ));
    let runs = RunPool::new(pipeline, store, 3, 60);

    assert!(runs.status("never-submitted").await.unwrap().is_none());
}
