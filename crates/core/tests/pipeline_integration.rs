//! Integration tests for the batch evaluation pipeline.

mod support;

use std::sync::Arc;
use std::time::Duration;

use livegate_core::{BatchEvaluationPipeline, PreviewStore};
use livegate_domain::constants::{
    DIAGNOSTIC_MISSING_CREDENTIAL, DIAGNOSTIC_PROCESSING_ERROR, NOT_AVAILABLE,
};
use livegate_domain::{
    ApiError, BatchPhase, Credential, JobStatus, PipelineError, PipelineEvent, TrackingFields,
};
use support::{
    files, payload_for, CountingPreviewStore, MockImageLoader, RecordingObserver,
    ScriptedEvaluator,
};

struct Harness {
    pipeline: Arc<BatchEvaluationPipeline>,
    evaluator: Arc<ScriptedEvaluator>,
    previews: Arc<CountingPreviewStore>,
    observer: Arc<RecordingObserver>,
}

fn harness(evaluator: ScriptedEvaluator, loader: MockImageLoader) -> Harness {
    let evaluator = Arc::new(evaluator);
    let previews = CountingPreviewStore::new();
    let observer = RecordingObserver::new();
    let pipeline = BatchEvaluationPipeline::new(evaluator.clone(), Arc::new(loader), previews.clone())
        .with_observer(observer.clone());

    Harness { pipeline: Arc::new(pipeline), evaluator, previews, observer }
}

fn key() -> Credential {
    Credential::new("test-key")
}

#[tokio::test]
async fn only_supported_files_become_items() {
    let h = harness(ScriptedEvaluator::new(), MockImageLoader::new());
    let input = files(&["a.jpg", "notes.txt", "b.PNG", "archive.zip", "c.webp"]);

    let state = h.pipeline.run(input, &key()).await.unwrap();

    assert_eq!(state.status, JobStatus::Done);
    assert_eq!(state.items.len(), 3);
    assert_eq!(h.evaluator.call_count(), 3);
}

#[tokio::test]
async fn no_supported_files_fails_without_network() {
    let h = harness(ScriptedEvaluator::new(), MockImageLoader::new());

    let err = h.pipeline.run(files(&["readme.md", "data.csv"]), &key()).await.unwrap_err();

    assert_eq!(err, PipelineError::NoValidFiles);
    let state = h.pipeline.state();
    assert_eq!(state.status, JobStatus::Failed);
    assert!(state.items.is_empty());
    assert!(state.error_message.is_some());
    assert_eq!(h.evaluator.call_count(), 0);
    assert!(matches!(h.observer.events().last(), Some(PipelineEvent::Failed { .. })));
}

#[tokio::test]
async fn results_are_sorted_by_title() {
    let h = harness(ScriptedEvaluator::new(), MockImageLoader::new());

    let state = h.pipeline.run(files(&["b.png", "a.jpg", "c.webp"]), &key()).await.unwrap();

    let titles: Vec<_> = state.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn accented_titles_sort_with_their_base_letter() {
    let h = harness(ScriptedEvaluator::new(), MockImageLoader::new());
    let input = files(&["Bruno.png", "Ángel.jpg", "ana.png", "Éric.webp", "Fabio.jpg"]);

    let state = h.pipeline.run(input, &key()).await.unwrap();

    let titles: Vec<_> = state.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["ana", "Ángel", "Bruno", "Éric", "Fabio"]);
}

#[tokio::test]
async fn attempts_follow_input_order() {
    let h = harness(ScriptedEvaluator::new(), MockImageLoader::new());

    h.pipeline.run(files(&["b.png", "a.jpg", "c.webp"]), &key()).await.unwrap();

    let payloads: Vec<_> = h.evaluator.requests().into_iter().map(|r| r.image_buffer).collect();
    assert_eq!(payloads, vec![payload_for("b.png"), payload_for("a.jpg"), payload_for("c.webp")]);
}

#[tokio::test]
async fn successful_items_carry_diagnostic_and_raw_response() {
    let h = harness(ScriptedEvaluator::new(), MockImageLoader::new());

    let state = h.pipeline.run(files(&["face.jpg"]), &key()).await.unwrap();

    let item = &state.items[0];
    assert_eq!(item.diagnostic.as_deref(), Some("Live (b64:face.jpg)"));
    assert_eq!(item.resolution, "640x480");
    assert!(item.raw_response.is_some());
    assert!(item.preview_ref.is_some());
    assert!(!item.is_failed());
}

#[tokio::test]
async fn missing_credential_skips_network_for_every_item() {
    let h = harness(ScriptedEvaluator::new(), MockImageLoader::new());

    let state = h.pipeline.run(files(&["a.jpg", "b.png"]), &Credential::new("   ")).await.unwrap();

    assert_eq!(state.status, JobStatus::Done);
    assert_eq!(h.evaluator.call_count(), 0);
    for item in &state.items {
        assert_eq!(item.diagnostic.as_deref(), Some(DIAGNOSTIC_MISSING_CREDENTIAL));
    }
}

#[tokio::test]
async fn api_failure_on_one_item_does_not_stop_the_job() {
    let evaluator = ScriptedEvaluator::new()
        .failing("b.png", ApiError::Http { status: 403, message: "Forbidden key".into() })
        .failing("c.png", ApiError::network("connection refused"));
    let h = harness(evaluator, MockImageLoader::new());

    let state = h.pipeline.run(files(&["a.png", "b.png", "c.png", "d.png"]), &key()).await.unwrap();

    assert_eq!(state.status, JobStatus::Done);
    assert_eq!(state.items.len(), 4);
    assert_eq!(state.failed_count(), 2);
    assert_eq!(h.evaluator.call_count(), 4);
    assert_eq!(state.items[1].diagnostic.as_deref(), Some("Error: Forbidden key"));
    assert_eq!(state.items[1].error_message.as_deref(), Some("Forbidden key"));
    assert_eq!(state.items[2].diagnostic.as_deref(), Some("Error: connection refused"));
    assert!(!state.items[3].is_failed());
}

#[tokio::test]
async fn undecodable_file_becomes_degraded_item() {
    let loader = MockImageLoader::new().failing_decode("broken.png");
    let h = harness(ScriptedEvaluator::new(), loader);

    let state = h.pipeline.run(files(&["broken.png", "ok.png"]), &key()).await.unwrap();

    let broken = &state.items[0];
    assert_eq!(broken.title, "broken");
    assert_eq!(broken.resolution, NOT_AVAILABLE);
    assert_eq!(broken.size_formatted, NOT_AVAILABLE);
    assert_eq!(broken.diagnostic.as_deref(), Some(DIAGNOSTIC_PROCESSING_ERROR));
    assert!(broken.error_message.is_some());
    assert!(broken.preview_ref.is_none());
    assert_eq!(h.evaluator.call_count(), 1);
}

#[tokio::test]
async fn encode_failure_releases_the_preview() {
    let loader = MockImageLoader::new().failing_encode("locked.png");
    let h = harness(ScriptedEvaluator::new(), loader);

    let state = h.pipeline.run(files(&["locked.png"]), &key()).await.unwrap();

    assert_eq!(state.items[0].diagnostic.as_deref(), Some(DIAGNOSTIC_PROCESSING_ERROR));
    assert!(state.items[0].preview_ref.is_none());
    assert_eq!(h.previews.created(), 1);
    assert_eq!(h.previews.live_count(), 0);
}

#[tokio::test]
async fn tracking_fields_are_forwarded() {
    let evaluator = Arc::new(ScriptedEvaluator::new());
    let tracking = TrackingFields { customer_id: Some("cust-1".into()), process_id: Some("proc-9".into()) };
    let pipeline = BatchEvaluationPipeline::new(
        evaluator.clone(),
        Arc::new(MockImageLoader::new()),
        CountingPreviewStore::new(),
    )
    .with_tracking(tracking.clone());

    pipeline.run(files(&["a.png"]), &key()).await.unwrap();

    assert_eq!(evaluator.requests()[0].tracking, tracking);
}

#[tokio::test]
async fn emits_phase_events_in_order() {
    let h = harness(ScriptedEvaluator::new(), MockImageLoader::new());

    h.pipeline.run(files(&["a.png"]), &key()).await.unwrap();

    let events = h.observer.events();
    assert!(matches!(events.first(), Some(PipelineEvent::Started { total: 1, .. })));
    let phases: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::ItemPhase { phase, .. } => Some(*phase),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![BatchPhase::Validating, BatchPhase::Converting, BatchPhase::Calling, BatchPhase::Done]
    );
    assert!(events.iter().any(|e| matches!(e, PipelineEvent::ItemFinished { failed: false, .. })));
    assert!(matches!(events.last(), Some(PipelineEvent::Completed { total: 1, failed: 0, .. })));
}

#[tokio::test]
async fn clear_releases_previews_and_resets_to_idle() {
    let h = harness(ScriptedEvaluator::new(), MockImageLoader::new());
    h.pipeline.run(files(&["a.png", "b.png", "c.png"]), &key()).await.unwrap();
    assert_eq!(h.previews.live_count(), 3);

    let released = h.pipeline.clear();

    assert_eq!(released, 3);
    assert_eq!(h.previews.live_count(), 0);
    let state = h.pipeline.state();
    assert_eq!(state.status, JobStatus::Idle);
    assert!(state.items.is_empty());
}

#[tokio::test]
async fn new_run_releases_previous_results() {
    let h = harness(ScriptedEvaluator::new(), MockImageLoader::new());
    h.pipeline.run(files(&["a.png", "b.png"]), &key()).await.unwrap();

    h.pipeline.run(files(&["c.png"]), &key()).await.unwrap();

    assert_eq!(h.previews.created(), 3);
    assert_eq!(h.previews.live_count(), 1);
    assert_eq!(h.previews.double_releases(), 0);
}

#[tokio::test]
async fn concurrent_runs_keep_attempt_order_and_sorted_output() {
    let evaluator = Arc::new(ScriptedEvaluator::new());
    let pipeline = BatchEvaluationPipeline::new(
        evaluator.clone(),
        Arc::new(MockImageLoader::new()),
        CountingPreviewStore::new(),
    )
    .with_concurrency(3);

    let state = pipeline.run(files(&["c.png", "a.png", "b.png"]), &key()).await.unwrap();

    let titles: Vec<_> = state.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "b", "c"]);
    assert_eq!(evaluator.call_count(), 3);
}

#[tokio::test]
async fn new_run_preempts_in_flight_run() {
    let evaluator = ScriptedEvaluator::new().holding("old-1.png");
    let h = harness(evaluator, MockImageLoader::new());

    let pipeline = h.pipeline.clone();
    let first = tokio::spawn(async move {
        pipeline.run(files(&["old-1.png", "old-2.png", "old-3.png"]), &key()).await
    });

    // Wait until the first run is blocked inside its first evaluation.
    for _ in 0..200 {
        if h.evaluator.call_count() > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(h.evaluator.call_count(), 1);
    assert_eq!(h.pipeline.status(), JobStatus::Running);

    let second = h.pipeline.run(files(&["new.png"]), &key()).await.unwrap();
    h.evaluator.open_gate();
    let superseded = first.await.unwrap();

    assert_eq!(superseded.unwrap_err(), PipelineError::Superseded);
    assert_eq!(second.status, JobStatus::Done);
    assert_eq!(h.pipeline.state().job_id, second.job_id);
    assert_eq!(h.pipeline.state().items.len(), 1);
    // old-2 and old-3 were never attempted
    assert_eq!(h.evaluator.call_count(), 2);
    assert_eq!(h.previews.live_count(), 1);
    assert_eq!(h.previews.double_releases(), 0);

    h.pipeline.clear();
    assert_eq!(h.previews.live_count(), 0);
}
