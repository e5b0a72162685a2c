// ABOUTME: Tests for the continuous capture-and-analyze loop
// ABOUTME: Covers the in-flight gate, stale suppression, tick cadence, and idempotent lifecycle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FormCoach contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time;

use formcoach::capture::{FrameSequence, RepeatingFrame};
use formcoach::errors::CoachError;
use formcoach::models::{AnalysisRequest, PostureAnalysis};
use formcoach::{LiveTrainer, PostureAnalyzer, TrainerEvent, TrainerMode};

fn jpeg() -> Bytes {
    Bytes::from_static(b"\xff\xd8\xff\xe0 not a real jpeg")
}

fn sample_analysis() -> PostureAnalysis {
    PostureAnalysis {
        form_score: 0.42,
        is_correct_form: false,
        confidence: 0.9,
        corrections: vec!["Bend knees more".into()],
        feedback: "Keep going".into(),
        analysis_time_ms: 180.0,
        exercise_type: "squat".into(),
        key_points: None,
    }
}

/// Resolves instantly with the sample analysis, counting submissions.
#[derive(Default)]
struct CountingAnalyzer {
    calls: AtomicUsize,
}

impl CountingAnalyzer {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PostureAnalyzer for CountingAnalyzer {
    async fn analyze(&self, _request: AnalysisRequest) -> Result<PostureAnalysis, CoachError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(sample_analysis())
    }
}

/// Counts submissions and holds each one until released.
#[derive(Default)]
struct BlockingAnalyzer {
    calls: AtomicUsize,
    release: Notify,
}

impl BlockingAnalyzer {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PostureAnalyzer for BlockingAnalyzer {
    async fn analyze(&self, _request: AnalysisRequest) -> Result<PostureAnalysis, CoachError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        Ok(sample_analysis())
    }
}

type Deliveries = Arc<Mutex<Vec<TrainerEvent>>>;

fn subscribe_collecting(trainer: &LiveTrainer) -> Deliveries {
    let deliveries: Deliveries = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&deliveries);
    trainer.subscribe(move |event| sink.lock().unwrap().push(event));
    deliveries
}

/// Let spawned cycle tasks make progress on the current-thread runtime.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn overlapping_run_once_collapses_to_one_submission() {
    let analyzer = Arc::new(BlockingAnalyzer::default());
    let trainer = Arc::new(LiveTrainer::new(
        Box::new(RepeatingFrame::new(jpeg())),
        Arc::clone(&analyzer) as Arc<dyn PostureAnalyzer>,
    ));
    let deliveries = subscribe_collecting(&trainer);

    let first = {
        let trainer = Arc::clone(&trainer);
        tokio::spawn(async move { trainer.run_once().await })
    };
    settle().await;
    assert_eq!(analyzer.calls(), 1);
    assert!(trainer.is_in_flight());

    // Further calls while the first is unresolved are no-ops, not queued.
    trainer.run_once().await;
    trainer.run_once().await;
    assert_eq!(analyzer.calls(), 1);

    analyzer.release.notify_one();
    first.await.unwrap();
    assert_eq!(deliveries.lock().unwrap().len(), 1);
    assert!(!trainer.is_in_flight());
}

#[tokio::test(start_paused = true)]
async fn stop_suppresses_delivery_of_in_flight_cycle() {
    let analyzer = Arc::new(BlockingAnalyzer::default());
    let trainer = LiveTrainer::new(
        Box::new(RepeatingFrame::new(jpeg())),
        Arc::clone(&analyzer) as Arc<dyn PostureAnalyzer>,
    );
    let deliveries = subscribe_collecting(&trainer);

    trainer.start(Duration::from_millis(100));
    time::advance(Duration::from_millis(100)).await;
    settle().await;
    assert_eq!(analyzer.calls(), 1);

    trainer.stop();
    assert_eq!(trainer.mode(), TrainerMode::Idle);

    // The in-flight analysis completes after stop; its result must be
    // discarded.
    analyzer.release.notify_one();
    settle().await;
    assert!(deliveries.lock().unwrap().is_empty());
    assert!(!trainer.is_in_flight());
}

#[tokio::test]
async fn cycle_started_after_stop_still_delivers() {
    let analyzer = Arc::new(CountingAnalyzer::default());
    let trainer = LiveTrainer::new(
        Box::new(RepeatingFrame::new(jpeg())),
        Arc::clone(&analyzer) as Arc<dyn PostureAnalyzer>,
    );
    let deliveries = subscribe_collecting(&trainer);

    trainer.start(Duration::from_millis(50));
    trainer.stop();

    // Single-shot mode keeps working after a stop.
    trainer.run_once().await;
    assert_eq!(deliveries.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn first_tick_fires_after_one_full_interval() {
    let analyzer = Arc::new(CountingAnalyzer::default());
    let trainer = LiveTrainer::new(
        Box::new(RepeatingFrame::new(jpeg())),
        Arc::clone(&analyzer) as Arc<dyn PostureAnalyzer>,
    );
    let _deliveries = subscribe_collecting(&trainer);

    trainer.start(Duration::from_millis(1000));
    settle().await;
    assert_eq!(analyzer.calls(), 0, "no cycle at t=0");

    time::advance(Duration::from_millis(999)).await;
    settle().await;
    assert_eq!(analyzer.calls(), 0, "no cycle before the first interval");

    time::advance(Duration::from_millis(1)).await;
    settle().await;
    assert_eq!(analyzer.calls(), 1, "first cycle at t=1000ms");

    trainer.stop();
}

#[tokio::test(start_paused = true)]
async fn tick_baseline_is_anchored_to_start_call() {
    let analyzer = Arc::new(CountingAnalyzer::default());
    let trainer = LiveTrainer::new(
        Box::new(RepeatingFrame::new(jpeg())),
        Arc::clone(&analyzer) as Arc<dyn PostureAnalyzer>,
    );
    let _deliveries = subscribe_collecting(&trainer);

    // Advance immediately after start, before the ticker task has ever been
    // polled. The first deadline must still be start-time plus one interval.
    trainer.start(Duration::from_millis(1000));
    time::advance(Duration::from_millis(1000)).await;
    settle().await;
    assert_eq!(analyzer.calls(), 1);
    trainer.stop();
}

#[tokio::test(start_paused = true)]
async fn three_cycles_over_a_3500ms_window() {
    let analyzer = Arc::new(CountingAnalyzer::default());
    let trainer = LiveTrainer::new(
        Box::new(RepeatingFrame::new(jpeg())),
        Arc::clone(&analyzer) as Arc<dyn PostureAnalyzer>,
    );
    let deliveries = subscribe_collecting(&trainer);

    trainer.start(Duration::from_millis(1000));
    for _ in 0..3 {
        time::advance(Duration::from_millis(1000)).await;
        settle().await;
    }
    time::advance(Duration::from_millis(500)).await;
    settle().await;

    assert_eq!(analyzer.calls(), 3);
    assert_eq!(deliveries.lock().unwrap().len(), 3);
    trainer.stop();
}

#[tokio::test(start_paused = true)]
async fn start_is_idempotent() {
    let analyzer = Arc::new(CountingAnalyzer::default());
    let trainer = LiveTrainer::new(
        Box::new(RepeatingFrame::new(jpeg())),
        Arc::clone(&analyzer) as Arc<dyn PostureAnalyzer>,
    );
    let _deliveries = subscribe_collecting(&trainer);

    trainer.start(Duration::from_millis(1000));
    trainer.start(Duration::from_millis(1000));
    assert_eq!(trainer.mode(), TrainerMode::Running);

    time::advance(Duration::from_millis(1000)).await;
    settle().await;
    // A second start must not schedule a second timer.
    assert_eq!(analyzer.calls(), 1);
    trainer.stop();
}

#[tokio::test]
async fn stop_while_idle_is_a_no_op() {
    let analyzer = Arc::new(CountingAnalyzer::default());
    let trainer = LiveTrainer::new(
        Box::new(RepeatingFrame::new(jpeg())),
        Arc::clone(&analyzer) as Arc<dyn PostureAnalyzer>,
    );

    assert_eq!(trainer.mode(), TrainerMode::Idle);
    trainer.stop();
    assert_eq!(trainer.mode(), TrainerMode::Idle);
}

#[tokio::test]
async fn capture_failure_short_circuits_without_a_submission() {
    let analyzer = Arc::new(CountingAnalyzer::default());
    let trainer = LiveTrainer::new(
        Box::new(FrameSequence::empty()),
        Arc::clone(&analyzer) as Arc<dyn PostureAnalyzer>,
    );
    let deliveries = subscribe_collecting(&trainer);

    trainer.run_once().await;

    assert_eq!(analyzer.calls(), 0, "analyzer must not be contacted");
    let events = deliveries.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        TrainerEvent::Failure(CoachError::CaptureUnavailable)
    ));
}

#[tokio::test]
async fn failed_cycle_clears_in_flight_for_the_next_one() {
    let analyzer = Arc::new(CountingAnalyzer::default());
    let trainer = LiveTrainer::new(
        Box::new(FrameSequence::empty()),
        Arc::clone(&analyzer) as Arc<dyn PostureAnalyzer>,
    );
    let deliveries = subscribe_collecting(&trainer);

    trainer.run_once().await;
    assert!(!trainer.is_in_flight());
    trainer.run_once().await;

    // Both cycles delivered: two capture failures, no permanent blockage.
    assert_eq!(deliveries.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn delivered_analysis_carries_service_fields() {
    let analyzer = Arc::new(CountingAnalyzer::default());
    let trainer = LiveTrainer::new(
        Box::new(RepeatingFrame::new(jpeg())),
        Arc::clone(&analyzer) as Arc<dyn PostureAnalyzer>,
    );
    let deliveries = subscribe_collecting(&trainer);

    trainer.run_once().await;

    let events = deliveries.lock().unwrap();
    match &events[0] {
        TrainerEvent::Analysis(analysis) => {
            assert!((analysis.form_score - 0.42).abs() < f64::EPSILON);
            assert_eq!(analysis.corrections.len(), 1);
            assert!(!analysis.is_correct_form);
        }
        TrainerEvent::Failure(error) => panic!("unexpected failure: {error}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stop_is_serialized_with_an_active_delivery() {
    let analyzer = Arc::new(CountingAnalyzer::default());
    let trainer = Arc::new(LiveTrainer::new(
        Box::new(RepeatingFrame::new(jpeg())),
        Arc::clone(&analyzer) as Arc<dyn PostureAnalyzer>,
    ));

    // The subscriber blocks mid-delivery; stop() from another thread must
    // wait for the delivery to finish rather than racing past it.
    let entered = Arc::new(std::sync::Barrier::new(2));
    let release = Arc::new(std::sync::Barrier::new(2));
    {
        let entered = Arc::clone(&entered);
        let release = Arc::clone(&release);
        trainer.subscribe(move |_| {
            entered.wait();
            release.wait();
        });
    }

    let cycle = {
        let trainer = Arc::clone(&trainer);
        tokio::spawn(async move { trainer.run_once().await })
    };
    let entered_wait = Arc::clone(&entered);
    tokio::task::spawn_blocking(move || entered_wait.wait())
        .await
        .unwrap();

    let stopper = {
        let trainer = Arc::clone(&trainer);
        tokio::task::spawn_blocking(move || {
            trainer.start(Duration::from_secs(60));
            trainer.stop();
        })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!stopper.is_finished(), "stop must wait for the delivery");

    let release_wait = Arc::clone(&release);
    tokio::task::spawn_blocking(move || release_wait.wait())
        .await
        .unwrap();
    stopper.await.unwrap();
    cycle.await.unwrap();
    assert!(!trainer.is_in_flight());
}

#[tokio::test]
async fn subscribe_replaces_the_previous_subscriber() {
    let analyzer = Arc::new(CountingAnalyzer::default());
    let trainer = LiveTrainer::new(
        Box::new(RepeatingFrame::new(jpeg())),
        Arc::clone(&analyzer) as Arc<dyn PostureAnalyzer>,
    );

    let first = subscribe_collecting(&trainer);
    let second = subscribe_collecting(&trainer);

    trainer.run_once().await;
    assert!(first.lock().unwrap().is_empty());
    assert_eq!(second.lock().unwrap().len(), 1);
}
