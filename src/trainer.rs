// ABOUTME: Continuous capture-and-analyze control loop for the live trainer screen
// ABOUTME: Guarantees at most one in-flight analysis and suppresses stale deliveries after stop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FormCoach contributors

//! The live trainer loop.
//!
//! [`LiveTrainer`] owns the decision of when to trigger a capture-and-analyze
//! cycle. Two correctness properties hold at all times:
//!
//! 1. **At most one in-flight analysis.** A cycle that begins while another
//!    is still awaiting the service is a no-op, not a queue entry.
//! 2. **Stale-result suppression.** A cycle that was in flight when
//!    [`LiveTrainer::stop`] was called completes silently; its outcome is
//!    never delivered to the subscriber.
//!
//! The loop owns its timer handle and all of its state; the UI layer only
//! ever calls `start`/`stop`/`run_once` and observes deliveries through the
//! subscriber slot.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info};

use crate::api::PostureAnalyzer;
use crate::capture::FrameSource;
use crate::errors::CoachError;
use crate::models::{AnalysisRequest, ExerciseType, PostureAnalysis};

/// Delivery handed to the subscriber after each completed cycle.
#[derive(Debug)]
pub enum TrainerEvent {
    /// The service returned a posture analysis.
    Analysis(PostureAnalysis),
    /// The cycle failed; the error carries the user-visible message.
    Failure(CoachError),
}

/// Lifecycle state of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerMode {
    /// No timer scheduled; cycles run only via [`LiveTrainer::run_once`].
    Idle,
    /// A recurring timer is driving cycles.
    Running,
}

type Subscriber = Box<dyn Fn(TrainerEvent) + Send + Sync>;

/// State shared between the trainer handle, the ticker task, and cycles.
struct TrainerCore {
    analyzer: Arc<dyn PostureAnalyzer>,
    source: Mutex<Box<dyn FrameSource>>,
    exercise: Mutex<ExerciseType>,
    /// True from the instant a cycle begins until after its delivery.
    in_flight: AtomicBool,
    /// Bumped by `stop()`; a cycle only delivers if the epoch it started
    /// under is still current when it completes.
    epoch: AtomicU64,
    subscriber: Mutex<Option<Subscriber>>,
}

impl TrainerCore {
    /// Perform one capture-and-analyze cycle and deliver its outcome.
    ///
    /// No-op if another cycle is in flight.
    async fn cycle(self: Arc<Self>) {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!("analysis already in flight, skipping cycle");
            return;
        }

        let started_epoch = self.epoch.load(Ordering::SeqCst);
        let exercise = *lock(&self.exercise);
        let frame = lock(&self.source).capture();

        let outcome = match frame {
            None => Err(CoachError::CaptureUnavailable),
            Some(image) => {
                self.analyzer
                    .analyze(AnalysisRequest::new(image, exercise))
                    .await
            }
        };

        {
            // stop() bumps the epoch while holding this lock, so the check
            // and the delivery cannot interleave with a stop.
            let subscriber = lock(&self.subscriber);
            if self.epoch.load(Ordering::SeqCst) == started_epoch {
                let event = match outcome {
                    Ok(analysis) => TrainerEvent::Analysis(analysis),
                    Err(error) => TrainerEvent::Failure(error),
                };
                if let Some(subscriber) = subscriber.as_ref() {
                    subscriber(event);
                }
            } else {
                debug!("loop stopped while analysis was in flight, discarding result");
            }
        }

        self.in_flight.store(false, Ordering::SeqCst);
    }
}

/// The continuous analysis loop.
///
/// All methods take `&self`; the trainer can be shared behind an `Arc` and
/// driven from UI event handlers. `start` and `stop` must be called from
/// within a Tokio runtime.
pub struct LiveTrainer {
    core: Arc<TrainerCore>,
    mode: Mutex<TrainerMode>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl LiveTrainer {
    /// Create an idle trainer over a frame source and an analyzer.
    #[must_use]
    pub fn new(source: Box<dyn FrameSource>, analyzer: Arc<dyn PostureAnalyzer>) -> Self {
        Self {
            core: Arc::new(TrainerCore {
                analyzer,
                source: Mutex::new(source),
                exercise: Mutex::new(ExerciseType::Squat),
                in_flight: AtomicBool::new(false),
                epoch: AtomicU64::new(0),
                subscriber: Mutex::new(None),
            }),
            mode: Mutex::new(TrainerMode::Idle),
            timer: Mutex::new(None),
        }
    }

    /// Replace the current subscriber. Deliveries are not buffered; each one
    /// reflects only the most recent completed cycle.
    ///
    /// The callback runs on the cycle's task and must not call back into the
    /// trainer; hand the event off (e.g. through a channel) instead.
    pub fn subscribe(&self, subscriber: impl Fn(TrainerEvent) + Send + Sync + 'static) {
        *lock(&self.core.subscriber) = Some(Box::new(subscriber));
    }

    /// Select the exercise used for subsequent cycles.
    pub fn set_exercise(&self, exercise: ExerciseType) {
        *lock(&self.core.exercise) = exercise;
    }

    /// Exercise used for the next cycle.
    #[must_use]
    pub fn exercise(&self) -> ExerciseType {
        *lock(&self.core.exercise)
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn mode(&self) -> TrainerMode {
        *lock(&self.mode)
    }

    /// Whether a cycle is currently awaiting the service.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.core.in_flight.load(Ordering::SeqCst)
    }

    /// Run one capture-and-analyze cycle immediately, regardless of mode.
    ///
    /// No-op if a cycle is already in flight; the in-progress cycle is
    /// neither duplicated nor queued.
    pub async fn run_once(&self) {
        Arc::clone(&self.core).cycle().await;
    }

    /// Begin continuous analysis, one cycle per `interval`.
    ///
    /// The first cycle fires after one full interval, not immediately.
    /// Idempotent: calling `start` while Running changes nothing.
    pub fn start(&self, interval: Duration) {
        let mut mode = lock(&self.mode);
        if *mode == TrainerMode::Running {
            debug!("start() while already running, ignoring");
            return;
        }
        *mode = TrainerMode::Running;

        info!(interval_ms = interval.as_millis() as u64, "starting continuous analysis");
        let core = Arc::clone(&self.core);
        // The first deadline is anchored to the start() call itself, not to
        // whenever the ticker task first gets polled.
        let first_tick = Instant::now() + interval;
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(first_tick, interval);
            loop {
                ticker.tick().await;
                // Each cycle runs in its own task so a slow response never
                // delays the tick cadence; the in-flight gate collapses
                // overlapping ticks into no-ops.
                tokio::spawn(Arc::clone(&core).cycle());
            }
        });
        *lock(&self.timer) = Some(handle);
    }

    /// Stop continuous analysis.
    ///
    /// Cancels future ticks immediately and suppresses the delivery of any
    /// cycle still in flight. Idempotent: `stop` while Idle is a no-op.
    pub fn stop(&self) {
        let mut mode = lock(&self.mode);
        if *mode == TrainerMode::Idle {
            debug!("stop() while idle, ignoring");
            return;
        }
        *mode = TrainerMode::Idle;

        if let Some(handle) = lock(&self.timer).take() {
            handle.abort();
        }
        // Invalidate the in-flight cycle, if any; it will complete without
        // delivering. Bumping under the subscriber lock keeps a delivery
        // already past its epoch check from slipping out after stop returns.
        {
            let _subscriber = lock(&self.core.subscriber);
            self.core.epoch.fetch_add(1, Ordering::SeqCst);
        }
        info!("continuous analysis stopped");
    }
}

impl Drop for LiveTrainer {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.timer).take() {
            handle.abort();
        }
    }
}

/// Lock a mutex, recovering the guard if a previous holder panicked.
fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
