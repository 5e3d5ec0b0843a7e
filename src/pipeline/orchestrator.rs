//! Session assembly: capture loop, dispatch, and gesture handling.
//!
//! Thread layout per session:
//! - capture thread: polls the camera, rate-limits, assembles batches, runs
//!   inference synchronously, sends results into the dispatch channel
//! - router thread: drains the dispatch channel in FIFO order and applies
//!   display/speech side effects
//! - gesture thread: applies gesture events to the speech toggle
//!
//! Inference runs on the capture thread itself, so at most one inference is
//! in flight at any time; frames arriving while it runs are simply never
//! polled, and the rate limiter throttles the ones that are.

use crate::camera::CameraSource;
use crate::classify::{Classifier, LabelTable};
use crate::defaults;
use crate::error::{Result, SightlineError};
use crate::pipeline::batch::{BatchStrategy, DuplicateBatcher};
use crate::pipeline::clock::{Clock, SystemClock};
use crate::pipeline::error::{ErrorReporter, LogReporter, StationError};
use crate::pipeline::inference::InferenceOrchestrator;
use crate::pipeline::rate_limiter::RateLimiter;
use crate::pipeline::router::{DisplaySink, ResultRouter};
use crate::pipeline::station::StationRunner;
use crate::pipeline::toggle::{GestureEvent, SpeechToggle};
use crate::speech::SpeechSynthesizer;
use crossbeam_channel::{RecvTimeoutError, bounded, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Configuration for a classification session.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Minimum interval between admitted frames.
    pub min_interval: Duration,
    /// Temporal depth of assembled batches.
    pub batch_depth: usize,
    /// Number of top-ranked labels to display and speak.
    pub display_top: usize,
    /// Camera poll interval.
    pub poll_interval: Duration,
    /// Suppress the shutdown latency summary.
    pub quiet: bool,
    /// Speak the usage hint when the session starts.
    pub startup_hint: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(defaults::MIN_INTERVAL_MS),
            batch_depth: defaults::BATCH_DEPTH,
            display_top: defaults::DISPLAY_TOP,
            poll_interval: Duration::from_millis(defaults::POLL_INTERVAL_MS),
            quiet: false,
            startup_hint: true,
        }
    }
}

/// Handle to a running classification session.
pub struct PipelineHandle {
    running: Arc<AtomicBool>,
    threads: Vec<JoinHandle<()>>,
    gesture_tx: crossbeam_channel::Sender<GestureEvent>,
    result_rx: crossbeam_channel::Receiver<Option<String>>,
}

impl PipelineHandle {
    /// Deliver a gesture event to the session. Events arriving after
    /// shutdown are discarded.
    pub fn gesture(&self, event: GestureEvent) {
        let _ = self.gesture_tx.send(event);
    }

    /// Returns true while the session is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Signal shutdown and wait for all session threads.
    ///
    /// Returns the last displayed line, if any result was dispatched.
    pub fn stop(self) -> Option<String> {
        self.finish(true)
    }

    /// Wait for the session to end on its own. Only meaningful for finite
    /// sources, which end the session when exhausted; a live source never
    /// stops by itself.
    pub fn wait(self) -> Option<String> {
        self.finish(false)
    }

    fn finish(mut self, signal: bool) -> Option<String> {
        if signal {
            self.running.store(false, Ordering::SeqCst);
        }
        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                eprintln!("sightline: pipeline thread panicked");
            }
        }
        self.result_rx.try_recv().ok().flatten()
    }
}

/// Builds and starts classification sessions.
pub struct Pipeline {
    config: PipelineConfig,
    error_reporter: Arc<dyn ErrorReporter>,
    clock: Arc<dyn Clock>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            error_reporter: Arc::new(LogReporter),
            clock: Arc::new(SystemClock),
        }
    }

    /// Sets a custom error reporter.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = reporter;
        self
    }

    /// Sets a custom time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Starts a session over the given devices and sinks.
    ///
    /// Fails only if the camera refuses to start; once running, per-cycle
    /// failures drop the affected cycle and the session continues.
    pub fn start(
        self,
        mut camera: Box<dyn CameraSource>,
        classifier: Arc<dyn Classifier>,
        labels: LabelTable,
        display: Box<dyn DisplaySink>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Result<PipelineHandle> {
        let running = Arc::new(AtomicBool::new(true));
        let speech_enabled = Arc::new(AtomicBool::new(false));

        camera.start()?;

        if self.config.startup_hint
            && let Err(e) = synthesizer.speak(defaults::STARTUP_HINT)
        {
            eprintln!("sightline: startup hint failed: {e}");
        }

        // Unbounded dispatch: submissions never block or fail under load,
        // and the router consumes strictly in submission order. The rate
        // limiter bounds the enqueue rate, so depth stays small.
        let (dispatch_tx, dispatch_rx) = unbounded();
        let (gesture_tx, gesture_rx) = bounded(16);
        let (result_tx, result_rx) = bounded(1);

        let router = ResultRouter::new(
            labels,
            display,
            synthesizer.clone(),
            speech_enabled.clone(),
            result_tx,
        )
        .with_display_top(self.config.display_top)
        .with_quiet(self.config.quiet);

        let router_runner =
            StationRunner::spawn(router, dispatch_rx, self.error_reporter.clone());

        // Capture thread: poll, admit, batch, infer, dispatch.
        let capture_running = running.clone();
        let reporter = self.error_reporter.clone();
        let clock = self.clock.clone();
        let config = self.config.clone();
        let capture_handle = thread::spawn(move || {
            let mut limiter = RateLimiter::new(config.min_interval);
            let batcher = DuplicateBatcher::new(config.batch_depth);
            let inference = InferenceOrchestrator::new(classifier, clock);
            let mut consecutive_errors = 0u32;

            while capture_running.load(Ordering::SeqCst) {
                match camera.capture() {
                    // No buffer this poll: the cycle is dropped without a
                    // trace, no sink is touched.
                    Err(SightlineError::MissingBuffer) => {}
                    Err(e) => {
                        consecutive_errors += 1;
                        if consecutive_errors >= defaults::MAX_CONSECUTIVE_CAPTURE_ERRORS {
                            reporter.report(
                                "capture",
                                &StationError::Fatal(format!(
                                    "camera failed {consecutive_errors} times in a row: {e}"
                                )),
                            );
                            break;
                        }
                        reporter.report("capture", &StationError::Recoverable(e.to_string()));
                    }
                    Ok(None) => {
                        // Finite sources signal exhaustion; live sources
                        // just have no buffer ready yet.
                        if camera.is_finite() {
                            break;
                        }
                    }
                    Ok(Some(frame)) => {
                        consecutive_errors = 0;
                        // Admission is keyed on when the frame was captured,
                        // not on when this poll happens to run.
                        if limiter.admit(frame.timestamp) {
                            let batch = batcher.assemble(frame);
                            match inference.run(&batch) {
                                Ok(classification) => {
                                    if dispatch_tx.send(classification).is_err() {
                                        break;
                                    }
                                }
                                // Dropped cycle: no result reaches any sink.
                                Err(e) => reporter
                                    .report("inference", &StationError::Recoverable(e.to_string())),
                            }
                        }
                    }
                }
                thread::sleep(config.poll_interval);
            }

            if let Err(e) = camera.stop() {
                eprintln!("sightline: camera stop failed: {e}");
            }
            // Ends the session for everyone else: the router sees its input
            // close once dispatch_tx drops with this thread.
            capture_running.store(false, Ordering::SeqCst);
        });

        // Gesture thread: applies events to the toggle, resets on shutdown.
        let gesture_running = running.clone();
        let gesture_handle = thread::spawn(move || {
            let mut toggle = SpeechToggle::new(speech_enabled, synthesizer);
            loop {
                match gesture_rx.recv_timeout(Duration::from_millis(100)) {
                    Ok(event) => {
                        toggle.apply(event);
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        if !gesture_running.load(Ordering::SeqCst) {
                            break;
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            toggle.reset();
        });

        let mut threads = vec![capture_handle, gesture_handle];
        threads.push(thread::spawn(move || {
            if let Err(e) = router_runner.join() {
                eprintln!("sightline: {e}");
            }
        }));

        Ok(PipelineHandle {
            running,
            threads,
            gesture_tx,
            result_rx,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Frame, FramePhase, MockCameraSource};
    use crate::classify::{MockClassifier, ScoredClass};
    use crate::pipeline::router::CollectorDisplay;
    use crate::speech::MockSynthesizer;
    use std::time::Instant;

    fn labels() -> LabelTable {
        LabelTable::from_lines(["ash", "birch", "cedar", "douglas", "elm"])
    }

    fn rankings() -> Vec<ScoredClass> {
        vec![
            ScoredClass::new(3, 0.9),
            ScoredClass::new(1, 0.7),
            ScoredClass::new(4, 0.7),
            ScoredClass::new(2, 0.3),
            ScoredClass::new(0, 0.1),
        ]
    }

    fn fast_config() -> PipelineConfig {
        PipelineConfig {
            min_interval: Duration::ZERO,
            poll_interval: Duration::from_millis(1),
            quiet: true,
            startup_hint: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_config_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.min_interval, Duration::from_millis(1000));
        assert_eq!(config.batch_depth, 4);
        assert_eq!(config.display_top, 3);
        assert_eq!(config.poll_interval, Duration::from_millis(16));
        assert!(!config.quiet);
        assert!(config.startup_hint);
    }

    #[test]
    fn test_camera_start_failure_aborts_session() {
        let camera = Box::new(MockCameraSource::new().with_start_failure());
        let result = Pipeline::new(fast_config()).start(
            camera,
            Arc::new(MockClassifier::new("mock").with_rankings(rankings())),
            labels(),
            Box::new(CollectorDisplay::new()),
            Arc::new(MockSynthesizer::new()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_finite_source_runs_to_completion() {
        let camera = Box::new(MockCameraSource::new().with_frame_sequence(vec![FramePhase {
            pixels: vec![20; 16],
            count: 3,
        }]));
        let display = CollectorDisplay::new();

        let handle = Pipeline::new(fast_config())
            .start(
                camera,
                Arc::new(MockClassifier::new("mock").with_rankings(rankings())),
                labels(),
                Box::new(display.clone()),
                Arc::new(MockSynthesizer::new()),
            )
            .unwrap();

        let last = handle.wait();

        let lines = display.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("douglas, birch, elm - "));
        assert_eq!(last, lines.last().cloned());
    }

    #[test]
    fn test_classifier_failure_drops_cycle_silently() {
        let camera = Box::new(MockCameraSource::new().with_frame_sequence(vec![FramePhase {
            pixels: vec![20; 16],
            count: 2,
        }]));
        let display = CollectorDisplay::new();
        let synth = MockSynthesizer::new();

        let handle = Pipeline::new(fast_config())
            .start(
                camera,
                Arc::new(MockClassifier::new("mock").with_failure()),
                labels(),
                Box::new(display.clone()),
                Arc::new(synth.clone()),
            )
            .unwrap();

        assert_eq!(handle.wait(), None);
        assert!(display.lines().is_empty());
        assert!(synth.calls().is_empty());
    }

    #[test]
    fn test_rate_limiter_throttles_dense_frames() {
        // 20 frames polled 1ms apart against a 1s interval: only the first
        // is admitted.
        let camera = Box::new(MockCameraSource::new().with_frame_sequence(vec![FramePhase {
            pixels: vec![20; 16],
            count: 20,
        }]));
        let display = CollectorDisplay::new();

        let config = PipelineConfig {
            min_interval: Duration::from_millis(1000),
            ..fast_config()
        };
        let handle = Pipeline::new(config)
            .start(
                camera,
                Arc::new(MockClassifier::new("mock").with_rankings(rankings())),
                labels(),
                Box::new(display.clone()),
                Arc::new(MockSynthesizer::new()),
            )
            .unwrap();

        handle.wait();
        assert_eq!(display.lines().len(), 1);
    }

    // Finite source that replays frames with scripted capture timestamps.
    struct StampedCamera {
        timestamps: Vec<Instant>,
        next: usize,
    }

    impl CameraSource for StampedCamera {
        fn start(&mut self) -> Result<()> {
            Ok(())
        }

        fn stop(&mut self) -> Result<()> {
            Ok(())
        }

        fn capture(&mut self) -> Result<Option<Frame>> {
            let Some(&timestamp) = self.timestamps.get(self.next) else {
                return Ok(None);
            };
            self.next += 1;
            Ok(Some(Frame::new(
                vec![20; 16],
                4,
                4,
                self.next as u64,
                timestamp,
            )))
        }

        fn is_finite(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_admission_keyed_on_frame_timestamps_not_poll_time() {
        // Frames polled back to back but stamped 0/400/1100/1500ms apart:
        // against a 1s interval only the 0ms and 1100ms stamps pass.
        let base = Instant::now();
        let camera = Box::new(StampedCamera {
            timestamps: vec![
                base,
                base + Duration::from_millis(400),
                base + Duration::from_millis(1100),
                base + Duration::from_millis(1500),
            ],
            next: 0,
        });
        let display = CollectorDisplay::new();

        let config = PipelineConfig {
            min_interval: Duration::from_millis(1000),
            ..fast_config()
        };
        let handle = Pipeline::new(config)
            .start(
                camera,
                Arc::new(MockClassifier::new("mock").with_rankings(rankings())),
                labels(),
                Box::new(display.clone()),
                Arc::new(MockSynthesizer::new()),
            )
            .unwrap();

        handle.wait();
        assert_eq!(display.lines().len(), 2);
    }

    #[test]
    fn test_repeated_capture_failures_end_session() {
        let camera = Box::new(
            MockCameraSource::new()
                .with_capture_failure()
                .as_live_source(),
        );
        let handle = Pipeline::new(fast_config())
            .start(
                camera,
                Arc::new(MockClassifier::new("mock").with_rankings(rankings())),
                labels(),
                Box::new(CollectorDisplay::new()),
                Arc::new(MockSynthesizer::new()),
            )
            .unwrap();

        // The capture thread trips the consecutive-error cap and tears the
        // session down without external intervention.
        assert_eq!(handle.wait(), None);
    }

    #[test]
    fn test_startup_hint_spoken_when_enabled() {
        let camera = Box::new(MockCameraSource::new());
        let synth = MockSynthesizer::new();

        let config = PipelineConfig {
            startup_hint: true,
            ..fast_config()
        };
        let handle = Pipeline::new(config)
            .start(
                camera,
                Arc::new(MockClassifier::new("mock").with_rankings(rankings())),
                labels(),
                Box::new(CollectorDisplay::new()),
                Arc::new(synth.clone()),
            )
            .unwrap();
        handle.wait();

        assert_eq!(synth.spoken(), vec![defaults::STARTUP_HINT.to_string()]);
    }

    #[test]
    fn test_handle_reports_running_state() {
        let camera = Box::new(MockCameraSource::new().as_live_source());
        let handle = Pipeline::new(fast_config())
            .start(
                camera,
                Arc::new(MockClassifier::new("mock").with_rankings(rankings())),
                labels(),
                Box::new(CollectorDisplay::new()),
                Arc::new(MockSynthesizer::new()),
            )
            .unwrap();

        assert!(handle.is_running());
        assert_eq!(handle.stop(), None);
    }

    #[test]
    fn test_gesture_toggles_speech_for_later_results() {
        // A live source feeding frames continuously; pressing enables speech
        // for results dispatched while held.
        let camera = Box::new(
            MockCameraSource::new()
                .with_frame_sequence(vec![FramePhase {
                    pixels: vec![20; 16],
                    count: 10_000,
                }])
                .as_live_source(),
        );
        let display = CollectorDisplay::new();
        let synth = MockSynthesizer::new();

        let handle = Pipeline::new(fast_config())
            .start(
                camera,
                Arc::new(MockClassifier::new("mock").with_rankings(rankings())),
                labels(),
                Box::new(display.clone()),
                Arc::new(synth.clone()),
            )
            .unwrap();

        handle.gesture(GestureEvent::PressBegin);
        thread::sleep(Duration::from_millis(300));
        handle.gesture(GestureEvent::PressEnd);
        thread::sleep(Duration::from_millis(150));
        handle.stop();

        assert!(!display.lines().is_empty());
        assert!(
            synth.spoken().iter().any(|s| s == "douglas, birch, elm"),
            "expected at least one spoken result, got {:?}",
            synth.calls()
        );
        assert!(synth.cancels() >= 1, "release should cancel speech");
    }
}
