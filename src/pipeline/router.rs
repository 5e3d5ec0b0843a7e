//! Result routing: formatting and dispatch to display and speech sinks.
//!
//! The router runs on the dispatch thread (the UI context). It is the single
//! point where inference results cross into user-visible side effects, and
//! the only reader of the shared speech flag.

use crate::classify::LabelTable;
use crate::defaults;
use crate::pipeline::error::StationError;
use crate::pipeline::latency::LatencyTracker;
use crate::pipeline::station::Station;
use crate::pipeline::types::Classification;
use crate::speech::SpeechSynthesizer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Pluggable display output: accepts a formatted line, replacing the prior
/// displayed value.
pub trait DisplaySink: Send + 'static {
    /// Show a formatted result line.
    fn show(&mut self, line: &str) -> crate::error::Result<()>;

    /// Called on pipeline shutdown. Return the last displayed line if
    /// applicable.
    fn finish(&mut self) -> Option<String> {
        None
    }

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "display"
    }
}

/// Records displayed lines for tests and library use.
#[derive(Debug, Clone, Default)]
pub struct CollectorDisplay {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CollectorDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all displayed lines in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl DisplaySink for CollectorDisplay {
    fn show(&mut self, line: &str) -> crate::error::Result<()> {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
        Ok(())
    }

    fn finish(&mut self) -> Option<String> {
        self.lines.lock().ok()?.last().cloned()
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

/// Terminal display that rewrites a single status line.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutDisplay;

impl DisplaySink for StdoutDisplay {
    fn show(&mut self, line: &str) -> crate::error::Result<()> {
        print!("\r{:70}\r{}", "", line);
        use std::io::Write;
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdout"
    }
}

/// Join labels for speech output.
pub fn format_utterance(labels: &[&str]) -> String {
    labels.join(defaults::LABEL_SEPARATOR)
}

/// Build the display line: labels plus measured latency.
///
/// Pure and deterministic: identical inputs always produce identical output.
pub fn format_display_line(labels: &[&str], latency: Duration) -> String {
    format!(
        "{} - {}ms",
        format_utterance(labels),
        latency.as_millis()
    )
}

/// Routes ranked results to the display sink and, when enabled, the speech
/// sink.
pub struct ResultRouter {
    labels: LabelTable,
    display: Box<dyn DisplaySink>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    speech_enabled: Arc<AtomicBool>,
    display_top: usize,
    quiet: bool,
    tracker: LatencyTracker,
    result_tx: Option<crossbeam_channel::Sender<Option<String>>>,
}

impl ResultRouter {
    pub fn new(
        labels: LabelTable,
        display: Box<dyn DisplaySink>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        speech_enabled: Arc<AtomicBool>,
        result_tx: crossbeam_channel::Sender<Option<String>>,
    ) -> Self {
        Self {
            labels,
            display,
            synthesizer,
            speech_enabled,
            display_top: defaults::DISPLAY_TOP,
            quiet: false,
            tracker: LatencyTracker::new(),
            result_tx: Some(result_tx),
        }
    }

    /// Number of top-ranked labels to show and speak.
    pub fn with_display_top(mut self, display_top: usize) -> Self {
        self.display_top = display_top;
        self
    }

    /// Suppress the shutdown latency summary.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

impl Station for ResultRouter {
    type Input = Classification;

    fn name(&self) -> &'static str {
        "router"
    }

    fn process(&mut self, result: Classification) -> Result<(), StationError> {
        // Single atomic load: the critical section for the cross-thread flag
        // is exactly this read.
        let speech_enabled = self.speech_enabled.load(Ordering::SeqCst);

        // Cancellation takes precedence over any new utterance, so a release
        // racing with an in-flight dispatch never leaves stale speech
        // playing.
        if !speech_enabled && let Err(e) = self.synthesizer.cancel() {
            eprintln!("sightline: speech cancel failed: {e}");
        }

        // Top-3 by contract, fewer when the result is shorter.
        let take = self.display_top.min(result.rankings.len());
        let mut labels = Vec::with_capacity(take);
        for ranked in &result.rankings[..take] {
            match self.labels.label(ranked.index) {
                Some(label) => labels.push(label),
                // A hole in the label table is a model/labels contract
                // violation, not a per-frame condition.
                None => {
                    let err = crate::error::SightlineError::LabelOutOfRange {
                        index: ranked.index,
                        len: self.labels.len(),
                    };
                    return Err(StationError::Fatal(err.to_string()));
                }
            }
        }

        let line = format_display_line(&labels, result.latency);
        self.display
            .show(&line)
            .map_err(|e| StationError::Recoverable(e.to_string()))?;

        if speech_enabled {
            let utterance = format_utterance(&labels);
            if let Err(e) = self.synthesizer.speak(&utterance) {
                eprintln!("sightline: speech output failed: {e}");
            }
        }

        self.tracker.record(result.latency);
        Ok(())
    }

    fn shutdown(&mut self) {
        if !self.quiet {
            self.tracker.print_summary();
        }

        let last = self.display.finish();
        if let Some(tx) = self.result_tx.take()
            && tx.send(last).is_err()
        {
            eprintln!("sightline: router shutdown: result receiver already dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ScoredClass;
    use crate::speech::{MockSynthesizer, SpeechCall};
    use crossbeam_channel::bounded;

    fn labels() -> LabelTable {
        LabelTable::from_lines(["zero", "one", "two", "three", "four"])
    }

    fn classification(indices: &[usize], latency_ms: u64) -> Classification {
        let rankings = indices
            .iter()
            .enumerate()
            .map(|(rank, &index)| ScoredClass::new(index, 0.9 - rank as f32 * 0.2))
            .collect();
        Classification::new(rankings, Duration::from_millis(latency_ms))
    }

    struct Fixture {
        router: ResultRouter,
        display: CollectorDisplay,
        synth: MockSynthesizer,
        enabled: Arc<AtomicBool>,
        result_rx: crossbeam_channel::Receiver<Option<String>>,
    }

    fn fixture() -> Fixture {
        let display = CollectorDisplay::new();
        let synth = MockSynthesizer::new();
        let enabled = Arc::new(AtomicBool::new(false));
        let (result_tx, result_rx) = bounded(1);

        let router = ResultRouter::new(
            labels(),
            Box::new(display.clone()),
            Arc::new(synth.clone()),
            enabled.clone(),
            result_tx,
        )
        .with_quiet(true);

        Fixture {
            router,
            display,
            synth,
            enabled,
            result_rx,
        }
    }

    #[test]
    fn test_selects_top_three_verbatim() {
        // Confidences [0.9, 0.7, 0.7, 0.3, 0.1], indices [3,1,4,2,0]:
        // ranks 0-2 pass through untouched.
        let mut f = fixture();
        let result = Classification::new(
            vec![
                ScoredClass::new(3, 0.9),
                ScoredClass::new(1, 0.7),
                ScoredClass::new(4, 0.7),
                ScoredClass::new(2, 0.3),
                ScoredClass::new(0, 0.1),
            ],
            Duration::from_millis(25),
        );

        f.router.process(result).unwrap();

        assert_eq!(f.display.lines(), vec!["three, one, four - 25ms"]);
    }

    #[test]
    fn test_display_updates_even_with_speech_off() {
        let mut f = fixture();
        f.router.process(classification(&[0, 1, 2], 10)).unwrap();

        assert_eq!(f.display.lines().len(), 1);
        assert_eq!(f.synth.spoken(), Vec::<String>::new());
    }

    #[test]
    fn test_speech_off_cancels_before_display() {
        let mut f = fixture();
        f.router.process(classification(&[0, 1, 2], 10)).unwrap();

        // Speech disabled: every dispatch cancels outstanding utterances.
        assert_eq!(f.synth.calls(), vec![SpeechCall::Cancel]);
    }

    #[test]
    fn test_speech_on_speaks_labels_without_latency() {
        let f = &mut fixture();
        f.enabled.store(true, Ordering::SeqCst);

        f.router.process(classification(&[2, 0, 4], 31)).unwrap();

        assert_eq!(f.display.lines(), vec!["two, zero, four - 31ms"]);
        assert_eq!(f.synth.calls(), vec![SpeechCall::Speak("two, zero, four".to_string())]);
    }

    #[test]
    fn test_fewer_than_three_rankings_uses_all() {
        let mut f = fixture();
        f.router.process(classification(&[1, 3], 5)).unwrap();

        assert_eq!(f.display.lines(), vec!["one, three - 5ms"]);
    }

    #[test]
    fn test_out_of_range_label_is_fatal() {
        let mut f = fixture();
        let result = f.router.process(classification(&[99, 0, 1], 5));

        assert!(matches!(result, Err(StationError::Fatal(_))));
        assert!(f.display.lines().is_empty());
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let labels = ["cat", "dog", "bird"];
        let latency = Duration::from_millis(17);
        assert_eq!(
            format_display_line(&labels, latency),
            format_display_line(&labels, latency)
        );
        assert_eq!(format_display_line(&labels, latency), "cat, dog, bird - 17ms");
    }

    #[test]
    fn test_shutdown_reports_last_displayed_line() {
        let mut f = fixture();
        f.router.process(classification(&[0, 1, 2], 10)).unwrap();
        f.router.process(classification(&[2, 1, 0], 20)).unwrap();
        f.router.shutdown();

        let last = f.result_rx.recv().unwrap();
        assert_eq!(last, Some("two, one, zero - 20ms".to_string()));
    }

    #[test]
    fn test_shutdown_without_dispatches_reports_none() {
        let mut f = fixture();
        f.router.shutdown();
        assert_eq!(f.result_rx.recv().unwrap(), None);
    }

    #[test]
    fn test_custom_display_top() {
        let display = CollectorDisplay::new();
        let (result_tx, _result_rx) = bounded(1);
        let mut router = ResultRouter::new(
            labels(),
            Box::new(display.clone()),
            Arc::new(MockSynthesizer::new()),
            Arc::new(AtomicBool::new(false)),
            result_tx,
        )
        .with_display_top(1)
        .with_quiet(true);

        router.process(classification(&[4, 3, 2], 8)).unwrap();
        assert_eq!(display.lines(), vec!["four - 8ms"]);
    }
}
