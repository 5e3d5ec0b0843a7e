//! Terminal stage runner for the dispatch side of the pipeline.
//!
//! The pipeline has exactly one channel-fed stage: the router, which
//! consumes classifications and applies display and speech side effects.
//! Nothing flows downstream of it, so the runner is a sink loop rather
//! than a general relay.

use crate::pipeline::error::{ErrorReporter, StationError};
use crossbeam_channel::Receiver;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// A channel-fed sink stage.
pub trait Station: Send + 'static {
    /// The item type this stage consumes.
    type Input: Send + 'static;

    /// Consume one item.
    ///
    /// A recoverable error drops the item and the stage keeps consuming;
    /// a fatal error ends the stage.
    fn process(&mut self, input: Self::Input) -> Result<(), StationError>;

    /// Stage name used in failure reports.
    fn name(&self) -> &'static str;

    /// Called once when the stage stops, after the last consumed item.
    fn shutdown(&mut self) {}
}

/// Owns the thread a stage runs on.
///
/// The stage consumes until its input channel closes or a fatal error
/// occurs, then gets its `shutdown` hook before the thread exits.
pub struct StationRunner {
    handle: Option<JoinHandle<()>>,
    station_name: &'static str,
}

impl StationRunner {
    /// Spawn a stage on its own thread, fed from `input_rx`.
    pub fn spawn<S: Station>(
        mut station: S,
        input_rx: Receiver<S::Input>,
        error_reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        let station_name = station.name();

        let handle = thread::spawn(move || {
            while let Ok(input) = input_rx.recv() {
                if let Err(err) = station.process(input) {
                    error_reporter.report(station_name, &err);
                    if err.is_fatal() {
                        break;
                    }
                }
            }
            station.shutdown();
        });

        Self {
            handle: Some(handle),
            station_name,
        }
    }

    /// Wait for the stage thread to finish.
    pub fn join(mut self) -> Result<(), String> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| format!("station `{}` thread panicked", self.station_name)),
            None => Ok(()),
        }
    }

    /// Stage name, for logging around the join.
    pub fn name(&self) -> &'static str {
        self.station_name
    }
}
