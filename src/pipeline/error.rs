//! Failure severity and reporting for pipeline stages.

use std::fmt;

/// How badly a stage failed on one item.
///
/// A recoverable failure drops the current cycle and the stage keeps
/// consuming. A fatal failure ends the stage, which tears the session down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationError {
    Recoverable(String),
    Fatal(String),
}

impl StationError {
    /// True when the failure ends the stage.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StationError::Fatal(_))
    }
}

impl fmt::Display for StationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationError::Recoverable(msg) => write!(f, "dropped cycle: {msg}"),
            StationError::Fatal(msg) => write!(f, "fatal: {msg}"),
        }
    }
}

impl std::error::Error for StationError {}

/// Where stage failures go.
///
/// The hot path never prints directly; every failure crosses this seam so
/// tests can observe it.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, station: &str, error: &StationError);
}

/// Default reporter: one stderr line per failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, station: &str, error: &StationError) {
        eprintln!("sightline: {station}: {error}");
    }
}
