//! Default configuration constants for sightline.
//!
//! Shared constants used across configuration types to keep the pipeline,
//! config file and CLI defaults in agreement.

/// Minimum interval between admitted frames in milliseconds.
///
/// Classifier invocations are capped at roughly one per second regardless of
/// the camera frame rate, bounding CPU and energy cost on live feeds.
pub const MIN_INTERVAL_MS: u64 = 1000;

/// Temporal depth of the batch handed to the classifier.
///
/// The model expects a 4-frame clip. The default batcher reaches this depth
/// by duplicating the current frame (see `pipeline::batch`).
pub const BATCH_DEPTH: usize = 4;

/// Maximum number of ranked classes a classifier returns.
pub const TOP_K: usize = 5;

/// Number of top-ranked labels shown and spoken per result.
pub const DISPLAY_TOP: usize = 3;

/// Separator between labels in display and speech output.
pub const LABEL_SEPARATOR: &str = ", ";

/// Interval between camera polls in milliseconds (~60 Hz).
pub const POLL_INTERVAL_MS: u64 = 16;

/// Consecutive capture failures tolerated before the capture loop gives up.
pub const MAX_CONSECUTIVE_CAPTURE_ERRORS: u32 = 10;

/// Default camera frame width in pixels.
pub const FRAME_WIDTH: u32 = 320;

/// Default camera frame height in pixels.
pub const FRAME_HEIGHT: u32 = 240;

/// External command used for speech output.
///
/// `spd-say` talks to speech-dispatcher, which is present on most Linux
/// desktops and supports immediate cancellation (`-C`).
pub const SPEECH_COMMAND: &str = "spd-say";

/// Hint spoken once when a session starts.
pub const STARTUP_HINT: &str = "Hold your finger on the screen to hear what the camera sees";
