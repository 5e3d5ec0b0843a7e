//! Real-time classification pipeline.
//!
//! Frames flow camera → rate limiter → batch assembly → inference →
//! dispatch → result router; a gesture-driven toggle controls whether
//! routed results are also spoken.

pub mod batch;
pub mod clock;
pub mod error;
pub mod inference;
pub mod latency;
pub mod orchestrator;
pub mod rate_limiter;
pub mod router;
pub mod station;
pub mod toggle;
pub mod types;

pub use batch::{BatchStrategy, DuplicateBatcher};
pub use clock::{Clock, MockClock, SystemClock};
pub use error::{ErrorReporter, LogReporter, StationError};
pub use inference::InferenceOrchestrator;
pub use latency::{LatencyStats, LatencyTracker};
pub use orchestrator::{Pipeline, PipelineConfig, PipelineHandle};
pub use rate_limiter::RateLimiter;
pub use router::{CollectorDisplay, DisplaySink, ResultRouter, StdoutDisplay, format_display_line};
pub use station::{Station, StationRunner};
pub use toggle::{GestureEvent, SpeechToggle, ToggleState};
pub use types::{Classification, FrameBatch};
