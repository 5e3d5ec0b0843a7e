//! sightline - Spoken camera classification for Linux
//!
//! Polls a camera, classifies what it sees about once a second, and speaks
//! the top results on demand while a press gesture is held.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod camera;
pub mod classify;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod pipeline;
pub mod speech;

// Core traits (source → classify → route)
pub use camera::{CameraSource, Frame};
pub use classify::{Classifier, LabelTable, ScoredClass};
pub use pipeline::router::{CollectorDisplay, DisplaySink, StdoutDisplay};
pub use speech::{CommandExecutor, SpeechSynthesizer, SystemCommandExecutor};

// Pipeline
pub use pipeline::orchestrator::{Pipeline, PipelineConfig, PipelineHandle};
pub use pipeline::toggle::{GestureEvent, ToggleState};

// Error handling
pub use error::{Result, SightlineError};

// Config
pub use config::Config;

// Station framework (for advanced users)
pub use pipeline::error::{ErrorReporter, StationError};
pub use pipeline::station::Station;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
