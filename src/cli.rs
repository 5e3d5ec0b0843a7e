//! Command-line interface for sightline
//!
//! Provides argument parsing using clap derive macros.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Spoken camera classification for Linux
#[derive(Parser, Debug)]
#[command(
    name = "sightline",
    version,
    about = "Describes what the camera sees, on demand, out loud"
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to the label file (one label per line)
    #[arg(long, value_name = "PATH")]
    pub labels: Option<PathBuf>,

    /// Minimum interval between classified frames. Examples: 500ms, 1s, 2s
    #[arg(long, value_name = "DURATION", value_parser = parse_interval)]
    pub min_interval: Option<Duration>,

    /// Stop after the given duration instead of running until interrupted
    #[arg(long, value_name = "DURATION", value_parser = parse_interval)]
    pub duration: Option<Duration>,

    /// Number of top-ranked labels to display and speak
    #[arg(long, value_name = "N")]
    pub display_top: Option<usize>,

    /// Disable speech output entirely
    #[arg(long)]
    pub no_speech: bool,

    /// Suppress the latency summary
    #[arg(short, long)]
    pub quiet: bool,
}

/// Parse an interval string into a duration.
///
/// Supports any format accepted by `humantime`: bare numbers (milliseconds),
/// single-unit (`500ms`, `2s`), and compound (`1m30s`).
fn parse_interval(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    // Bare number → milliseconds
    if let Ok(ms) = s.parse::<u64>() {
        return Ok(Duration::from_millis(ms));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}
