//! Configuration file handling.

use crate::defaults;
use crate::error::{Result, SightlineError};
use crate::pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineSection,
    pub camera: CameraSection,
    pub speech: SpeechSection,
    pub labels: LabelsSection,
}

/// Pipeline timing and output shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineSection {
    pub min_interval_ms: u64,
    pub batch_depth: usize,
    pub display_top: usize,
    pub poll_interval_ms: u64,
    pub quiet: bool,
}

/// Camera capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraSection {
    pub width: u32,
    pub height: u32,
}

/// Speech output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeechSection {
    pub enabled: bool,
    pub command: String,
    pub startup_hint: bool,
}

/// Label table source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct LabelsSection {
    pub path: Option<PathBuf>,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            min_interval_ms: defaults::MIN_INTERVAL_MS,
            batch_depth: defaults::BATCH_DEPTH,
            display_top: defaults::DISPLAY_TOP,
            poll_interval_ms: defaults::POLL_INTERVAL_MS,
            quiet: false,
        }
    }
}

impl Default for CameraSection {
    fn default() -> Self {
        Self {
            width: defaults::FRAME_WIDTH,
            height: defaults::FRAME_HEIGHT,
        }
    }
}

impl Default for SpeechSection {
    fn default() -> Self {
        Self {
            enabled: true,
            command: defaults::SPEECH_COMMAND.to_string(),
            startup_hint: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values; a missing file or invalid TOML is
    /// an error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SightlineError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                SightlineError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from a file, or fall back to defaults when the file is missing.
    ///
    /// Invalid TOML still propagates: a present-but-broken file should never
    /// silently become the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(SightlineError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Write the configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| {
            SightlineError::Other(format!("serializing config: {e}"))
        })?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - SIGHTLINE_LABELS → labels.path
    /// - SIGHTLINE_SPEECH_COMMAND → speech.command
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(path) = std::env::var("SIGHTLINE_LABELS")
            && !path.is_empty()
        {
            self.labels.path = Some(PathBuf::from(path));
        }

        if let Ok(command) = std::env::var("SIGHTLINE_SPEECH_COMMAND")
            && !command.is_empty()
        {
            self.speech.command = command;
        }

        self
    }

    /// Build the runtime pipeline configuration from the file sections.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            min_interval: Duration::from_millis(self.pipeline.min_interval_ms),
            batch_depth: self.pipeline.batch_depth,
            display_top: self.pipeline.display_top,
            poll_interval: Duration::from_millis(self.pipeline.poll_interval_ms),
            quiet: self.pipeline.quiet,
            startup_hint: self.speech.enabled && self.speech.startup_hint,
        }
    }
}
