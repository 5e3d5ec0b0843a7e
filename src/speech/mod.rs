//! Speech output seam.
//!
//! The synthesizer is shared between the gesture context (which cancels
//! speech when the toggle releases) and the dispatch context (which submits
//! utterances), so the trait takes `&self` and implementations handle their
//! own interior state.

use crate::defaults;
use crate::error::{Result, SightlineError};
use std::process::Command;
use std::sync::{Arc, Mutex};

/// Trait for speech output engines.
pub trait SpeechSynthesizer: Send + Sync {
    /// Submit one utterance. Returns once the request is queued, not once
    /// speech finishes.
    fn speak(&self, text: &str) -> Result<()>;

    /// Cancel any in-flight utterance immediately.
    fn cancel(&self) -> Result<()>;

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "speech"
    }
}

/// Trait for executing external commands, allowing tests to intercept them.
pub trait CommandExecutor: Send + Sync {
    fn execute(&self, command: &str, args: &[&str]) -> Result<()>;
}

/// Executes commands via `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, command: &str, args: &[&str]) -> Result<()> {
        let status = Command::new(command)
            .args(args)
            .status()
            .map_err(|e| SightlineError::CommandFailed {
                command: command.to_string(),
                message: e.to_string(),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(SightlineError::CommandFailed {
                command: command.to_string(),
                message: format!("exit status {status}"),
            })
        }
    }
}

/// Speech output via speech-dispatcher's `spd-say`.
///
/// `spd-say` returns as soon as the utterance is queued; `-C` cancels all
/// queued and playing messages immediately.
pub struct SpdSynthesizer<E: CommandExecutor = SystemCommandExecutor> {
    executor: E,
    command: String,
}

impl SpdSynthesizer<SystemCommandExecutor> {
    /// Synthesizer using the system `spd-say` (production use).
    pub fn system() -> Self {
        Self::new(SystemCommandExecutor)
    }
}

impl<E: CommandExecutor> SpdSynthesizer<E> {
    /// Synthesizer with a custom executor (testing/library use).
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            command: defaults::SPEECH_COMMAND.to_string(),
        }
    }

    /// Override the speech command name.
    pub fn with_command(mut self, command: &str) -> Self {
        self.command = command.to_string();
        self
    }
}

impl<E: CommandExecutor> SpeechSynthesizer for SpdSynthesizer<E> {
    fn speak(&self, text: &str) -> Result<()> {
        self.executor
            .execute(&self.command, &["--", text])
            .map_err(|e| SightlineError::Speech {
                message: e.to_string(),
            })
    }

    fn cancel(&self) -> Result<()> {
        self.executor
            .execute(&self.command, &["-C"])
            .map_err(|e| SightlineError::Speech {
                message: e.to_string(),
            })
    }

    fn name(&self) -> &'static str {
        "spd-say"
    }
}

/// Synthesizer that swallows all requests (speech disabled runs).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSynthesizer;

impl SpeechSynthesizer for NullSynthesizer {
    fn speak(&self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn cancel(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

/// One recorded synthesizer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechCall {
    Speak(String),
    Cancel,
}

/// Mock synthesizer recording the ordered call log.
#[derive(Debug, Clone, Default)]
pub struct MockSynthesizer {
    calls: Arc<Mutex<Vec<SpeechCall>>>,
    fail_speak: bool,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to fail on speak.
    pub fn with_speak_failure(mut self) -> Self {
        self.fail_speak = true;
        self
    }

    /// Snapshot of the ordered call log.
    pub fn calls(&self) -> Vec<SpeechCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Utterance texts in submission order.
    pub fn spoken(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SpeechCall::Speak(text) => Some(text),
                SpeechCall::Cancel => None,
            })
            .collect()
    }

    /// Number of cancel calls.
    pub fn cancels(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SpeechCall::Cancel))
            .count()
    }
}

impl SpeechSynthesizer for MockSynthesizer {
    fn speak(&self, text: &str) -> Result<()> {
        if self.fail_speak {
            return Err(SightlineError::Speech {
                message: "mock speak failure".to_string(),
            });
        }
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(SpeechCall::Speak(text.to_string()));
        }
        Ok(())
    }

    fn cancel(&self) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(SpeechCall::Cancel);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
