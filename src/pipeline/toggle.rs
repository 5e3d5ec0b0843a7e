//! Gesture-driven speech toggle state machine.

use crate::speech::SpeechSynthesizer;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Gesture events delivered to the toggle.
///
/// Only the long-press pair drives state; taps are accepted as interaction
/// affordances and deliberately do nothing here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    PressBegin,
    PressEnd,
    TapBegin,
    TapEnd,
}

/// Toggle state: speech follows the long-press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    Idle,
    Active,
}

/// Two-state machine controlling whether results are spoken.
///
/// Writes the shared `speech_enabled` flag read by the result router at
/// dispatch time; leaving `Active` also cancels any in-flight utterance
/// immediately, without waiting for a dispatch cycle.
pub struct SpeechToggle {
    state: ToggleState,
    enabled: Arc<AtomicBool>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl SpeechToggle {
    pub fn new(enabled: Arc<AtomicBool>, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            state: ToggleState::Idle,
            enabled,
            synthesizer,
        }
    }

    /// Apply one gesture event, returning the resulting state.
    pub fn apply(&mut self, event: GestureEvent) -> ToggleState {
        match (self.state, event) {
            (ToggleState::Idle, GestureEvent::PressBegin) => {
                self.state = ToggleState::Active;
                self.enabled.store(true, Ordering::SeqCst);
            }
            (ToggleState::Active, GestureEvent::PressEnd) => {
                self.state = ToggleState::Idle;
                self.enabled.store(false, Ordering::SeqCst);
                self.cancel_speech();
            }
            // Taps and mismatched press events are no-ops.
            _ => {}
        }
        self.state
    }

    /// Current state.
    pub fn state(&self) -> ToggleState {
        self.state
    }

    /// Return to `Idle` on session teardown.
    pub fn reset(&mut self) {
        if self.state == ToggleState::Active {
            self.cancel_speech();
        }
        self.state = ToggleState::Idle;
        self.enabled.store(false, Ordering::SeqCst);
    }

    fn cancel_speech(&self) {
        if let Err(e) = self.synthesizer.cancel() {
            eprintln!("sightline: speech cancel failed: {e}");
        }
    }
}
