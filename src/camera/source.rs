//! Camera source trait and implementations.

use crate::camera::frame::Frame;
use crate::defaults;
use crate::error::{Result, SightlineError};
use std::time::Instant;

/// Trait for camera capture devices.
///
/// This trait allows swapping implementations (real camera vs mock).
/// `capture` is polled by the pipeline's capture thread:
/// - `Ok(Some(frame))` - a frame is ready
/// - `Ok(None)` - nothing more to deliver: a finite source is exhausted, a
///   live source is warming up or stopped
/// - `Err(MissingBuffer)` - no buffer this poll; the cycle is dropped
///   silently
/// - `Err(..)` - capture error; the pipeline drops the cycle and reports it
pub trait CameraSource: Send {
    /// Start the capture session.
    fn start(&mut self) -> Result<()>;

    /// Stop the capture session.
    fn stop(&mut self) -> Result<()>;

    /// Poll for the next captured frame.
    fn capture(&mut self) -> Result<Option<Frame>>;

    /// Returns true when the source is finite (file/replay) rather than live.
    ///
    /// A finite source signals exhaustion by returning `Ok(None)`; a live
    /// source may return `Ok(None)` transiently while the device warms up.
    fn is_finite(&self) -> bool {
        false
    }
}

/// One phase of a mock capture sequence: `count` polls each yielding a frame
/// built from `pixels`. An empty pixel buffer simulates a poll with no
/// buffer ready (`MissingBuffer`).
#[derive(Debug, Clone)]
pub struct FramePhase {
    pub pixels: Vec<u8>,
    pub count: u32,
}

/// Mock camera source for testing.
pub struct MockCameraSource {
    phases: Vec<FramePhase>,
    phase_index: usize,
    phase_remaining: u32,
    sequence: u64,
    width: u32,
    height: u32,
    is_started: bool,
    live: bool,
    should_fail_start: bool,
    should_fail_capture: bool,
    error_message: String,
}

impl MockCameraSource {
    /// Create a new mock camera with no frames queued.
    pub fn new() -> Self {
        Self {
            phases: Vec::new(),
            phase_index: 0,
            phase_remaining: 0,
            sequence: 0,
            width: 4,
            height: 4,
            is_started: false,
            live: false,
            should_fail_start: false,
            should_fail_capture: false,
            error_message: "mock camera error".to_string(),
        }
    }

    /// Queue a sequence of frame phases to replay.
    pub fn with_frame_sequence(mut self, phases: Vec<FramePhase>) -> Self {
        self.phase_remaining = phases.first().map(|p| p.count).unwrap_or(0);
        self.phases = phases;
        self.phase_index = 0;
        self
    }

    /// Treat the source as live (infinite) rather than a finite replay.
    pub fn as_live_source(mut self) -> Self {
        self.live = true;
        self
    }

    /// Configure the mock to fail on start.
    pub fn with_start_failure(mut self) -> Self {
        self.should_fail_start = true;
        self
    }

    /// Configure the mock to fail on every capture.
    pub fn with_capture_failure(mut self) -> Self {
        self.should_fail_capture = true;
        self
    }

    /// Check if the camera has been started.
    pub fn is_started(&self) -> bool {
        self.is_started
    }
}

impl Default for MockCameraSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraSource for MockCameraSource {
    fn start(&mut self) -> Result<()> {
        if self.should_fail_start {
            return Err(SightlineError::Capture {
                message: self.error_message.clone(),
            });
        }
        self.is_started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.is_started = false;
        Ok(())
    }

    fn capture(&mut self) -> Result<Option<Frame>> {
        if self.should_fail_capture {
            return Err(SightlineError::Capture {
                message: self.error_message.clone(),
            });
        }

        // Advance past exhausted phases
        while self.phase_index < self.phases.len() && self.phase_remaining == 0 {
            self.phase_index += 1;
            self.phase_remaining = self
                .phases
                .get(self.phase_index)
                .map(|p| p.count)
                .unwrap_or(0);
        }

        let Some(phase) = self.phases.get(self.phase_index) else {
            return Ok(None);
        };
        self.phase_remaining -= 1;

        if phase.pixels.is_empty() {
            return Err(SightlineError::MissingBuffer);
        }

        let frame = Frame::new(
            phase.pixels.clone(),
            self.width,
            self.height,
            self.sequence,
            Instant::now(),
        );
        self.sequence += 1;
        Ok(Some(frame))
    }

    fn is_finite(&self) -> bool {
        !self.live
    }
}

/// Deterministic generated camera for the demo binary.
///
/// Produces a slow-moving brightness ramp so the demo classifier's output
/// changes over time without any hardware.
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    sequence: u64,
    is_started: bool,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            sequence: 0,
            is_started: false,
        }
    }
}

impl Default for SyntheticCamera {
    fn default() -> Self {
        Self::new(defaults::FRAME_WIDTH, defaults::FRAME_HEIGHT)
    }
}

impl CameraSource for SyntheticCamera {
    fn start(&mut self) -> Result<()> {
        self.is_started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.is_started = false;
        Ok(())
    }

    fn capture(&mut self) -> Result<Option<Frame>> {
        if !self.is_started {
            return Ok(None);
        }

        let len = (self.width * self.height) as usize;
        // Brightness sweeps through the full range over 64 frames.
        let base = ((self.sequence % 64) * 4) as u8;
        let pixels: Vec<u8> = (0..len)
            .map(|i| base.wrapping_add((i % 16) as u8))
            .collect();

        let frame = Frame::new(
            pixels,
            self.width,
            self.height,
            self.sequence,
            Instant::now(),
        );
        self.sequence += 1;
        Ok(Some(frame))
    }
}
