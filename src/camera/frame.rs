//! Raw camera frame type.

use std::sync::Arc;
use std::time::Instant;

/// One captured camera frame.
///
/// Pixel data is shared behind an `Arc` so a frame can appear several times
/// in a batch without copying the buffer. The pipeline holds a frame for at
/// most one processing cycle; nothing retains it past dispatch.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel buffer (8-bit grayscale, row-major).
    pub pixels: Arc<[u8]>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Sequence number for ordering and gap detection.
    pub sequence: u64,
    /// Capture timestamp; rate-limiter admission is keyed on this.
    pub timestamp: Instant,
}

impl Frame {
    /// Creates a new frame from a pixel buffer.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, sequence: u64, timestamp: Instant) -> Self {
        Self {
            pixels: pixels.into(),
            width,
            height,
            sequence,
            timestamp,
        }
    }

    /// Number of pixels in the buffer.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// True when the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Mean luminance of the frame, 0.0 (black) to 1.0 (white).
    pub fn mean_luma(&self) -> f32 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.pixels.iter().map(|&p| u64::from(p)).sum();
        sum as f32 / (self.pixels.len() as f32 * 255.0)
    }
}
