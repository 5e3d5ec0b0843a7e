//! Data types flowing through the classification pipeline.

use crate::camera::Frame;
use crate::classify::ScoredClass;
use std::time::Duration;

/// Fixed-depth ordered sequence of frames presented to the classifier as one
/// inference unit.
///
/// Batches built by a `BatchStrategy` always have exactly the strategy's
/// depth; frame order is stable.
#[derive(Debug, Clone)]
pub struct FrameBatch {
    frames: Vec<Frame>,
}

impl FrameBatch {
    /// Build a batch from pre-assembled frames.
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    /// Frames in batch order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Temporal depth of the batch.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

/// One successful classification: ranked classes plus measured inference
/// latency. Never empty: an empty classifier output is reported as an
/// inference failure upstream.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Ranked classes, descending confidence, up to top-K entries.
    pub rankings: Vec<ScoredClass>,
    /// Wall-clock duration of the classifier call.
    pub latency: Duration,
}

impl Classification {
    pub fn new(rankings: Vec<ScoredClass>, latency: Duration) -> Self {
        Self { rankings, latency }
    }
}
