//! Batch assembly: shaping one frame into the classifier's input unit.

use crate::camera::Frame;
use crate::defaults;
use crate::pipeline::types::FrameBatch;

/// Strategy for assembling the fixed-depth batch the classifier expects.
///
/// Pluggable so that a real temporal sampler can replace frame duplication
/// without touching the pipeline wiring.
pub trait BatchStrategy: Send {
    /// Expand one frame into a batch of exactly `depth()` frames.
    fn assemble(&self, frame: Frame) -> FrameBatch;

    /// Temporal depth of assembled batches.
    fn depth(&self) -> usize;
}

/// Duplicates the current frame to the required depth.
///
/// This matches the model's historical input contract: the batch is the
/// single live frame doubled repeatedly (1 → 2 → 4), in stable order. It is
/// a shape adaptation, not genuine temporal sampling, and is kept
/// deliberately: switching to true multi-frame buffering would change
/// observable behavior.
#[derive(Debug, Clone, Copy)]
pub struct DuplicateBatcher {
    depth: usize,
}

impl DuplicateBatcher {
    pub fn new(depth: usize) -> Self {
        Self { depth }
    }
}

impl Default for DuplicateBatcher {
    fn default() -> Self {
        Self::new(defaults::BATCH_DEPTH)
    }
}

impl BatchStrategy for DuplicateBatcher {
    fn assemble(&self, frame: Frame) -> FrameBatch {
        let mut frames = vec![frame];
        while frames.len() < self.depth {
            // Double in place; truncate handles non-power-of-two depths.
            frames.extend_from_within(..);
        }
        frames.truncate(self.depth);
        FrameBatch::from_frames(frames)
    }

    fn depth(&self) -> usize {
        self.depth
    }
}
