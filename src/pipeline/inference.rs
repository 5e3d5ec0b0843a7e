//! Timed invocation of the external classifier.

use crate::classify::Classifier;
use crate::error::{Result, SightlineError};
use crate::pipeline::clock::Clock;
use crate::pipeline::types::{Classification, FrameBatch};
use std::sync::Arc;

/// Wraps the external classifier with wall-clock latency measurement.
///
/// The classifier is assumed synchronous and bounded. `run` is only ever
/// called from the capture thread, which blocks for the duration of the
/// call; that single caller is what keeps inference at most-one-in-flight,
/// with newer frames dropped by the rate limiter while it runs.
pub struct InferenceOrchestrator {
    classifier: Arc<dyn Classifier>,
    clock: Arc<dyn Clock>,
}

impl InferenceOrchestrator {
    pub fn new(classifier: Arc<dyn Classifier>, clock: Arc<dyn Clock>) -> Self {
        Self { classifier, clock }
    }

    /// Invoke the classifier on one batch, measuring latency.
    ///
    /// An empty ranking from the classifier counts as a failure: a
    /// `Classification` is never partially filled.
    pub fn run(&self, batch: &FrameBatch) -> Result<Classification> {
        let start = self.clock.now();
        let rankings = self.classifier.classify(batch)?;
        let latency = self.clock.now().saturating_duration_since(start);

        if rankings.is_empty() {
            return Err(SightlineError::Inference {
                message: format!("classifier `{}` returned no result", self.classifier.name()),
            });
        }
        Ok(Classification::new(rankings, latency))
    }
}
