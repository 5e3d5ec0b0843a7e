//! Classifier trait and mock implementation.

use crate::error::{Result, SightlineError};
use crate::pipeline::types::FrameBatch;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One ranked classifier output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredClass {
    /// Index into the label table.
    pub index: usize,
    /// Confidence in 0.0..=1.0.
    pub confidence: f32,
}

impl ScoredClass {
    pub fn new(index: usize, confidence: f32) -> Self {
        Self { index, confidence }
    }
}

/// Trait for video classification models.
///
/// This trait allows swapping implementations (real model vs mock).
pub trait Classifier: Send + Sync {
    /// Classify one batch of frames.
    ///
    /// Returns up to top-K ranked classes sorted by descending confidence.
    /// An error means the model produced no result; the caller drops the
    /// cycle.
    fn classify(&self, batch: &FrameBatch) -> Result<Vec<ScoredClass>>;

    /// Name of the loaded model for logging.
    fn name(&self) -> &str;
}

/// Implement Classifier for Arc<T> to allow sharing across threads.
impl<T: Classifier> Classifier for Arc<T> {
    fn classify(&self, batch: &FrameBatch) -> Result<Vec<ScoredClass>> {
        (**self).classify(batch)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Mock classifier for testing.
pub struct MockClassifier {
    name: String,
    rankings: Vec<ScoredClass>,
    should_fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockClassifier {
    /// Create a new mock classifier with a single default ranking.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rankings: vec![ScoredClass::new(0, 1.0)],
            should_fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Configure the rankings every call returns.
    pub fn with_rankings(mut self, rankings: Vec<ScoredClass>) -> Self {
        self.rankings = rankings;
        self
    }

    /// Configure the mock to fail on classify.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Shared counter of classify invocations.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    /// Number of classify invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for MockClassifier {
    fn classify(&self, _batch: &FrameBatch) -> Result<Vec<ScoredClass>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            Err(SightlineError::Inference {
                message: "mock classifier failure".to_string(),
            })
        } else {
            Ok(self.rankings.clone())
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
