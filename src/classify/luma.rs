//! Brightness-bucket classifier used by the demo binary.
//!
//! Maps mean frame luminance onto a label range so the end-to-end pipeline
//! can run without a real model. Deterministic: the same batch always yields
//! the same ranking.

use crate::classify::classifier::{Classifier, ScoredClass};
use crate::error::{Result, SightlineError};
use crate::pipeline::types::FrameBatch;

pub struct LumaClassifier {
    /// Total number of classes (must match the label table length).
    classes: usize,
    /// Maximum number of ranked entries to return.
    top_k: usize,
}

impl LumaClassifier {
    pub fn new(classes: usize, top_k: usize) -> Self {
        Self { classes, top_k }
    }

    /// Candidate class order: the primary bucket, then alternating
    /// neighbors (+1, -1, +2, -2, ...), skipping out-of-range indices.
    fn candidates(&self, primary: usize) -> impl Iterator<Item = usize> + '_ {
        let classes = self.classes as isize;
        let primary = primary as isize;
        std::iter::once(0isize)
            .chain((1..classes).flat_map(|d| [d, -d]))
            .map(move |d| primary + d)
            .filter(move |&c| c >= 0 && c < classes)
            .map(|c| c as usize)
    }
}

impl Classifier for LumaClassifier {
    fn classify(&self, batch: &FrameBatch) -> Result<Vec<ScoredClass>> {
        let Some(frame) = batch.frames().first() else {
            return Err(SightlineError::Inference {
                message: "empty batch".to_string(),
            });
        };
        if self.classes == 0 {
            return Err(SightlineError::Inference {
                message: "classifier has no classes".to_string(),
            });
        }

        let luma = frame.mean_luma();
        let primary = ((luma * self.classes as f32) as usize).min(self.classes - 1);

        let mut confidence = 0.9f32;
        let mut rankings = Vec::with_capacity(self.top_k.min(self.classes));
        for index in self.candidates(primary).take(self.top_k) {
            rankings.push(ScoredClass::new(index, confidence));
            confidence *= 0.6;
        }
        Ok(rankings)
    }

    fn name(&self) -> &str {
        "luma"
    }
}
