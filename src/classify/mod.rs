//! Classifier seam and label handling.

pub mod classifier;
pub mod labels;
pub mod luma;

pub use classifier::{Classifier, MockClassifier, ScoredClass};
pub use labels::LabelTable;
pub use luma::LumaClassifier;
