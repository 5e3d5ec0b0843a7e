//! Label table mapping class indices to display strings.

use crate::error::{Result, SightlineError};
use std::path::Path;

/// Index-to-string label table.
///
/// The table is expected to cover the classifier's full index range; an
/// out-of-range lookup is a contract violation between model and labels,
/// not a runtime condition to paper over.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Build a table from an iterator of label strings.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Load a table from a file with one label per line.
    ///
    /// Blank lines are skipped; surrounding whitespace is trimmed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|_| SightlineError::LabelFileNotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self::from_lines(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
        ))
    }

    /// Look up a label by class index.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Number of labels in the table.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when the table has no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
