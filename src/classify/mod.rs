//! Rule-based document classification
//!
//! - `classifier`: the three-stage decision (title, file name, overrides)
//! - `oracle`: the filename-only expectation used to score the classifier
//!
//! Both are pure functions over an immutable [`Taxonomy`](crate::taxonomy::Taxonomy)
//! and are safe to share across worker threads.

mod classifier;
mod oracle;

pub use classifier::{Classifier, MatchStage};
pub use oracle::ExpectedOutcomeOracle;

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::taxonomy::GENERAL;

/// A (category, subcategory) decision
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Classification {
    pub category: String,
    pub subcategory: String,
}

impl Classification {
    pub fn new(category: impl Into<String>, subcategory: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subcategory: subcategory.into(),
        }
    }

    /// Category-level decision with no resolved subcategory
    pub fn general(category: impl Into<String>) -> Self {
        Self::new(category, GENERAL)
    }

    pub fn is_general(&self) -> bool {
        self.subcategory == GENERAL
    }

    /// Destination directory relative to the output root
    ///
    /// Unresolved subcategories land directly in the category directory.
    pub fn relative_dir(&self) -> PathBuf {
        let dir = PathBuf::from(&self.category);
        if self.is_general() {
            dir
        } else {
            dir.join(&self.subcategory)
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.subcategory)
    }
}
