use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::classify::{Classification, MatchStage};
use crate::parallel::PoolSummary;
use crate::reports::{Report, ReportFormat};
use crate::stats::AccumulatorSnapshot;

/// A document waiting to be organized, identified by its path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Document {
    pub path: PathBuf,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File name used for classification
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

/// What happened to one successfully organized document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    pub classification: Classification,
    pub expected: Classification,
    pub stage: MatchStage,
    pub destination: PathBuf,
    pub correct: bool,
}

/// Where and how the report is persisted
#[derive(Debug, Clone)]
pub struct ReportTarget {
    pub file_name: String,
    pub format: ReportFormat,
}

impl ReportTarget {
    pub fn path_in(&self, root: &Path) -> PathBuf {
        root.join(&self.file_name)
    }
}

/// Result of processing every discovered document
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub pool: PoolSummary,
    pub snapshot: AccumulatorSnapshot,
    /// `None` when no document was accounted for
    pub report: Option<Report>,
}

/// End state of a full organize run
#[derive(Debug)]
pub enum OrganizeOutcome {
    /// Nothing matched the include patterns; no directories or report created
    NoDocuments,
    /// Documents were found but every one of them failed
    NothingProcessed(RunSummary),
    /// At least one document was organized and the report produced
    Reported {
        summary: RunSummary,
        report: Report,
        /// `None` when the report was not persisted (dry run)
        report_path: Option<PathBuf>,
    },
}
