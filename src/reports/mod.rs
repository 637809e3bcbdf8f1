//! Analysis report generation
//!
//! A [`Report`] is derived once from the final [`AccumulatorSnapshot`] and
//! rendered either as the plain-text analysis report or as JSON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::stats::AccumulatorSnapshot;

/// On-disk report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// One category line of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLine {
    pub category: String,
    pub percentage: f64,
    pub count: usize,
}

/// Percentage breakdown of a finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub lines: Vec<ReportLine>,
    pub correctness_percentage: f64,
    pub total_processed: usize,
    pub correct_count: usize,
}

impl Report {
    /// Build a report, or `None` when nothing was processed
    pub fn generate(snapshot: &AccumulatorSnapshot) -> Option<Self> {
        if snapshot.total_processed == 0 {
            return None;
        }

        let total = snapshot.total_processed as f64;
        let lines = snapshot
            .counts
            .iter()
            .map(|c| ReportLine {
                category: c.category.clone(),
                percentage: 100.0 * c.count as f64 / total,
                count: c.count,
            })
            .collect();

        Some(Self {
            lines,
            correctness_percentage: 100.0 * snapshot.correct_count as f64 / total,
            total_processed: snapshot.total_processed,
            correct_count: snapshot.correct_count,
        })
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.to_string()),
            ReportFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize report to JSON")
            }
        }
    }

    /// Write the rendered report to `path`, replacing any previous report
    pub fn write_to(&self, path: &Path, format: ReportFormat) -> Result<()> {
        let content = self.render(format)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write report: {}", path.display()))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis Report:")?;
        writeln!(f, "----------------")?;
        for line in &self.lines {
            writeln!(
                f,
                "{}: {:.2}% ({} files)",
                line.category, line.percentage, line.count
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Correctness Score: {:.2}%", self.correctness_percentage)
    }
}
