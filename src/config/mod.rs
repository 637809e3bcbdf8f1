//! Configuration management for docsorter
//!
//! Configuration is layered with figment (see [`core`]) and extracted into the
//! typed sections below. The embedded `default-config.toml` provides every
//! value, so a missing user or project file is never an error.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

pub mod core;

pub use self::core::ConfigLoader;

use crate::relocate::ConflictPolicy;
use crate::reports::ReportFormat;
use crate::taxonomy::{Taxonomy, TaxonomyConfig};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsorterConfig {
    pub organize: OrganizeConfig,
    pub relocate: RelocateConfig,
    pub report: ReportConfig,
    pub taxonomy: TaxonomyConfig,
}

/// Document discovery and worker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizeConfig {
    /// Maximum worker threads (0 = one per CPU core)
    pub workers: usize,

    /// Glob patterns selecting documents, matched case-insensitively
    pub include_patterns: Vec<String>,

    /// Read document metadata before falling back to file names
    #[serde(default = "default_metadata")]
    pub metadata: bool,
}

fn default_metadata() -> bool {
    true
}

/// Relocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelocateConfig {
    #[serde(default)]
    pub on_conflict: ConflictPolicy,
}

/// Report output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// File name of the report, written into the organized directory
    pub file_name: String,

    #[serde(default)]
    pub format: ReportFormat,
}

impl DocsorterConfig {
    /// Only the embedded defaults
    pub fn defaults() -> Result<Self> {
        ConfigLoader::defaults_only().extract()
    }

    /// Check the settings and build the validated taxonomy
    pub fn validate(&self) -> Result<Taxonomy> {
        if self.organize.include_patterns.is_empty() {
            bail!("organize.include_patterns must contain at least one pattern");
        }

        let file_name = self.report.file_name.trim();
        if file_name.is_empty() {
            bail!("report.file_name cannot be empty");
        }
        if file_name.contains('/') || file_name.contains('\\') {
            bail!("report.file_name must be a plain file name, got '{}'", file_name);
        }

        Taxonomy::from_config(self.taxonomy.clone())
    }
}
