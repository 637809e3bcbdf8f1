//! # docsorter - concurrent rule-based document organizer
//!
//! docsorter classifies every document in a directory into a two-level
//! category taxonomy, moves it into the matching folder and writes an
//! analysis report with the category distribution and a correctness score.
//!
//! - **Classification**: metadata title, then file name, then a prioritized
//!   override table that has the final say
//! - **Parallel relocation**: a fixed worker pool drains a shared work queue;
//!   relocation and accounting happen in one critical section
//! - **Layered configuration**: embedded defaults, user and project files,
//!   `DOCSORTER_*` environment variables
//!
//! ## Quick Start
//!
//! ```bash
//! # Organize ./papers and write ./papers/report.txt
//! docsorter organize papers
//!
//! # See how a file name would be classified
//! docsorter classify intro_to_machine_learning.pdf
//! ```
//!
//! ## Library use
//!
//! ```no_run
//! use docsorter::metadata::PdfMetadataExtractor;
//! use docsorter::organizer::{Organizer, ReportTarget};
//! use docsorter::relocate::LocalMover;
//! use docsorter::reports::ReportFormat;
//! use docsorter::taxonomy::Taxonomy;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let taxonomy = Taxonomy::builtin()?;
//! let mover = LocalMover::default();
//! let organizer = Organizer::new(&taxonomy, &PdfMetadataExtractor, &mover, 4);
//! let target = ReportTarget { file_name: "report.txt".into(), format: ReportFormat::Text };
//!
//! organizer.organize(Path::new("papers"), &["*.pdf".to_string()], Some(&target), |_, _| {})?;
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod cli;
pub mod config;
pub mod metadata;
pub mod organizer;
pub mod parallel;
pub mod relocate;
pub mod reports;
pub mod stats;
pub mod taxonomy;

pub use cli::{Cli, Output};
pub use config::DocsorterConfig;

/// Result type alias for docsorter operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
