//! Directory organizing pipeline
//!
//! Discovers documents in a single directory, creates the taxonomy layout,
//! then classifies and relocates every document on a worker pool while the
//! shared accumulator tallies the outcome.

pub mod core;
pub mod discovery;
pub mod types;

pub use self::core::Organizer;
pub use discovery::{build_include_set, discover_documents};
pub use types::{Document, DocumentOutcome, OrganizeOutcome, ReportTarget, RunSummary};
