//! Command implementations for the docsorter CLI
//!
//! Each command owns its clap `Args` struct and an async `execute` entry point.

use anyhow::Result;

use crate::config::{ConfigLoader, DocsorterConfig};
use crate::taxonomy::Taxonomy;

pub mod classify;
pub mod config;
pub mod organize;
pub mod taxonomy;
pub mod version;

/// Load the merged configuration and build its validated taxonomy
pub(crate) fn load_validated(loader: &ConfigLoader) -> Result<(DocsorterConfig, Taxonomy)> {
    let config = loader.extract()?;
    let taxonomy = config.validate()?;
    Ok((config, taxonomy))
}
