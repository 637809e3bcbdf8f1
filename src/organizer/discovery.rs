use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::Path;

use super::types::Document;

/// Compile include patterns into a case-insensitive glob set
pub fn build_include_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .with_context(|| format!("Invalid include pattern: {}", pattern))?;
        builder.add(glob);
    }
    builder.build().context("Failed to compile include patterns")
}

/// Non-recursive listing of the documents directly inside `root`
///
/// Hidden entries and subdirectories are skipped. Results are sorted by file
/// name so queue order is stable between runs.
pub fn discover_documents(root: &Path, include_patterns: &[String]) -> Result<Vec<Document>> {
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    let include = build_include_set(include_patterns)?;

    let walker = WalkBuilder::new(root)
        .max_depth(Some(1))
        .standard_filters(false)
        .hidden(true)
        .follow_links(false)
        .build();

    let mut documents = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Walk error in {}: {}", root.display(), e);
                continue;
            }
        };

        if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        if include.is_match(entry.file_name()) {
            documents.push(Document::new(entry.into_path()));
        }
    }

    documents.sort_by_key(|d| d.file_name());
    tracing::info!("discovered {} documents in {}", documents.len(), root.display());
    Ok(documents)
}
