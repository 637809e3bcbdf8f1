//! Document metadata extraction
//!
//! Metadata is a flat key/value map. Keys follow the PDF Info dictionary
//! names without the leading slash (`Title`, `Author`, `Subject`, ...).
//!
//! Extraction failures are never fatal for the pipeline: callers log them and
//! continue with file-name-only classification.

use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

mod pdf;

pub use pdf::PdfMetadataExtractor;

/// Key/value metadata read from a document
pub type Metadata = HashMap<String, String>;

/// Key holding the document title
pub const TITLE_KEY: &str = "Title";

/// Title of a document, if present and non-blank
pub fn title(metadata: &Metadata) -> Option<&str> {
    metadata
        .get(TITLE_KEY)
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
}

/// Source of per-document metadata
pub trait MetadataExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<Metadata>;
}

/// Extractor that never reads anything (file-name-only classification)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl MetadataExtractor for NoMetadata {
    fn extract(&self, _path: &Path) -> Result<Metadata> {
        Ok(Metadata::new())
    }
}

impl<F> MetadataExtractor for F
where
    F: Fn(&Path) -> Result<Metadata> + Send + Sync,
{
    fn extract(&self, path: &Path) -> Result<Metadata> {
        self(path)
    }
}

/// Run an extractor, turning failures into absent metadata
pub fn extract_or_none(extractor: &dyn MetadataExtractor, path: &Path) -> Option<Metadata> {
    match extractor.extract(path) {
        Ok(metadata) => Some(metadata),
        Err(e) => {
            tracing::warn!("Error reading metadata from {}: {:#}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_lookup() {
        let mut metadata = Metadata::new();
        assert_eq!(title(&metadata), None);

        metadata.insert(TITLE_KEY.to_string(), "   ".to_string());
        assert_eq!(title(&metadata), None);

        metadata.insert(TITLE_KEY.to_string(), " Calculus Made Easy ".to_string());
        assert_eq!(title(&metadata), Some("Calculus Made Easy"));
    }

    #[test]
    fn test_failures_become_none() {
        let failing = |_: &Path| -> Result<Metadata> { anyhow::bail!("corrupt xref table") };
        assert!(extract_or_none(&failing, Path::new("broken.pdf")).is_none());

        assert_eq!(
            extract_or_none(&NoMetadata, Path::new("any.pdf")),
            Some(Metadata::new())
        );
    }
}
