use anyhow::{Context, Result};
use lopdf::{Document, Object};
use std::path::Path;

use super::{Metadata, MetadataExtractor};

/// Reads the Info dictionary (title, author, ...) of a PDF file
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfMetadataExtractor;

impl MetadataExtractor for PdfMetadataExtractor {
    fn extract(&self, path: &Path) -> Result<Metadata> {
        let document = Document::load(path)
            .with_context(|| format!("Failed to parse PDF: {}", path.display()))?;

        let mut metadata = Metadata::new();

        // Documents without an Info dictionary simply have no metadata
        let Ok(info) = document.trailer.get(b"Info") else {
            return Ok(metadata);
        };
        let (_, info) = document
            .dereference(info)
            .context("Broken reference to PDF Info dictionary")?;
        let info = info.as_dict().context("PDF Info entry is not a dictionary")?;

        for (key, value) in info.iter() {
            let Ok((_, value)) = document.dereference(value) else {
                continue;
            };
            if let Some(text) = text_value(value) {
                let key = String::from_utf8_lossy(key);
                metadata.insert(key.trim_start_matches('/').to_string(), text);
            }
        }

        Ok(metadata)
    }
}

fn text_value(object: &Object) -> Option<String> {
    match object {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

/// Decode a PDF text string (UTF-16BE with BOM, UTF-8, or PDFDocEncoding)
pub(crate) fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE_u8, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xEF_u8, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(rest).into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        // Latin-1 is close enough to PDFDocEncoding for matching purposes
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
