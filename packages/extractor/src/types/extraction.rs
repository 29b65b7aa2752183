//! Extraction outputs - transient results and durable download texts.

use serde::{Deserialize, Serialize};

/// Output of extracting one download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Substantive article HTML with boilerplate removed
    pub extracted_html: String,

    /// Plain text form of `extracted_html`
    pub extracted_text: String,
}

impl ExtractionResult {
    pub fn new(extracted_html: impl Into<String>, extracted_text: impl Into<String>) -> Self {
        Self {
            extracted_html: extracted_html.into(),
            extracted_text: extracted_text.into(),
        }
    }

    /// A result that carries the content through unchanged.
    pub fn passthrough(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            extracted_html: content.clone(),
            extracted_text: content,
        }
    }
}

/// A cached extraction row.
///
/// Rows are never updated. Several rows may exist for one download;
/// the one with the highest `cache_id` is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub cache_id: i64,
    pub downloads_id: i64,
    pub extracted_html: String,
    pub extracted_text: String,
}

impl CacheEntry {
    pub fn into_result(self) -> ExtractionResult {
        ExtractionResult {
            extracted_html: self.extracted_html,
            extracted_text: self.extracted_text,
        }
    }
}

/// The durable, final extraction output for a download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadText {
    pub download_texts_id: i64,
    pub downloads_id: i64,
    pub download_text: String,
    pub download_text_length: usize,
}

impl DownloadText {
    pub fn new(download_texts_id: i64, downloads_id: i64, download_text: impl Into<String>) -> Self {
        let download_text = download_text.into();
        Self {
            download_texts_id,
            downloads_id,
            download_text_length: download_text.chars().count(),
            download_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_duplicates_content() {
        let result = ExtractionResult::passthrough("ok");
        assert_eq!(result.extracted_html, "ok");
        assert_eq!(result.extracted_text, "ok");
    }

    #[test]
    fn test_download_text_length_counts_chars() {
        let text = DownloadText::new(1, 2, "héllo");
        assert_eq!(text.download_text_length, 5);
    }
}
