//! Extraction engine - decide whether content needs extracting, then extract.
//!
//! Running boilerplate removal on tiny payloads with no markup (plain text,
//! error stubs) wastes time and tends to mangle them, so content shorter
//! than the minimum length with no tag-like substring passes through
//! unchanged. The probe is a length check plus one regex match, not a parse.

use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info};

use crate::error::Result;
use crate::html::{DomHtmlStripper, TagPruningRemover};
use crate::traits::html::{BoilerplateRemover, HtmlStripper};
use crate::types::{
    config::{ExtractorConfig, MIN_CONTENT_LENGTH_TO_EXTRACT},
    extraction::ExtractionResult,
};

/// Anything that looks like a tag: `<`, then `>` later on the same line.
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<.*>").unwrap());

/// Whether `content` should go through full extraction.
pub fn should_extract(content: &str, min_content_length: usize) -> bool {
    content.chars().count() >= min_content_length || HTML_TAG.is_match(content)
}

/// Turns raw page content into an [`ExtractionResult`].
#[derive(Clone)]
pub struct ContentExtractor {
    remover: Arc<dyn BoilerplateRemover>,
    stripper: Arc<dyn HtmlStripper>,
    min_content_length: usize,
}

impl ContentExtractor {
    /// Create an engine with the given HTML collaborators.
    pub fn new(remover: Arc<dyn BoilerplateRemover>, stripper: Arc<dyn HtmlStripper>) -> Self {
        Self {
            remover,
            stripper,
            min_content_length: MIN_CONTENT_LENGTH_TO_EXTRACT,
        }
    }

    /// Create an engine using the DOM-based reference collaborators.
    pub fn with_reference_html() -> Self {
        Self::new(Arc::new(TagPruningRemover), Arc::new(DomHtmlStripper))
    }

    /// Apply thresholds from configuration.
    pub fn with_config(mut self, config: &ExtractorConfig) -> Self {
        self.min_content_length = config.min_content_length;
        self
    }

    /// Set the minimum length that always triggers extraction.
    pub fn with_min_content_length(mut self, len: usize) -> Self {
        self.min_content_length = len;
        self
    }

    pub fn min_content_length(&self) -> usize {
        self.min_content_length
    }

    /// Extract article HTML and text from `content`.
    pub fn extract_content(&self, content: &str) -> Result<ExtractionResult> {
        if !should_extract(content, self.min_content_length) {
            info!(
                "Content length is less than {} and has no HTML so skipping extraction",
                self.min_content_length
            );
            return Ok(ExtractionResult::passthrough(content));
        }

        let extracted_html = self.remover.extract_article(content)?;
        let extracted_text = self.stripper.strip(&extracted_html)?;
        debug!(
            "Extracted {} characters of text from {} characters of content",
            extracted_text.chars().count(),
            content.chars().count()
        );

        Ok(ExtractionResult {
            extracted_html,
            extracted_text,
        })
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::with_reference_html()
    }
}
