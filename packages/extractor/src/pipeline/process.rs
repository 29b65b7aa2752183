//! Completion tracking - extract one download, then process the story once
//! none of its content downloads remain unextracted.
//!
//! The "anything left?" check and the story trigger are not atomic. Two
//! sibling downloads finishing together can both see zero remaining and
//! both trigger story processing, so delivery is at-least-once.

use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::error::{ExtractorError, Result};
use crate::pipeline::{content::ContentExtractor, extract::Extractor};
use crate::traits::{
    content::ContentFetcher,
    store::{DownloadStore, ExtractorStore},
    story::StoryProcessor,
};
use crate::types::{config::ExtractorArguments, download::Download};

/// What happened to the owning story after a download was extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Other content downloads of the story still await extraction.
    Pending { stories_id: i64, remaining: usize },

    /// The story was complete and has been handed to story processing.
    StoryProcessed { stories_id: i64 },
}

impl CompletionOutcome {
    pub fn is_story_processed(&self) -> bool {
        matches!(self, Self::StoryProcessed { .. })
    }
}

/// Runs extraction for one download and fires story processing on completion.
#[derive(Clone)]
pub struct CompletionTracker {
    extractor: Extractor,
    downloads: Arc<dyn DownloadStore>,
    processor: Arc<dyn StoryProcessor>,
}

impl CompletionTracker {
    pub fn new(
        extractor: Extractor,
        downloads: Arc<dyn DownloadStore>,
        processor: Arc<dyn StoryProcessor>,
    ) -> Self {
        Self {
            extractor,
            downloads,
            processor,
        }
    }

    /// Wire a tracker where one store provides cache, texts, and downloads.
    pub fn from_store<S>(
        store: Arc<S>,
        fetcher: Arc<dyn ContentFetcher>,
        engine: ContentExtractor,
        processor: Arc<dyn StoryProcessor>,
    ) -> Self
    where
        S: ExtractorStore + 'static,
    {
        let extractor = Extractor::from_store(store.clone(), fetcher, engine);
        Self::new(extractor, store, processor)
    }

    /// Get the underlying extractor.
    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Extract `download`, create its download text, and process the story
    /// if this was its last unextracted content download.
    #[instrument(
        skip_all,
        fields(downloads_id = download.downloads_id, stories_id = download.stories_id)
    )]
    pub async fn process_download_for_extractor(
        &self,
        download: &Download,
        args: &ExtractorArguments,
    ) -> Result<CompletionOutcome> {
        let stories_id = download.stories_id;
        debug!(
            "extract: {} {} {}",
            download.downloads_id, stories_id, download.url
        );

        self.extractor
            .extract_and_create_download_text(download, args)
            .await?;

        let remaining = self
            .downloads
            .unextracted_content_downloads(stories_id)
            .await?;

        if !remaining.is_empty() {
            info!(
                "Pending more downloads for story {} ({} remaining)",
                stories_id,
                remaining.len()
            );
            return Ok(CompletionOutcome::Pending {
                stories_id,
                remaining: remaining.len(),
            });
        }

        let story = self
            .downloads
            .get_story(stories_id)
            .await?
            .ok_or(ExtractorError::StoryNotFound { stories_id })?;

        info!("All downloads extracted, processing story {}", stories_id);
        self.processor.process_extracted_story(&story, args).await?;

        Ok(CompletionOutcome::StoryProcessed { stories_id })
    }

    /// Load a download by id and process it.
    pub async fn process_download_id(
        &self,
        downloads_id: i64,
        args: &ExtractorArguments,
    ) -> Result<CompletionOutcome> {
        let download = self
            .downloads
            .get_download(downloads_id)
            .await?
            .ok_or(ExtractorError::DownloadNotFound { downloads_id })?;

        self.process_download_for_extractor(&download, args).await
    }
}
