//! Extraction orchestrator - cache, fetch, extract, persist.

use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::pipeline::content::ContentExtractor;
use crate::traits::{
    content::ContentFetcher,
    store::{DownloadTextStore, ExtractorCache, ExtractorStore},
};
use crate::types::{
    config::ExtractorArguments,
    download::Download,
    extraction::{DownloadText, ExtractionResult},
};

/// Produces extraction results and download texts for single downloads.
///
/// Cache reads and writes are best-effort: a failing cache is logged and
/// treated as a miss. Fetch, extraction, and persistence failures are
/// returned unchanged, and nothing is persisted after a failure.
#[derive(Clone)]
pub struct Extractor {
    cache: Arc<dyn ExtractorCache>,
    texts: Arc<dyn DownloadTextStore>,
    fetcher: Arc<dyn ContentFetcher>,
    engine: ContentExtractor,
}

impl Extractor {
    /// Create an extractor from separate collaborators.
    pub fn new(
        cache: Arc<dyn ExtractorCache>,
        texts: Arc<dyn DownloadTextStore>,
        fetcher: Arc<dyn ContentFetcher>,
        engine: ContentExtractor,
    ) -> Self {
        Self {
            cache,
            texts,
            fetcher,
            engine,
        }
    }

    /// Create an extractor whose cache and download texts share one store.
    pub fn from_store<S>(store: Arc<S>, fetcher: Arc<dyn ContentFetcher>, engine: ContentExtractor) -> Self
    where
        S: ExtractorStore + 'static,
    {
        Self::new(store.clone(), store, fetcher, engine)
    }

    /// Get the extraction engine.
    pub fn engine(&self) -> &ContentExtractor {
        &self.engine
    }

    /// Extract the content of a download, consulting the cache when enabled.
    #[instrument(skip_all, fields(downloads_id = download.downloads_id))]
    pub async fn extract(
        &self,
        download: &Download,
        args: &ExtractorArguments,
    ) -> Result<ExtractionResult> {
        let downloads_id = download.downloads_id;

        if args.use_cache {
            debug!("Fetching cached extractor results for download {}", downloads_id);
            match self.cache.get(downloads_id).await {
                Ok(Some(results)) => return Ok(results),
                Ok(None) => {}
                Err(e) => warn!(
                    "Extractor cache lookup failed for download {}, extracting anyway: {}",
                    downloads_id, e
                ),
            }
        }

        debug!("Fetching content for download {}", downloads_id);
        let content = self.fetcher.fetch_content(download).await?;

        debug!(
            "Extracting {} characters of content for download {}",
            content.chars().count(),
            downloads_id
        );
        let results = self.engine.extract_content(&content)?;

        if args.use_cache {
            debug!("Caching extractor results for download {}", downloads_id);
            if let Err(e) = self.cache.put(downloads_id, &results).await {
                warn!(
                    "Failed to cache extractor results for download {}: {}",
                    downloads_id, e
                );
            }
        }

        Ok(results)
    }

    /// Return the download's text, extracting and persisting it if needed.
    ///
    /// With `use_existing`, a persisted download text is returned without
    /// extracting. The cache is only consulted when no text was reused.
    #[instrument(skip_all, fields(downloads_id = download.downloads_id))]
    pub async fn extract_and_create_download_text(
        &self,
        download: &Download,
        args: &ExtractorArguments,
    ) -> Result<DownloadText> {
        let downloads_id = download.downloads_id;

        if args.use_existing {
            debug!("Fetching download text for download {}", downloads_id);
            if let Some(existing) = self.texts.get_download_text(downloads_id).await? {
                debug!("Reusing download text for download {}", downloads_id);
                return Ok(existing);
            }
        }

        debug!("Extracting download {}", downloads_id);
        let results = self.extract(download, args).await?;

        debug!("Creating download text for download {}", downloads_id);
        self.texts.create_download_text(download, &results).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::{EvictionPolicy, MemoryStore};
    use crate::testing::{
        FailingCache, FailingDownloadTexts, MockBoilerplateRemover, MockContentFetcher,
        MockHtmlStripper,
    };
    use crate::ExtractorError;

    const PAGE: &str = "<html><body><article><p>Council approves budget</p></article></body></html>";

    struct Harness {
        store: Arc<MemoryStore>,
        fetcher: Arc<MockContentFetcher>,
        remover: Arc<MockBoilerplateRemover>,
        stripper: Arc<MockHtmlStripper>,
        extractor: Extractor,
    }

    fn harness() -> Harness {
        let store = Arc::new(MemoryStore::with_policy(EvictionPolicy::never(1_000)));
        let fetcher = Arc::new(MockContentFetcher::new().with_content(1, PAGE));
        let remover = Arc::new(MockBoilerplateRemover::new());
        let stripper = Arc::new(MockHtmlStripper::new());
        let engine = ContentExtractor::new(remover.clone(), stripper.clone());
        let extractor = Extractor::from_store(store.clone(), fetcher.clone(), engine);
        Harness {
            store,
            fetcher,
            remover,
            stripper,
            extractor,
        }
    }

    fn download() -> Download {
        Download::new(1, 100, "https://example.com/budget")
    }

    #[tokio::test]
    async fn test_second_extract_hits_cache() {
        let h = harness();
        let args = ExtractorArguments::default();

        let first = h.extractor.extract(&download(), &args).await.unwrap();
        let second = h.extractor.extract(&download(), &args).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(h.fetcher.call_count(), 1);
        assert_eq!(h.remover.call_count(), 1);
        assert_eq!(h.stripper.call_count(), 1);
        assert_eq!(h.store.cache_entries().len(), 1);
    }

    #[tokio::test]
    async fn test_cache_disabled_always_recomputes() {
        let h = harness();
        let args = ExtractorArguments::default().with_cache(false);

        h.extractor.extract(&download(), &args).await.unwrap();
        h.extractor.extract(&download(), &args).await.unwrap();

        assert_eq!(h.fetcher.call_count(), 2);
        assert!(h.store.cache_entries().is_empty());
    }

    #[tokio::test]
    async fn test_failing_cache_degrades_to_miss() {
        let fetcher = Arc::new(MockContentFetcher::new().with_content(1, "plain"));
        let extractor = Extractor::new(
            Arc::new(FailingCache::new()),
            Arc::new(MemoryStore::new()),
            fetcher.clone(),
            ContentExtractor::default(),
        );

        let result = extractor
            .extract(&download(), &ExtractorArguments::default())
            .await
            .unwrap();

        assert_eq!(result, ExtractionResult::passthrough("plain"));
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates_without_caching() {
        let h = harness();
        let missing = Download::new(2, 100, "https://example.com/missing");

        let err = h
            .extractor
            .extract(&missing, &ExtractorArguments::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractorError::DownloadNotFound { downloads_id: 2 }));
        assert!(h.store.cache_entries().is_empty());
    }

    #[tokio::test]
    async fn test_existing_text_skips_extraction() {
        let h = harness();
        let existing = h
            .store
            .create_download_text(&download(), &ExtractionResult::passthrough("stored"))
            .await
            .unwrap();

        let text = h
            .extractor
            .extract_and_create_download_text(&download(), &ExtractorArguments::default())
            .await
            .unwrap();

        assert_eq!(text, existing);
        assert_eq!(h.fetcher.call_count(), 0);
        assert_eq!(h.remover.call_count(), 0);
        assert_eq!(h.stripper.call_count(), 0);
    }

    #[tokio::test]
    async fn test_use_existing_false_recreates_text() {
        let h = harness();
        h.store
            .create_download_text(&download(), &ExtractionResult::passthrough("stale"))
            .await
            .unwrap();

        let args = ExtractorArguments::default().with_existing(false);
        let text = h
            .extractor
            .extract_and_create_download_text(&download(), &args)
            .await
            .unwrap();

        assert_eq!(text.download_text, "Council approves budget");
        assert_eq!(h.fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_persist_failure_leaves_no_text() {
        let fetcher = Arc::new(MockContentFetcher::new().with_content(1, PAGE));
        let texts = Arc::new(FailingDownloadTexts::new());
        let extractor = Extractor::new(
            Arc::new(MemoryStore::new()),
            texts.clone(),
            fetcher,
            ContentExtractor::default(),
        );

        let err = extractor
            .extract_and_create_download_text(&download(), &ExtractorArguments::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractorError::Persist(_)));
        assert!(texts.get_download_text(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_creates_no_text() {
        let h = harness();
        let missing = Download::new(2, 100, "https://example.com/missing");

        let result = h
            .extractor
            .extract_and_create_download_text(&missing, &ExtractorArguments::default())
            .await;

        assert!(result.is_err());
        assert_eq!(h.store.download_text_count(), 0);
    }
}
