//! Storage traits for cached results, download texts, and downloads.
//!
//! The storage layer is split into focused traits:
//! - `ExtractorCache`: Best-effort cache of extraction results
//! - `DownloadTextStore`: Durable extraction output per download
//! - `DownloadStore`: Downloads and stories (read-only to the extractor)
//! - `ExtractorStore`: Composite trait combining all three

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::Result;
use crate::stores::eviction::EvictionPolicy;
use crate::types::{
    download::{Download, Story},
    extraction::{DownloadText, ExtractionResult},
};

/// Cache of extraction results keyed by download id.
///
/// The cache only saves recomputation. Losing any row, or the whole
/// cache, must never change what extraction returns.
#[async_trait]
pub trait ExtractorCache: Send + Sync {
    /// Newest cached result for a download, if any.
    async fn get_cached(&self, downloads_id: i64) -> Result<Option<ExtractionResult>>;

    /// Insert a new row and return its cache id.
    ///
    /// Existing rows for the same download are left in place.
    async fn insert_cached(&self, downloads_id: i64, result: &ExtractionResult) -> Result<i64>;

    /// Delete every row beyond the newest `keep` rows (by cache id).
    ///
    /// Returns the number of rows removed.
    async fn trim_cache(&self, keep: usize) -> Result<usize>;

    /// Number of rows currently cached.
    async fn cache_len(&self) -> Result<usize>;

    /// Policy deciding when `put` trims the cache.
    fn eviction_policy(&self) -> &EvictionPolicy;

    /// Look up a cached result, logging the hit or miss.
    async fn get(&self, downloads_id: i64) -> Result<Option<ExtractionResult>> {
        let cached = self.get_cached(downloads_id).await?;
        if cached.is_some() {
            debug!(downloads_id, "extractor cache hit");
        } else {
            debug!(downloads_id, "extractor cache miss");
        }
        Ok(cached)
    }

    /// Store a result, occasionally trimming the cache first.
    async fn put(&self, downloads_id: i64, result: &ExtractionResult) -> Result<()> {
        let policy = self.eviction_policy();
        if policy.should_sweep() {
            let removed = self.trim_cache(policy.max_entries()).await?;
            info!(
                removed,
                max_entries = policy.max_entries(),
                "trimmed extractor cache"
            );
        }

        let cache_id = self.insert_cached(downloads_id, result).await?;
        debug!(downloads_id, cache_id, "cached extractor results");
        Ok(())
    }
}

/// Durable download text records.
#[async_trait]
pub trait DownloadTextStore: Send + Sync {
    /// Existing download text for a download, if one was persisted.
    async fn get_download_text(&self, downloads_id: i64) -> Result<Option<DownloadText>>;

    /// Persist the extracted text of `result` for `download`.
    ///
    /// Implementations mark the download as extracted in the same step.
    async fn create_download_text(
        &self,
        download: &Download,
        result: &ExtractionResult,
    ) -> Result<DownloadText>;
}

/// Read access to downloads and stories.
#[async_trait]
pub trait DownloadStore: Send + Sync {
    /// Get a download by id.
    async fn get_download(&self, downloads_id: i64) -> Result<Option<Download>>;

    /// Content downloads of a story that are not yet extracted.
    async fn unextracted_content_downloads(&self, stories_id: i64) -> Result<Vec<Download>>;

    /// Get a story by id.
    async fn get_story(&self, stories_id: i64) -> Result<Option<Story>>;
}

/// Composite storage trait combining all three stores.
pub trait ExtractorStore: ExtractorCache + DownloadTextStore + DownloadStore {}

// Blanket implementation: anything implementing all three traits is an ExtractorStore
impl<T: ExtractorCache + DownloadTextStore + DownloadStore> ExtractorStore for T {}
