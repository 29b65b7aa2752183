//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use crate::error::Result;
use crate::stores::eviction::EvictionPolicy;
use crate::traits::store::{DownloadStore, DownloadTextStore, ExtractorCache};
use crate::types::{
    download::{Download, Story},
    extraction::{CacheEntry, DownloadText, ExtractionResult},
};

/// In-memory storage for cached results, download texts, downloads, and stories.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
pub struct MemoryStore {
    /// Cache rows in ascending `cache_id` order
    cache: RwLock<Vec<CacheEntry>>,
    next_cache_id: AtomicI64,
    policy: EvictionPolicy,

    download_texts: RwLock<HashMap<i64, DownloadText>>,
    next_download_text_id: AtomicI64,

    downloads: RwLock<HashMap<i64, Download>>,
    stories: RwLock<HashMap<i64, Story>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty memory store with the default eviction policy.
    pub fn new() -> Self {
        Self::with_policy(EvictionPolicy::default())
    }

    /// Create a new empty memory store with a custom eviction policy.
    pub fn with_policy(policy: EvictionPolicy) -> Self {
        Self {
            cache: RwLock::new(Vec::new()),
            next_cache_id: AtomicI64::new(1),
            policy,
            download_texts: RwLock::new(HashMap::new()),
            next_download_text_id: AtomicI64::new(1),
            downloads: RwLock::new(HashMap::new()),
            stories: RwLock::new(HashMap::new()),
        }
    }

    /// Add or replace a story.
    pub fn add_story(&self, story: Story) {
        self.stories.write().unwrap().insert(story.stories_id, story);
    }

    /// Add or replace a download.
    pub fn add_download(&self, download: Download) {
        self.downloads
            .write()
            .unwrap()
            .insert(download.downloads_id, download);
    }

    /// Snapshot of all cache rows, oldest first.
    pub fn cache_entries(&self) -> Vec<CacheEntry> {
        self.cache.read().unwrap().clone()
    }

    /// Get the number of stored download texts.
    pub fn download_text_count(&self) -> usize {
        self.download_texts.read().unwrap().len()
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.cache.write().unwrap().clear();
        self.download_texts.write().unwrap().clear();
        self.downloads.write().unwrap().clear();
        self.stories.write().unwrap().clear();
    }
}

#[async_trait]
impl ExtractorCache for MemoryStore {
    async fn get_cached(&self, downloads_id: i64) -> Result<Option<ExtractionResult>> {
        Ok(self
            .cache
            .read()
            .unwrap()
            .iter()
            .rev()
            .find(|entry| entry.downloads_id == downloads_id)
            .cloned()
            .map(CacheEntry::into_result))
    }

    async fn insert_cached(&self, downloads_id: i64, result: &ExtractionResult) -> Result<i64> {
        let mut cache = self.cache.write().unwrap();
        // Allocate under the write lock so rows stay sorted by id.
        let cache_id = self.next_cache_id.fetch_add(1, Ordering::SeqCst);
        cache.push(CacheEntry {
            cache_id,
            downloads_id,
            extracted_html: result.extracted_html.clone(),
            extracted_text: result.extracted_text.clone(),
        });
        Ok(cache_id)
    }

    async fn trim_cache(&self, keep: usize) -> Result<usize> {
        let mut cache = self.cache.write().unwrap();
        let excess = cache.len().saturating_sub(keep);
        cache.drain(..excess);
        Ok(excess)
    }

    async fn cache_len(&self) -> Result<usize> {
        Ok(self.cache.read().unwrap().len())
    }

    fn eviction_policy(&self) -> &EvictionPolicy {
        &self.policy
    }
}

#[async_trait]
impl DownloadTextStore for MemoryStore {
    async fn get_download_text(&self, downloads_id: i64) -> Result<Option<DownloadText>> {
        Ok(self
            .download_texts
            .read()
            .unwrap()
            .get(&downloads_id)
            .cloned())
    }

    async fn create_download_text(
        &self,
        download: &Download,
        result: &ExtractionResult,
    ) -> Result<DownloadText> {
        let download_texts_id = self.next_download_text_id.fetch_add(1, Ordering::SeqCst);
        let text = DownloadText::new(
            download_texts_id,
            download.downloads_id,
            result.extracted_text.clone(),
        );

        self.download_texts
            .write()
            .unwrap()
            .insert(download.downloads_id, text.clone());

        if let Some(stored) = self.downloads.write().unwrap().get_mut(&download.downloads_id) {
            stored.extracted = true;
        }

        Ok(text)
    }
}

#[async_trait]
impl DownloadStore for MemoryStore {
    async fn get_download(&self, downloads_id: i64) -> Result<Option<Download>> {
        Ok(self.downloads.read().unwrap().get(&downloads_id).cloned())
    }

    async fn unextracted_content_downloads(&self, stories_id: i64) -> Result<Vec<Download>> {
        let mut pending: Vec<_> = self
            .downloads
            .read()
            .unwrap()
            .values()
            .filter(|d| d.stories_id == stories_id && d.is_pending_content())
            .cloned()
            .collect();
        pending.sort_by_key(|d| d.downloads_id);
        Ok(pending)
    }

    async fn get_story(&self, stories_id: i64) -> Result<Option<Story>> {
        Ok(self.stories.read().unwrap().get(&stories_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::download::DownloadKind;

    fn result(tag: &str) -> ExtractionResult {
        ExtractionResult::new(format!("<p>{}</p>", tag), tag)
    }

    #[tokio::test]
    async fn test_cache_miss_then_hit() {
        let store = MemoryStore::new();
        assert!(store.get(1).await.unwrap().is_none());

        store.put(1, &result("one")).await.unwrap();
        assert_eq!(store.get(1).await.unwrap(), Some(result("one")));
        assert!(store.get(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_newest_duplicate_wins() {
        let store = MemoryStore::new();
        store.put(1, &result("old")).await.unwrap();
        store.put(1, &result("new")).await.unwrap();

        assert_eq!(store.cache_len().await.unwrap(), 2);
        assert_eq!(store.get(1).await.unwrap(), Some(result("new")));
    }

    #[tokio::test]
    async fn test_no_eviction_below_bound() {
        let store = MemoryStore::with_policy(EvictionPolicy::new(1_000_000));
        for id in 0..50 {
            store.put(id, &result("x")).await.unwrap();
        }
        assert_eq!(store.cache_len().await.unwrap(), 50);
    }

    #[tokio::test]
    async fn test_forced_eviction_keeps_newest_with_one_row_overshoot() {
        let store = MemoryStore::with_policy(EvictionPolicy::always(10));
        for id in 0..100 {
            store.put(id, &result(&id.to_string())).await.unwrap();
        }

        // The sweep runs before each insert, so the bound can be exceeded by one.
        assert!(store.cache_len().await.unwrap() <= 11);

        let entries = store.cache_entries();
        assert_eq!(entries.last().unwrap().downloads_id, 99);
        assert!(entries.windows(2).all(|w| w[0].cache_id < w[1].cache_id));
        assert!(store.get(0).await.unwrap().is_none());
        assert!(store.get(95).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_trim_reports_removed_rows() {
        let store = MemoryStore::with_policy(EvictionPolicy::never(3));
        for id in 0..8 {
            store.put(id, &result("x")).await.unwrap();
        }
        assert_eq!(store.trim_cache(3).await.unwrap(), 5);
        assert_eq!(store.trim_cache(3).await.unwrap(), 0);
        assert_eq!(store.cache_len().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_download_text_marks_download_extracted() {
        let store = MemoryStore::new();
        let download = Download::new(5, 50, "https://example.com/a");
        store.add_download(download.clone());

        assert_eq!(store.unextracted_content_downloads(50).await.unwrap().len(), 1);

        let text = store
            .create_download_text(&download, &result("body"))
            .await
            .unwrap();
        assert_eq!(text.download_text, "body");
        assert_eq!(text.downloads_id, 5);

        assert!(store.unextracted_content_downloads(50).await.unwrap().is_empty());
        assert_eq!(store.get_download_text(5).await.unwrap(), Some(text));
    }

    #[tokio::test]
    async fn test_only_content_downloads_are_pending() {
        let store = MemoryStore::new();
        store.add_download(Download::new(1, 9, "a"));
        store.add_download(Download::new(2, 9, "b").with_kind(DownloadKind::Feed));
        store.add_download(Download::new(3, 9, "c").extracted());
        store.add_download(Download::new(4, 8, "d"));

        let pending = store.unextracted_content_downloads(9).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].downloads_id, 1);
    }
}
