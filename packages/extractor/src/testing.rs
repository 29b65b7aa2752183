//! Testing utilities including mock implementations.
//!
//! These are useful for testing job layers built on the extractor without
//! real storage, content, or story processing. Every mock records its calls
//! so tests can assert what was (and was not) invoked.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{ExtractorError, Result};
use crate::html::html_strip;
use crate::stores::eviction::EvictionPolicy;
use crate::traits::{
    content::ContentFetcher,
    html::{BoilerplateRemover, HtmlStripper},
    store::{DownloadTextStore, ExtractorCache},
    story::StoryProcessor,
};
use crate::types::{
    config::ExtractorArguments,
    download::{Download, Story},
    extraction::{DownloadText, ExtractionResult},
};

/// A mock content fetcher serving canned content by download id.
///
/// Unknown downloads fail with [`ExtractorError::DownloadNotFound`].
#[derive(Default)]
pub struct MockContentFetcher {
    content: Arc<RwLock<HashMap<i64, String>>>,
    fail_ids: Arc<RwLock<Vec<i64>>>,
    calls: Arc<RwLock<Vec<i64>>>,
}

impl MockContentFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` for a download.
    pub fn with_content(self, downloads_id: i64, content: impl Into<String>) -> Self {
        self.content
            .write()
            .unwrap()
            .insert(downloads_id, content.into());
        self
    }

    /// Make fetches for a download fail.
    pub fn fail_download(self, downloads_id: i64) -> Self {
        self.fail_ids.write().unwrap().push(downloads_id);
        self
    }

    /// Download ids fetched so far, in order.
    pub fn calls(&self) -> Vec<i64> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl ContentFetcher for MockContentFetcher {
    async fn fetch_content(&self, download: &Download) -> Result<String> {
        let downloads_id = download.downloads_id;
        self.calls.write().unwrap().push(downloads_id);

        if self.fail_ids.read().unwrap().contains(&downloads_id) {
            return Err(ExtractorError::Fetch(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "Mock content store unavailable",
            ))));
        }

        self.content
            .read()
            .unwrap()
            .get(&downloads_id)
            .cloned()
            .ok_or(ExtractorError::DownloadNotFound { downloads_id })
    }
}

/// A mock boilerplate remover that returns its input unchanged.
#[derive(Default)]
pub struct MockBoilerplateRemover {
    fail: bool,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockBoilerplateRemover {
    pub fn new() -> Self {
        Self::default()
    }

    /// A remover whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// HTML passed in so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

impl BoilerplateRemover for MockBoilerplateRemover {
    fn extract_article(&self, html: &str) -> Result<String> {
        self.calls.write().unwrap().push(html.to_string());
        if self.fail {
            return Err(ExtractorError::Extract("mock boilerplate removal failed".into()));
        }
        Ok(html.to_string())
    }
}

/// A mock stripper that delegates to [`html_strip`] and records calls.
#[derive(Default)]
pub struct MockHtmlStripper {
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockHtmlStripper {
    pub fn new() -> Self {
        Self::default()
    }

    /// HTML passed in so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

impl HtmlStripper for MockHtmlStripper {
    fn strip(&self, html: &str) -> Result<String> {
        self.calls.write().unwrap().push(html.to_string());
        Ok(html_strip(html))
    }
}

/// A mock story processor recording which stories it processed.
#[derive(Default)]
pub struct MockStoryProcessor {
    fail: bool,
    processed: Arc<RwLock<Vec<i64>>>,
}

impl MockStoryProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A processor whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Story ids processed so far, in order, including repeats.
    pub fn processed(&self) -> Vec<i64> {
        self.processed.read().unwrap().clone()
    }
}

#[async_trait]
impl StoryProcessor for MockStoryProcessor {
    async fn process_extracted_story(&self, story: &Story, _args: &ExtractorArguments) -> Result<()> {
        self.processed.write().unwrap().push(story.stories_id);
        if self.fail {
            return Err(ExtractorError::StoryProcessing("mock story processing failed".into()));
        }
        Ok(())
    }
}

/// A cache whose backend is always unreachable.
pub struct FailingCache {
    policy: EvictionPolicy,
}

impl FailingCache {
    pub fn new() -> Self {
        Self {
            policy: EvictionPolicy::never(0),
        }
    }

    fn unavailable() -> ExtractorError {
        ExtractorError::Storage("mock cache unavailable".into())
    }
}

impl Default for FailingCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractorCache for FailingCache {
    async fn get_cached(&self, _downloads_id: i64) -> Result<Option<ExtractionResult>> {
        Err(Self::unavailable())
    }

    async fn insert_cached(&self, _downloads_id: i64, _result: &ExtractionResult) -> Result<i64> {
        Err(Self::unavailable())
    }

    async fn trim_cache(&self, _keep: usize) -> Result<usize> {
        Err(Self::unavailable())
    }

    async fn cache_len(&self) -> Result<usize> {
        Err(Self::unavailable())
    }

    fn eviction_policy(&self) -> &EvictionPolicy {
        &self.policy
    }
}

/// A download text store that finds nothing and fails every write.
#[derive(Default)]
pub struct FailingDownloadTexts {
    attempts: Arc<RwLock<Vec<i64>>>,
}

impl FailingDownloadTexts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Download ids whose texts failed to persist.
    pub fn attempts(&self) -> Vec<i64> {
        self.attempts.read().unwrap().clone()
    }
}

#[async_trait]
impl DownloadTextStore for FailingDownloadTexts {
    async fn get_download_text(&self, _downloads_id: i64) -> Result<Option<DownloadText>> {
        Ok(None)
    }

    async fn create_download_text(
        &self,
        download: &Download,
        _result: &ExtractionResult,
    ) -> Result<DownloadText> {
        self.attempts.write().unwrap().push(download.downloads_id);
        Err(ExtractorError::Persist("mock download text store rejected write".into()))
    }
}
