//! Extract every download of a story and process the story at the end.
//!
//! Run with:
//! ```sh
//! RUST_LOG=extractor=debug cargo run -p extractor --example extract_story
//! ```
//!
//! `EXTRACTOR_MAX_CACHE_ENTRIES` and `EXTRACTOR_MIN_CONTENT_LENGTH` override
//! the defaults.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use extractor::{
    CompletionTracker, ContentExtractor, ContentFetcher, Download, EvictionPolicy,
    ExtractorArguments, ExtractorConfig, ExtractorError, MemoryStore, Result, Story,
    StoryProcessor,
};

/// Serves content from memory, standing in for the raw content store.
struct InlineContent(HashMap<i64, String>);

#[async_trait]
impl ContentFetcher for InlineContent {
    async fn fetch_content(&self, download: &Download) -> Result<String> {
        self.0
            .get(&download.downloads_id)
            .cloned()
            .ok_or(ExtractorError::DownloadNotFound {
                downloads_id: download.downloads_id,
            })
    }
}

/// Prints the story instead of running the real post-processing.
struct PrintStory;

#[async_trait]
impl StoryProcessor for PrintStory {
    async fn process_extracted_story(&self, story: &Story, args: &ExtractorArguments) -> Result<()> {
        tracing::info!(
            stories_id = story.stories_id,
            use_cache = args.use_cache,
            "story ready: {}",
            story.title
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,extractor=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ExtractorConfig::from_env()?;
    tracing::info!(?config, "Configuration loaded");

    let store = Arc::new(MemoryStore::with_policy(EvictionPolicy::from_config(&config)));
    store.add_story(Story::new(1, "https://news.example/flood", "River flooding"));
    store.add_download(Download::new(100, 1, "https://news.example/flood"));
    store.add_download(Download::new(101, 1, "https://news.example/flood?page=2"));

    let content = InlineContent(HashMap::from([
        (
            100,
            "<html><body><nav>Sections</nav><article><p>The river rose overnight.</p></article></body></html>"
                .to_string(),
        ),
        (101, "Residents were evacuated by morning.".to_string()),
    ]));

    let tracker = CompletionTracker::from_store(
        store.clone(),
        Arc::new(content),
        ContentExtractor::default().with_config(&config),
        Arc::new(PrintStory),
    );

    let args = ExtractorArguments::default();
    for downloads_id in [100, 101] {
        let outcome = tracker.process_download_id(downloads_id, &args).await?;
        tracing::info!(downloads_id, ?outcome, "Download processed");
    }

    Ok(())
}
