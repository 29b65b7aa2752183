//! Download Extraction Library
//!
//! Extracts substantive article text from fetched web pages ("downloads"),
//! caches extraction results, and hands a story to post-processing once all
//! of its content downloads have been extracted.
//!
//! # Pipeline
//!
//! ```text
//! CompletionTracker ─▶ Extractor ─▶ ExtractorCache / ContentFetcher / ContentExtractor
//!        │                  └──────▶ DownloadTextStore
//!        └─▶ DownloadStore ─▶ StoryProcessor
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use extractor::{CompletionTracker, ContentExtractor, ExtractorArguments, MemoryStore};
//!
//! let store = Arc::new(MemoryStore::new());
//! let tracker = CompletionTracker::from_store(
//!     store.clone(),
//!     Arc::new(my_content_fetcher),
//!     ContentExtractor::default(),
//!     Arc::new(my_story_processor),
//! );
//!
//! let outcome = tracker
//!     .process_download_id(downloads_id, &ExtractorArguments::default())
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator abstractions (stores, fetcher, HTML, story processing)
//! - [`types`] - Downloads, stories, results, and configuration
//! - [`pipeline`] - Extraction engine, orchestrator, and completion tracker
//! - [`stores`] - Storage implementations (MemoryStore, SqliteStore, PostgresStore)
//! - [`html`] - DOM-based reference HTML collaborators
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod html;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ExtractorError, Result};
pub use traits::{
    content::ContentFetcher,
    html::{BoilerplateRemover, HtmlStripper},
    store::{DownloadStore, DownloadTextStore, ExtractorCache, ExtractorStore},
    story::StoryProcessor,
};
pub use types::{
    config::{ExtractorArguments, ExtractorConfig, MAX_CACHE_ENTRIES, MIN_CONTENT_LENGTH_TO_EXTRACT},
    download::{Download, DownloadKind, Story},
    extraction::{CacheEntry, DownloadText, ExtractionResult},
};

// Re-export pipeline components
pub use pipeline::{should_extract, CompletionOutcome, CompletionTracker, ContentExtractor, Extractor};

// Re-export stores
pub use stores::{EvictionPolicy, MemoryStore};

#[cfg(feature = "sqlite")]
pub use stores::SqliteStore;

#[cfg(feature = "postgres")]
pub use stores::PostgresStore;

// Re-export reference HTML collaborators
pub use html::{DomHtmlStripper, TagPruningRemover};
