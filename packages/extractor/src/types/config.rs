//! Configuration types for extraction runs and the result cache.

use serde::{Deserialize, Serialize};

use crate::error::{ExtractorError, Result};

/// Content shorter than this (in characters) with no HTML is not extracted.
pub const MIN_CONTENT_LENGTH_TO_EXTRACT: usize = 4096;

/// Target upper bound on cached extractor results.
pub const MAX_CACHE_ENTRIES: usize = 1_000_000;

/// Per-invocation options for extracting a download.
///
/// Both options default to `true`: reuse persisted download texts and
/// read/write the extractor cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorArguments {
    /// Read and write the extractor result cache.
    #[serde(default = "default_true")]
    pub use_cache: bool,

    /// Return an already persisted download text instead of re-extracting.
    #[serde(default = "default_true")]
    pub use_existing: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ExtractorArguments {
    fn default() -> Self {
        Self {
            use_cache: true,
            use_existing: true,
        }
    }
}

impl ExtractorArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a full recompute: skip both the cache and existing texts.
    pub fn fresh() -> Self {
        Self {
            use_cache: false,
            use_existing: false,
        }
    }

    /// Set whether the result cache is used.
    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// Set whether existing download texts are reused.
    pub fn with_existing(mut self, use_existing: bool) -> Self {
        self.use_existing = use_existing;
        self
    }
}

/// Configuration shared by the extraction engine and cache stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Target maximum number of cached results.
    ///
    /// Each cache write triggers a trim with probability
    /// `10 / max_cache_entries`. Default: 1,000,000.
    pub max_cache_entries: usize,

    /// Content at least this long is always extracted.
    ///
    /// Default: 4096.
    pub min_content_length: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_cache_entries: MAX_CACHE_ENTRIES,
            min_content_length: MIN_CONTENT_LENGTH_TO_EXTRACT,
        }
    }
}

impl ExtractorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load overrides from `EXTRACTOR_MAX_CACHE_ENTRIES` and
    /// `EXTRACTOR_MIN_CONTENT_LENGTH`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("EXTRACTOR_MAX_CACHE_ENTRIES") {
            config.max_cache_entries = parse_env("EXTRACTOR_MAX_CACHE_ENTRIES", &value)?;
        }
        if let Ok(value) = std::env::var("EXTRACTOR_MIN_CONTENT_LENGTH") {
            config.min_content_length = parse_env("EXTRACTOR_MIN_CONTENT_LENGTH", &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the cache size target.
    pub fn with_max_cache_entries(mut self, max: usize) -> Self {
        self.max_cache_entries = max;
        self
    }

    /// Set the minimum content length that always triggers extraction.
    pub fn with_min_content_length(mut self, len: usize) -> Self {
        self.min_content_length = len;
        self
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_cache_entries == 0 {
            return Err(ExtractorError::config("max_cache_entries must be positive"));
        }
        if self.min_content_length == 0 {
            return Err(ExtractorError::config("min_content_length must be positive"));
        }
        Ok(())
    }
}

fn parse_env(name: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| ExtractorError::config(format!("{} must be a positive integer, got {:?}", name, value)))
}
