//! Typed errors for the extractor library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so that the job layer
//! driving extraction can classify failures before deciding to retry.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while extracting downloads.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// Invalid configuration or arguments
    #[error("config error: {reason}")]
    Config { reason: String },

    /// Raw content could not be fetched for a download
    #[error("content fetch failed: {0}")]
    Fetch(#[source] BoxError),

    /// Boilerplate removal or HTML stripping failed
    #[error("extraction failed: {0}")]
    Extract(#[source] BoxError),

    /// Download text could not be persisted
    #[error("download text persistence failed: {0}")]
    Persist(#[source] BoxError),

    /// Story post-processing failed
    #[error("story processing failed: {0}")]
    StoryProcessing(#[source] BoxError),

    /// Download does not exist in storage
    #[error("download not found: {downloads_id}")]
    DownloadNotFound { downloads_id: i64 },

    /// Story does not exist in storage
    #[error("story not found: {stories_id}")]
    StoryNotFound { stories_id: i64 },

    /// Storage backend operation failed
    #[error("storage error: {0}")]
    Storage(#[source] BoxError),
}

impl ExtractorError {
    /// Build a config error from any displayable reason.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// True when a referenced download or story is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DownloadNotFound { .. } | Self::StoryNotFound { .. }
        )
    }

    /// True when a delegated collaborator failed.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            Self::Fetch(_) | Self::Extract(_) | Self::Persist(_) | Self::StoryProcessing(_)
        )
    }
}

/// Result type alias for extractor operations.
pub type Result<T> = std::result::Result<T, ExtractorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let missing = ExtractorError::StoryNotFound { stories_id: 7 };
        assert!(missing.is_not_found());
        assert!(!missing.is_collaborator_failure());

        let fetch = ExtractorError::Fetch("connection reset".into());
        assert!(fetch.is_collaborator_failure());
        assert!(!fetch.is_not_found());

        let config = ExtractorError::config("max_cache_entries must be positive");
        assert_eq!(
            config.to_string(),
            "config error: max_cache_entries must be positive"
        );
    }
}
