//! Raw content access for downloads.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::download::Download;

/// Fetches the raw page content stored for a download.
///
/// Implementations decide where content lives (inline in the database,
/// object storage, ...). Failures should be reported as
/// [`ExtractorError::Fetch`](crate::ExtractorError::Fetch), or
/// [`ExtractorError::DownloadNotFound`](crate::ExtractorError::DownloadNotFound)
/// when no content exists.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch_content(&self, download: &Download) -> Result<String>;
}
