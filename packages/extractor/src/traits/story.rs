//! Story-level post-processing, run once a story is fully extracted.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{config::ExtractorArguments, download::Story};

/// Processes a story whose content downloads have all been extracted.
///
/// May be invoked more than once for the same story when sibling
/// downloads finish concurrently, so implementations should be idempotent.
#[async_trait]
pub trait StoryProcessor: Send + Sync {
    async fn process_extracted_story(&self, story: &Story, args: &ExtractorArguments) -> Result<()>;
}
