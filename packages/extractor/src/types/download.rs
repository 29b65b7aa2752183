//! Download and story types - the records extraction reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ExtractorError;

/// What a download was fetched for.
///
/// Only `Content` downloads hold article pages, so only they count
/// towards a story's completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadKind {
    Content,
    Feed,
    Spider,
    Archival,
}

impl DownloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Feed => "feed",
            Self::Spider => "spider",
            Self::Archival => "archival",
        }
    }
}

impl fmt::Display for DownloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DownloadKind {
    type Err = ExtractorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content" => Ok(Self::Content),
            "feed" => Ok(Self::Feed),
            "spider" => Ok(Self::Spider),
            "archival" => Ok(Self::Archival),
            other => Err(ExtractorError::config(format!(
                "unknown download kind: {}",
                other
            ))),
        }
    }
}

/// A fetched web resource belonging to a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Download {
    /// Unique, stable identifier
    pub downloads_id: i64,

    /// Owning story
    pub stories_id: i64,

    /// URL the download was fetched from
    pub url: String,

    /// What the download was fetched for
    pub kind: DownloadKind,

    /// Set once a download text has been persisted for this download
    #[serde(default)]
    pub extracted: bool,
}

impl Download {
    /// Create an unextracted content download.
    pub fn new(downloads_id: i64, stories_id: i64, url: impl Into<String>) -> Self {
        Self {
            downloads_id,
            stories_id,
            url: url.into(),
            kind: DownloadKind::Content,
            extracted: false,
        }
    }

    /// Set the download kind.
    pub fn with_kind(mut self, kind: DownloadKind) -> Self {
        self.kind = kind;
        self
    }

    /// Mark the download as already extracted.
    pub fn extracted(mut self) -> Self {
        self.extracted = true;
        self
    }

    /// Whether this download still blocks its story from completing.
    pub fn is_pending_content(&self) -> bool {
        self.kind == DownloadKind::Content && !self.extracted
    }
}

/// A logical article made of one or more downloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub stories_id: i64,
    pub url: String,
    pub title: String,
    pub publish_date: Option<DateTime<Utc>>,
}

impl Story {
    /// Create a story without a publish date.
    pub fn new(stories_id: i64, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            stories_id,
            url: url.into(),
            title: title.into(),
            publish_date: None,
        }
    }

    /// Set the publish date.
    pub fn with_publish_date(mut self, publish_date: DateTime<Utc>) -> Self {
        self.publish_date = Some(publish_date);
        self
    }
}
