//! HTML processing capabilities used by the extraction engine.
//!
//! Both are CPU-bound and synchronous. See [`crate::html`] for the
//! reference implementations.

use crate::error::Result;

/// Pulls substantive article HTML out of a full page.
///
/// Navigation, ads, and other boilerplate should be dropped.
pub trait BoilerplateRemover: Send + Sync {
    fn extract_article(&self, html: &str) -> Result<String>;
}

/// Converts HTML into plain text.
pub trait HtmlStripper: Send + Sync {
    fn strip(&self, html: &str) -> Result<String>;
}
