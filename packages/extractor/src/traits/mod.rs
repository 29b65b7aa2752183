//! Core trait abstractions for the extractor library.
//!
//! These traits define the collaborators that applications implement
//! to provide content, storage, HTML processing, and story processing.

pub mod content;
pub mod html;
pub mod store;
pub mod story;
