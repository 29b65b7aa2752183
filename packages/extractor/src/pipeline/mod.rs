//! Extraction pipeline - the core of the library.
//!
//! The pipeline orchestrates:
//! - The extract-or-pass-through decision (`content`)
//! - Cache lookup, content fetch, and download text creation (`extract`)
//! - Story completion tracking (`process`)

pub mod content;
pub mod extract;
pub mod process;

pub use content::{should_extract, ContentExtractor};
pub use extract::Extractor;
pub use process::{CompletionOutcome, CompletionTracker};
