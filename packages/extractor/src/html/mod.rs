//! Reference HTML collaborators.
//!
//! DOM-based implementations of [`BoilerplateRemover`](crate::BoilerplateRemover)
//! and [`HtmlStripper`](crate::HtmlStripper) so the pipeline works without a
//! dedicated readability engine. Swap in a stronger extractor by
//! implementing the traits.

pub mod prune;
pub mod strip;

pub use prune::TagPruningRemover;
pub use strip::{html_strip, DomHtmlStripper};
