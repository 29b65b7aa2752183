//! A lightweight boilerplate remover.
//!
//! Narrows the page to its first `<article>`, `<main>`, or `<body>` element,
//! in that order of preference, then drops non-content elements inside it
//! (scripts, navigation, sidebars, forms). Page-level headers and footers
//! are dropped too; a header or footer inside an article is kept.

use scraper::{Html, Selector};

use crate::error::Result;
use crate::traits::html::BoilerplateRemover;

const CONTAINERS: &[&str] = &["article", "main", "[role='main']", "body"];

const BOILERPLATE: &str = "script, style, noscript, iframe, nav, aside, form";

const PAGE_CHROME: &str = "header, footer";

/// Tag-pruning [`BoilerplateRemover`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TagPruningRemover;

impl TagPruningRemover {
    pub fn new() -> Self {
        Self
    }
}

impl BoilerplateRemover for TagPruningRemover {
    fn extract_article(&self, html: &str) -> Result<String> {
        let mut document = Html::parse_document(html);

        let container = CONTAINERS
            .iter()
            .filter_map(|s| Selector::parse(s).ok())
            .find_map(|selector| document.select(&selector).next())
            .unwrap_or_else(|| document.root_element());
        let container_id = container.id();

        let mut unwanted: Vec<_> = container
            .descendants()
            .filter(|node| node.value().is_comment())
            .map(|node| node.id())
            .collect();

        if let Ok(selector) = Selector::parse(BOILERPLATE) {
            unwanted.extend(container.select(&selector).map(|el| el.id()));
        }

        if let Ok(selector) = Selector::parse(PAGE_CHROME) {
            unwanted.extend(
                container
                    .select(&selector)
                    .filter(|el| !within_article(el))
                    .map(|el| el.id()),
            );
        }

        for id in unwanted {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }

        let article = document
            .tree
            .get(container_id)
            .and_then(scraper::ElementRef::wrap)
            .map(|el| el.inner_html())
            .unwrap_or_default();

        Ok(article.trim().to_string())
    }
}

fn within_article(el: &scraper::ElementRef<'_>) -> bool {
    el.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|e| e.name() == "article")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_article_over_body() {
        let html = r#"
            <html><body>
              <nav><a href="/">Home</a></nav>
              <article><h1>Title</h1><p>Story text.</p></article>
              <footer>Copyright</footer>
            </body></html>
        "#;
        let article = TagPruningRemover.extract_article(html).unwrap();
        assert_eq!(article, "<h1>Title</h1><p>Story text.</p>");
    }

    #[test]
    fn test_falls_back_to_body() {
        let html = "<html><head><title>t</title></head><body><header>Site</header><p>Only body</p></body></html>";
        let article = TagPruningRemover.extract_article(html).unwrap();
        assert_eq!(article, "<p>Only body</p>");
    }

    #[test]
    fn test_fragment_without_containers() {
        let html = "<p>Fragment</p><script>track()</script>";
        assert_eq!(TagPruningRemover.extract_article(html).unwrap(), "<p>Fragment</p>");
    }

    #[test]
    fn test_keeps_header_inside_article() {
        let html = "<article><header><h1>Headline</h1></header><p>Body</p></article>";
        assert_eq!(
            TagPruningRemover.extract_article(html).unwrap(),
            "<header><h1>Headline</h1></header><p>Body</p>"
        );
    }

    #[test]
    fn test_takes_first_of_several_articles() {
        let html = "<body><article><p>A</p></article><div>Ad</div><article><p>B</p></article></body>";
        assert_eq!(TagPruningRemover.extract_article(html).unwrap(), "<p>A</p>");
    }

    #[test]
    fn test_drops_nested_navigation_whole() {
        let html = "<body><nav><ul><li><nav>Sub</nav></li></ul> Menu</nav><p>Story</p></body>";
        assert_eq!(TagPruningRemover.extract_article(html).unwrap(), "<p>Story</p>");
    }

    #[test]
    fn test_drops_comments() {
        let html = "<main><!-- tracking --><p>Kept</p></main>";
        assert_eq!(TagPruningRemover.extract_article(html).unwrap(), "<p>Kept</p>");
    }
}
