//! HTML to plain text conversion.
//!
//! Text comes from the parsed DOM, so every named and numeric entity is
//! decoded. Block-level elements become line breaks.

use regex::Regex;
use scraper::{ElementRef, Html, Node};
use std::sync::LazyLock;

use crate::error::Result;
use crate::traits::html::HtmlStripper;

const SKIPPED: &[&str] = &["script", "style", "noscript", "template", "title", "head"];

const BLOCKS: &[&str] = &[
    "p", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "table",
    "article", "section", "header", "footer", "main", "blockquote", "pre", "hr", "figure",
    "figcaption", "dl", "dt", "dd",
];

static INLINE_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\f\x{A0}]+").unwrap());
static MULTI_NEWLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Strips tags, keeping block boundaries as line breaks.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomHtmlStripper;

impl DomHtmlStripper {
    pub fn new() -> Self {
        Self
    }
}

impl HtmlStripper for DomHtmlStripper {
    fn strip(&self, html: &str) -> Result<String> {
        Ok(html_strip(html))
    }
}

/// Convert HTML to plain text.
pub fn html_strip(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut text = String::with_capacity(html.len());
    collect_text(fragment.root_element(), &mut text);

    let lines: Vec<String> = text
        .lines()
        .map(|line| INLINE_SPACE.replace_all(line, " ").trim().to_string())
        .collect();
    let text = lines.join("\n");

    MULTI_NEWLINE.replace_all(&text, "\n\n").trim().to_string()
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                let block = BLOCKS.contains(&name);
                if block {
                    out.push('\n');
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_paragraphs() {
        let html = "<p>First   paragraph</p><p>Second <b>bold</b> one</p>";
        assert_eq!(html_strip(html), "First paragraph\n\nSecond bold one");
    }

    #[test]
    fn test_strip_drops_scripts_and_comments() {
        let html = "<div>Keep<script>var x = '<p>no</p>';</script><!-- hidden --></div>";
        assert_eq!(html_strip(html), "Keep");
    }

    #[test]
    fn test_strip_decodes_entities() {
        assert_eq!(html_strip("<p>Fish &amp; chips &lt;3</p>"), "Fish & chips <3");
        assert_eq!(html_strip("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_strip_decodes_named_and_numeric_entities() {
        let html = "<p>It&rsquo;s &copy; 2024 &#8217;quoted&#x27; caf&eacute;&nbsp;&nbsp;au lait</p>";
        assert_eq!(html_strip(html), "It\u{2019}s \u{a9} 2024 \u{2019}quoted' caf\u{e9} au lait");
    }

    #[test]
    fn test_strip_line_breaks() {
        assert_eq!(html_strip("one<br>two<li>three</li>"), "one\ntwo\nthree");
    }

    #[test]
    fn test_strip_plain_text_is_unchanged() {
        assert_eq!(html_strip("just words"), "just words");
    }
}
