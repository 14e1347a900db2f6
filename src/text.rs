//! The text module provides whitespace normalization and visible-text
//! extraction from raw page markup.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use scraper::node::Node;

use crate::constants::WHITESPACE_RUN;

static WHITESPACE_RUN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(WHITESPACE_RUN).expect("Failed to compile WHITESPACE_RUN regex"));

// Element contents that never belong to the visible page text.
const NON_VISIBLE_TAGS: &[&str] = &["script", "style", "noscript"];

/// Collapses every run of whitespace to a single space and trims the ends.
///
/// Pure and idempotent: applying it twice yields the same string as
/// applying it once.
pub fn normalize(raw: &str) -> String {
    WHITESPACE_RUN_REGEX.replace_all(raw, " ").trim().to_string()
}

/// Extracts the visible text of an HTML document as one normalized string.
///
/// Text nodes nested under `script`, `style` or `noscript` elements are
/// dropped; everything else is joined with single spaces. Plain text input
/// without markup passes through unchanged apart from normalization.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut chunks: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
                Node::Element(element) => NON_VISIBLE_TAGS.contains(&element.name()),
                _ => false,
            });
            if !hidden {
                chunks.push(text);
            }
        }
    }

    normalize(&chunks.join(" "))
}
