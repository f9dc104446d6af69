//! Visible-text extraction from rendered markup

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node};

/// Elements whose text never reaches the reader
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

static TRAILING_WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)[ \t\r\x{a0}]+$").expect("valid trailing whitespace pattern"));

static BLANK_LINE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("valid blank line pattern"));

/// Extract the visible text of an HTML document.
///
/// Text nodes are concatenated in document order, so line structure from the
/// markup survives and the splitter can break on it. Text inside `script`,
/// `style`, `noscript` and `template` is dropped.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::with_capacity(html.len() / 2);

    for node in document.tree.root().descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
            Node::Element(element) => HIDDEN_ELEMENTS.contains(&element.name()),
            _ => false,
        });

        if !hidden {
            text.push_str(fragment);
        }
    }

    clean_text(&text)
}

/// Trim trailing whitespace on every line and collapse runs of blank lines.
fn clean_text(text: &str) -> String {
    let text = TRAILING_WHITESPACE.replace_all(text, "");
    let text = BLANK_LINE_RUNS.replace_all(&text, "\n\n");
    text.trim().to_string()
}
