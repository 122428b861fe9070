//! Heuristic detection of what kind of text a share holds.
//!
//! Rules are checked in order and the first match wins: valid JSON, then
//! anything containing an HTML-like tag, then an XML prolog at the start,
//! then common markdown markers, and finally plain text.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)</?[a-z].*>").expect("valid html regex"));

static XML_PROLOG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<\?xml").expect("valid xml regex"));

static MARKDOWN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"# |\*|_|\[.*\]\(.*\)").expect("valid markdown regex"));

/// Rendering hint derived from text content. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextType {
    /// Parses as a JSON document.
    Json,
    /// Contains an HTML-like tag.
    Html,
    /// Starts with an XML prolog.
    Xml,
    /// Contains markdown markers.
    Markdown,
    /// Anything else.
    Text,
}

impl TextType {
    /// Classify `content`.
    pub fn detect(content: &str) -> Self {
        if serde_json::from_str::<serde_json::Value>(content).is_ok() {
            Self::Json
        } else if HTML_TAG.is_match(content) {
            Self::Html
        } else if XML_PROLOG.is_match(content) {
            Self::Xml
        } else if MARKDOWN.is_match(content) {
            Self::Markdown
        } else {
            Self::Text
        }
    }

    /// Lowercase name as used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
            Self::Xml => "xml",
            Self::Markdown => "markdown",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for TextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
