use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::convert::{Converter, Html2MdConverter};

/// Content region selectors, tried in order: the canonical body container by
/// id, then the broader rich-media container by class prefix.
const CONTENT_SELECTORS: &[&str] = &["#js_content", r#"div[class^="rich_media_content"]"#];

// Three or more line breaks, possibly separated by stray spaces.
static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").expect("static regex is valid"));

pub trait Extractor: Send + Sync {
    /// Raw article markup in, normalized text out. Empty output means the
    /// content region was not found; it is never an error.
    fn extract(&self, html: &str) -> String;
}

pub struct ContentExtractor {
    converter: Box<dyn Converter>,
}

impl ContentExtractor {
    pub fn new(converter: Box<dyn Converter>) -> Self {
        Self { converter }
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(Box::new(Html2MdConverter))
    }
}

impl Extractor for ContentExtractor {
    fn extract(&self, html: &str) -> String {
        match locate_content(html) {
            Some(fragment) => normalize_text(&self.converter.to_markdown(&fragment)),
            None => String::new(),
        }
    }
}

/// Inner markup of the first content region that matches.
pub fn locate_content(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    CONTENT_SELECTORS.iter().find_map(|raw| {
        let selector = Selector::parse(raw).ok()?;
        document
            .select(&selector)
            .next()
            .map(|node| node.inner_html())
    })
}

/// Collapse runs of blank lines to a single blank line and trim the ends.
pub fn normalize_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n");
    BLANK_RUN.replace_all(&unified, "\n\n").trim().to_string()
}
