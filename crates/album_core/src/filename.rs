use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::catalog::CatalogEntry;

/// Maximum title length, in characters, inside an article file name.
pub const MAX_TITLE_CHARS: usize = 100;
pub const ARTICLE_EXTENSION: &str = "md";
/// Files that live next to articles but are never catalogued.
pub const RESERVED_FILENAMES: &[&str] = &["index.md", "README.md"];

const UNTITLED: &str = "untitled";

// `<date>_<title>.md`, optionally behind the numbered prefix older runs wrote.
static ARTICLE_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+_)?(\d{4}-\d{2}-\d{2})_(.+)\.md$").expect("static regex is valid")
});

/// `{date:YYYY-MM-DD}_{sanitized_title}.md`
pub fn canonical_filename(date: NaiveDate, title: &str) -> String {
    format!(
        "{}_{}.{ARTICLE_EXTENSION}",
        date.format("%Y-%m-%d"),
        sanitize_title(title)
    )
}

/// Replace forbidden characters with `_`, collapse whitespace runs, trim, then cap
/// the length. Truncation runs last so it never cuts into a replacement.
pub fn sanitize_title(input: &str) -> String {
    let replaced: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(MAX_TITLE_CHARS).collect();
    let trimmed = truncated.trim_end();
    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse a persisted file name back into a catalog entry. Anything that does not
/// follow the article naming pattern yields `None`.
pub fn parse_catalog_filename(filename: &str) -> Option<CatalogEntry> {
    if RESERVED_FILENAMES.contains(&filename) {
        return None;
    }
    let caps = ARTICLE_FILENAME.captures(filename)?;
    let publish_date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()?;
    Some(CatalogEntry {
        publish_date,
        title: caps[2].to_string(),
        filename: filename.to_string(),
    })
}

/// Whitespace is left for the collapse step even though tab and newline are control characters.
fn is_forbidden(c: char) -> bool {
    matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
        || (c.is_control() && !c.is_whitespace())
}
