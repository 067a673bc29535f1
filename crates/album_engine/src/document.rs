use chrono::{DateTime, FixedOffset};

/// Written in place of the body when extraction found nothing.
pub const CONTENT_UNAVAILABLE: &str =
    "*Content could not be retrieved; see the original link.*";

/// Title heading, publish time, original link, a rule, then the body.
pub fn build_article_document(
    title: &str,
    published_at: DateTime<FixedOffset>,
    url: &str,
    body: &str,
) -> String {
    let body = if body.trim().is_empty() {
        CONTENT_UNAVAILABLE
    } else {
        body
    };
    format!(
        "# {title}\n\n**Published**: {published}\n\n**Original link**: [{url}]({url})\n\n---\n\n{body}\n",
        published = published_at.format("%Y-%m-%d %H:%M:%S"),
    )
}
