use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use scraper::{Html, Selector};

static MSG_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"msg_title\s*=\s*["']([^"']+)["']"#).expect("static regex is valid")
});
static PUBLISH_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"publish_time\s*=\s*"([^"]+)""#).expect("static regex is valid")
});
static CREATE_TS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"var\s+ct\s*=\s*"?(\d{10})"#).expect("static regex is valid"));

/// Title from the page script variable, else the `og:title` meta tag.
pub fn page_title(html: &str) -> Option<String> {
    if let Some(caps) = MSG_TITLE.captures(html) {
        let title = caps[1].trim();
        if !title.is_empty() {
            return Some(title.to_string());
        }
    }
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"meta[property="og:title"]"#).ok()?;
    document
        .select(&selector)
        .filter_map(|node| node.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}

/// Publish time from the formatted script variable, else the unix `ct` variable.
pub fn page_publish_time(html: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let formatted = PUBLISH_TIME.captures(html).and_then(|caps| {
        let naive = NaiveDateTime::parse_from_str(caps[1].trim(), "%Y-%m-%d %H:%M:%S").ok()?;
        offset.from_local_datetime(&naive).single()
    });
    formatted.or_else(|| {
        let caps = CREATE_TS.captures(html)?;
        let seconds: i64 = caps[1].parse().ok()?;
        DateTime::<Utc>::from_timestamp(seconds, 0).map(|utc| utc.with_timezone(&offset))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cst() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[test]
    fn script_title_beats_meta() {
        let html = r#"<meta property="og:title" content="Meta"><script>var msg_title = "Script title";</script>"#;
        assert_eq!(page_title(html).as_deref(), Some("Script title"));
    }

    #[test]
    fn meta_title_is_the_fallback() {
        let html = r#"<html><head><meta property="og:title" content="Meta &amp; more"></head></html>"#;
        assert_eq!(page_title(html).as_deref(), Some("Meta & more"));
        assert_eq!(page_title("<html></html>"), None);
    }

    #[test]
    fn formatted_publish_time_is_read_in_offset() {
        let html = r#"var publish_time = "2025-12-26 08:30:00" || "";"#;
        let at = page_publish_time(html, cst()).unwrap();
        assert_eq!(at.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-12-26 08:30:00");
    }

    #[test]
    fn unix_create_time_is_the_fallback() {
        let html = r#"var ct = "1735732800";"#;
        let at = page_publish_time(html, cst()).unwrap();
        assert_eq!(at.timestamp(), 1_735_732_800);
        assert!(page_publish_time("nothing", cst()).is_none());
    }
}
