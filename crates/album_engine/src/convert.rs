use std::sync::LazyLock;

use regex::{Captures, Regex};

pub trait Converter: Send + Sync {
    fn to_markdown(&self, html: &str) -> String;
}

/// Markdown conversion that keeps link targets and image references.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html2MdConverter;

impl Converter for Html2MdConverter {
    fn to_markdown(&self, html: &str) -> String {
        html2md::parse_html(&promote_lazy_images(html))
    }
}

static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<img\b[^>]*>").expect("static regex is valid"));

/// Lazy-loaded images carry their address in `data-src` only; expose it as `src`
/// so the reference survives conversion.
fn promote_lazy_images(html: &str) -> std::borrow::Cow<'_, str> {
    IMG_TAG.replace_all(html, |caps: &Captures| {
        let tag = &caps[0];
        let lower = tag.to_ascii_lowercase();
        if lower.contains(" src=") || !lower.contains("data-src=") {
            tag.to_string()
        } else {
            tag.replacen("data-src=", "src=", 1)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lazy_image_source_is_promoted() {
        let html = r#"<p><img class="x" data-src="https://img.example/a.png"></p>"#;
        assert!(promote_lazy_images(html).contains(r#"src="https://img.example/a.png""#));
    }

    #[test]
    fn explicit_source_wins() {
        let html = r#"<img src="https://img.example/real.png" data-src="https://img.example/lazy.png">"#;
        assert_eq!(promote_lazy_images(html), html);
    }
}
