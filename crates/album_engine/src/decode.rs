use album_logging::album_debug;
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: &'static str,
}

/// Decode an article page to UTF-8: BOM -> Content-Type charset -> chardetng guess.
///
/// Decoding is lossy; malformed sequences become U+FFFD so extraction can still
/// recover whatever text survived.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> DecodedHtml {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(charset_label)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| guess_encoding(bytes));

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        album_debug!("lossy decode with {}", used.name());
    }
    DecodedHtml {
        html: text.into_owned(),
        encoding_label: used.name(),
    }
}

fn guess_encoding(bytes: &[u8]) -> &'static Encoding {
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches(['"', '\'']).to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_parameter_is_case_insensitive() {
        assert_eq!(
            charset_label("text/html; Charset=\"GBK\"").as_deref(),
            Some("GBK")
        );
        assert_eq!(charset_label("text/html"), None);
    }

    #[test]
    fn plain_utf8_is_not_guessed() {
        let decoded = decode_html("中文".as_bytes(), None);
        assert_eq!(decoded.html, "中文");
        assert_eq!(decoded.encoding_label, "UTF-8");
    }
}
