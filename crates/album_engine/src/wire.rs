//! Listing endpoint response shape.
//!
//! The endpoint is loose about types: ids, timestamps and flags arrive as either
//! numbers or numeric strings, any field may be `null`, and a one-item list may
//! arrive as a bare object.

use album_core::{Article, Page, PageCursor};
use album_logging::album_warn;
use serde::Deserialize;

use crate::{FailureKind, FetchError};

#[derive(Debug, Deserialize)]
struct ListingEnvelope {
    #[serde(default)]
    base_resp: Option<BaseResp>,
    #[serde(default)]
    getalbum_resp: Option<AlbumResp>,
}

#[derive(Debug, Deserialize)]
struct BaseResp {
    #[serde(default)]
    ret: Option<Scalar>,
    #[serde(default)]
    errmsg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlbumResp {
    #[serde(default)]
    article_list: Option<OneOrMany<WireArticle>>,
    #[serde(default)]
    continue_flag: Option<Scalar>,
}

#[derive(Debug, Deserialize)]
struct WireArticle {
    #[serde(default)]
    msgid: Option<Scalar>,
    #[serde(default)]
    itemidx: Option<Scalar>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    create_time: Option<Scalar>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Text(String),
}

impl Scalar {
    /// `None` for text that is not an integer.
    fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(value) => Some(*value),
            Scalar::Text(text) => text.trim().parse().ok(),
        }
    }

    fn into_string(self) -> String {
        match self {
            Scalar::Int(value) => value.to_string(),
            Scalar::Text(text) => text,
        }
    }
}

fn flag(value: Option<&Scalar>) -> i64 {
    value.and_then(Scalar::as_i64).unwrap_or(0)
}

fn text(value: Option<Scalar>) -> String {
    value.map(Scalar::into_string).unwrap_or_default()
}

/// Decode one listing page. Positions are numbered from 0 within the page.
///
/// An entry without a readable `create_time` cannot be dated, so it is dropped
/// with a warning; it still advances the cursor.
pub(crate) fn parse_listing(body: &[u8]) -> Result<Page, FetchError> {
    let envelope: ListingEnvelope = serde_json::from_slice(body)
        .map_err(|err| FetchError::new(FailureKind::MalformedResponse, err.to_string()))?;

    if let Some(base) = &envelope.base_resp {
        let ret = flag(base.ret.as_ref());
        if ret != 0 {
            return Err(FetchError::new(
                FailureKind::Api(ret),
                base.errmsg.clone().unwrap_or_default(),
            ));
        }
    }

    let album = envelope.getalbum_resp.ok_or_else(|| {
        FetchError::new(FailureKind::MalformedResponse, "missing getalbum_resp")
    })?;
    let has_more = flag(album.continue_flag.as_ref()) != 0;
    let served = album
        .article_list
        .map(OneOrMany::into_vec)
        .unwrap_or_default();

    let mut items = Vec::with_capacity(served.len());
    let mut next_cursor = None;
    for wire in served {
        let cursor = PageCursor {
            msgid: text(wire.msgid),
            item_index: text(wire.itemidx),
        };
        let title = wire.title.unwrap_or_default();
        match wire.create_time.as_ref().and_then(Scalar::as_i64) {
            Some(publish_time) => items.push(Article {
                remote_id: cursor.msgid.clone(),
                item_index: cursor.item_index.clone(),
                title,
                url: wire.url.unwrap_or_default(),
                publish_time,
                sequence_position: items.len(),
            }),
            None => album_warn!(
                "dropping listing entry {:?} ({title:?}): unreadable create_time {:?}",
                cursor.msgid,
                wire.create_time
            ),
        }
        next_cursor = Some(cursor);
    }

    Ok(Page {
        items,
        has_more,
        next_cursor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_strings_and_numbers() {
        let body = br#"{
            "base_resp": {"ret": 0},
            "getalbum_resp": {
                "article_list": [
                    {"msgid": "2247483700", "itemidx": "1", "title": "A", "url": "https://a", "create_time": "1735732800"},
                    {"msgid": 2247483699, "itemidx": 2, "title": "B", "url": "https://b", "create_time": 1735646400}
                ],
                "continue_flag": "1"
            }
        }"#;
        let page = parse_listing(body).unwrap();
        assert!(page.has_more);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].remote_id, "2247483700");
        assert_eq!(page.items[0].publish_time, 1_735_732_800);
        assert_eq!(page.items[1].remote_id, "2247483699");
        assert_eq!(page.items[1].item_index, "2");
        assert_eq!(page.items[1].sequence_position, 1);
    }

    #[test]
    fn single_item_object_is_accepted() {
        let body = br#"{"getalbum_resp": {"article_list": {"msgid": "1", "itemidx": "1", "title": "Only", "url": "u", "create_time": "5"}, "continue_flag": 0}}"#;
        let page = parse_listing(body).unwrap();
        assert!(!page.has_more);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "Only");
    }

    #[test]
    fn missing_list_is_an_empty_last_page() {
        let page = parse_listing(br#"{"getalbum_resp": {"continue_flag": "0"}}"#).unwrap();
        assert!(page.items.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn non_zero_ret_is_an_api_failure() {
        let err = parse_listing(br#"{"base_resp": {"ret": 200013, "errmsg": "freq control"}}"#)
            .unwrap_err();
        assert_eq!(err.kind, FailureKind::Api(200013));
    }

    #[test]
    fn undated_entries_are_dropped_but_still_move_the_cursor() {
        let body = br#"{"getalbum_resp": {"article_list": [
            {"msgid": "10", "itemidx": "1", "title": "Dated", "url": "u", "create_time": "1735732800"},
            {"msgid": "9", "itemidx": "1", "title": "Undated", "url": "u", "create_time": "soon"},
            {"msgid": "8", "itemidx": "2", "title": "Missing", "url": "u"}
        ], "continue_flag": 1}}"#;
        let page = parse_listing(body).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "Dated");
        assert_eq!(
            page.next_cursor,
            Some(PageCursor {
                msgid: "8".to_string(),
                item_index: "2".to_string()
            })
        );
    }

    #[test]
    fn null_fields_are_tolerated() {
        let body = br#"{"base_resp": {"ret": 0, "errmsg": null}, "getalbum_resp": {
            "article_list": [{"msgid": "3", "itemidx": null, "title": null, "url": null, "create_time": 1735732800}],
            "continue_flag": null
        }}"#;
        let page = parse_listing(body).unwrap();
        assert!(!page.has_more);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "");
        assert_eq!(page.items[0].url, "");
        assert_eq!(page.items[0].item_index, "");
    }

    #[test]
    fn garbage_is_malformed() {
        let err = parse_listing(b"<html>captcha</html>").unwrap_err();
        assert_eq!(err.kind, FailureKind::MalformedResponse);
        let err = parse_listing(br#"{"something": "else"}"#).unwrap_err();
        assert_eq!(err.kind, FailureKind::MalformedResponse);
    }
}
