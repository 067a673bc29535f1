#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use album_engine::{
    FailureKind, FetchError, ListingSettings, RetryPolicy, Sleeper, SyncSettings, Transport,
    TransportResponse,
};
use chrono::{FixedOffset, NaiveDate, TimeZone};
use serde_json::json;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(album_logging::initialize_for_tests);
}

pub fn cst() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

/// Noon on the given day at UTC+08:00, as unix seconds.
pub fn noon(y: i32, m: u32, d: u32) -> i64 {
    let naive = NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    cst().from_local_datetime(&naive).unwrap().timestamp()
}

#[derive(Debug, Clone)]
pub struct WireItem {
    pub msgid: String,
    pub itemidx: String,
    pub title: String,
    pub url: String,
    pub create_time: i64,
}

pub fn item(msgid: u64, title: &str, url: &str, create_time: i64) -> WireItem {
    WireItem {
        msgid: msgid.to_string(),
        itemidx: "1".to_string(),
        title: title.to_string(),
        url: url.to_string(),
        create_time,
    }
}

pub fn listing_body(items: &[WireItem], has_more: bool) -> String {
    let list: Vec<_> = items
        .iter()
        .map(|i| {
            json!({
                "msgid": i.msgid,
                "itemidx": i.itemidx,
                "title": i.title,
                "url": i.url,
                "create_time": i.create_time.to_string(),
            })
        })
        .collect();
    json!({
        "base_resp": { "ret": 0 },
        "getalbum_resp": {
            "article_list": list,
            "continue_flag": if has_more { "1" } else { "0" },
        }
    })
    .to_string()
}

pub fn ok_body(body: impl Into<String>) -> Result<TransportResponse, FetchError> {
    Ok(TransportResponse {
        final_url: "http://fake/".to_string(),
        content_type: Some("application/json".to_string()),
        body: body.into().into_bytes(),
    })
}

pub fn query_map(query: &[(String, String)]) -> HashMap<String, String> {
    query.iter().cloned().collect()
}

/// Serves a fixed listing page by page, following `begin_msgid`.
pub struct PagedListing {
    items: Vec<WireItem>,
    pub calls: Mutex<Vec<HashMap<String, String>>>,
    /// 1-based page number that fails every time it is requested.
    pub failing_page: Option<usize>,
}

impl PagedListing {
    pub fn new(items: Vec<WireItem>) -> Self {
        Self {
            items,
            calls: Mutex::new(Vec::new()),
            failing_page: None,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Transport for PagedListing {
    async fn get(
        &self,
        _url: &str,
        query: &[(String, String)],
    ) -> Result<TransportResponse, FetchError> {
        let params = query_map(query);
        self.calls.lock().unwrap().push(params.clone());
        let count: usize = params["count"].parse().unwrap();
        let start = match params.get("begin_msgid") {
            Some(msgid) => {
                self.items
                    .iter()
                    .position(|i| &i.msgid == msgid)
                    .expect("cursor points at a served item")
                    + 1
            }
            None => 0,
        };
        if self.failing_page == Some(start / count + 1) {
            return Err(FetchError::new(FailureKind::HttpStatus(503), "unavailable"));
        }
        let end = (start + count).min(self.items.len());
        ok_body(listing_body(&self.items[start..end], end < self.items.len()))
    }
}

/// Fails every request with the given kind.
pub struct AlwaysFailing {
    pub kind: FailureKind,
    pub calls: Mutex<usize>,
}

impl AlwaysFailing {
    pub fn new(kind: FailureKind) -> Self {
        Self {
            kind,
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Transport for AlwaysFailing {
    async fn get(
        &self,
        _url: &str,
        _query: &[(String, String)],
    ) -> Result<TransportResponse, FetchError> {
        *self.calls.lock().unwrap() += 1;
        Err(FetchError::new(self.kind.clone(), "scripted failure"))
    }
}

/// Records requested pauses instead of waiting.
#[derive(Default)]
pub struct RecordingSleeper {
    pub pauses: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}

pub fn recording_sleeper() -> Arc<RecordingSleeper> {
    Arc::new(RecordingSleeper::default())
}

/// Settings with millisecond waits so real-time tests stay fast.
pub fn fast_settings() -> SyncSettings {
    SyncSettings {
        listing: ListingSettings {
            page_size: 20,
            inter_page_delay: Duration::ZERO,
            retry: RetryPolicy::new(2, Duration::from_millis(1)),
        },
        content_retry: RetryPolicy::new(2, Duration::from_millis(1)),
        inter_item_delay: Duration::ZERO,
        publish_offset: cst(),
        ..SyncSettings::default()
    }
}
