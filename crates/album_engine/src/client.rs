use std::sync::Arc;
use std::time::Duration;

use album_core::{Article, Page, PageCursor};
use album_logging::{album_info, album_warn};
use url::Url;

use crate::retry::{with_retry, RetryPolicy, Sleeper, TokioSleeper};
use crate::transport::Transport;
use crate::wire::parse_listing;
use crate::{FailureKind, FetchError};

pub const DEFAULT_LISTING_ENDPOINT: &str = "https://mp.weixin.qq.com/mp/appmsgalbum";

/// Remote identifiers of one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCollection {
    /// Publishing account (`__biz`).
    pub account: String,
    pub album_id: String,
    pub listing_endpoint: String,
}

impl RemoteCollection {
    pub fn new(account: impl Into<String>, album_id: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            album_id: album_id.into(),
            listing_endpoint: DEFAULT_LISTING_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.listing_endpoint = endpoint.into();
        self
    }

    /// Read `__biz` and `album_id` from a shared album link.
    pub fn from_album_url(album_url: &str) -> Result<Self, FetchError> {
        let url = Url::parse(album_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let mut account = None;
        let mut album_id = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "__biz" => account = Some(value.into_owned()),
                "album_id" => album_id = Some(value.into_owned()),
                _ => {}
            }
        }
        match (account, album_id) {
            (Some(account), Some(album_id)) if !album_id.is_empty() => {
                Ok(Self::new(account, album_id))
            }
            _ => Err(FetchError::new(
                FailureKind::InvalidUrl,
                "album url needs __biz and album_id",
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListingSettings {
    pub page_size: u32,
    /// Pause between consecutive pages.
    pub inter_page_delay: Duration,
    pub retry: RetryPolicy,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            page_size: 20,
            inter_page_delay: Duration::from_secs(1),
            retry: RetryPolicy::listing(),
        }
    }
}

/// Walks the paginated listing of one collection.
///
/// Pagination is strictly sequential: each request needs the cursor of the last
/// item of the previous page. Nothing is kept between calls.
pub struct RemoteCollectionClient {
    collection: RemoteCollection,
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
    settings: ListingSettings,
}

impl RemoteCollectionClient {
    pub fn new(
        collection: RemoteCollection,
        transport: Arc<dyn Transport>,
        settings: ListingSettings,
    ) -> Self {
        Self {
            collection,
            transport,
            sleeper: Arc::new(TokioSleeper),
            settings,
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn collection(&self) -> &RemoteCollection {
        &self.collection
    }

    pub fn settings(&self) -> &ListingSettings {
        &self.settings
    }

    /// Fetch one page. The cursor is sent only when present and the order hint
    /// only when given; without it the server picks its default order.
    pub async fn fetch_page(
        &self,
        cursor: Option<&PageCursor>,
        page_size: u32,
        order_hint: Option<bool>,
        max_attempts: u32,
    ) -> Result<Page, FetchError> {
        let query = self.listing_query(cursor, page_size, order_hint);
        let policy = self.settings.retry.with_max_attempts(max_attempts);
        let transport = self.transport.as_ref();
        let endpoint = self.collection.listing_endpoint.as_str();
        let query = query.as_slice();
        with_retry(&policy, self.sleeper.as_ref(), "listing page", |_| async move {
            let response = transport.get(endpoint, query).await?;
            parse_listing(&response.body)
        })
        .await
    }

    /// Walk every page from the newest end. A page that exhausts its retries ends
    /// the walk; everything collected before it is still returned.
    pub async fn fetch_all(&self, page_size: u32) -> Vec<Article> {
        let mut all: Vec<Article> = Vec::new();
        let mut cursor: Option<PageCursor> = None;
        let mut page_number = 1;

        loop {
            let page = match self
                .fetch_page(
                    cursor.as_ref(),
                    page_size,
                    None,
                    self.settings.retry.max_attempts,
                )
                .await
            {
                Ok(page) => page,
                Err(err) => {
                    album_warn!(
                        "listing page {page_number} failed, keeping {} items: {err}",
                        all.len()
                    );
                    break;
                }
            };

            let Page {
                items,
                has_more,
                next_cursor,
            } = page;
            let received = items.len();
            let offset = all.len();
            all.extend(items.into_iter().map(|mut article| {
                article.sequence_position += offset;
                article
            }));
            album_info!(
                "listing page {page_number}: {received} items ({} total)",
                all.len()
            );

            // An empty page has no cursor.
            let Some(next) = next_cursor else {
                break;
            };
            if !has_more {
                break;
            }
            if cursor.as_ref() == Some(&next) {
                album_warn!("listing cursor did not advance at page {page_number}, stopping");
                break;
            }
            cursor = Some(next);
            page_number += 1;
            self.sleeper.sleep(self.settings.inter_page_delay).await;
        }

        all
    }

    fn listing_query(
        &self,
        cursor: Option<&PageCursor>,
        page_size: u32,
        order_hint: Option<bool>,
    ) -> Vec<(String, String)> {
        let mut query = vec![
            ("__biz".to_string(), self.collection.account.clone()),
            ("action".to_string(), "getalbum".to_string()),
            ("album_id".to_string(), self.collection.album_id.clone()),
            ("count".to_string(), page_size.to_string()),
            ("f".to_string(), "json".to_string()),
        ];
        if let Some(reversed) = order_hint {
            query.push((
                "is_reverse".to_string(),
                if reversed { "1" } else { "0" }.to_string(),
            ));
        }
        if let Some(cursor) = cursor {
            query.push(("begin_msgid".to_string(), cursor.msgid.clone()));
            query.push(("begin_itemidx".to_string(), cursor.item_index.clone()));
        }
        query
    }
}
