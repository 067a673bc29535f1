//! Cheap "is anything new" check.
//!
//! Ordering at the newest boundary of the listing is not trusted: the endpoint
//! is sampled once in its default order and once reversed, and the two answers
//! are reconciled by publish timestamp. Never rely on either order alone.

use album_core::{Article, Catalog, Freshness};
use album_logging::{album_debug, album_info, album_warn};
use chrono::FixedOffset;

use crate::client::RemoteCollectionClient;

pub struct ChangeDetector<'a> {
    client: &'a RemoteCollectionClient,
    offset: FixedOffset,
}

impl<'a> ChangeDetector<'a> {
    pub fn new(client: &'a RemoteCollectionClient, offset: FixedOffset) -> Self {
        Self { client, offset }
    }

    /// Newest article among the two single-item samples, or `None` if both failed.
    pub async fn newest_remote(&self) -> Option<Article> {
        let default_order = self.sample(None).await;
        let reversed = self.sample(Some(true)).await;
        match (default_order, reversed) {
            (Some(a), Some(b)) => Some(if b.publish_time > a.publish_time { b } else { a }),
            (Some(a), None) | (None, Some(a)) => Some(a),
            (None, None) => None,
        }
    }

    pub async fn is_local_up_to_date(&self, catalog: &Catalog) -> Freshness {
        let newest = self.newest_remote().await;
        let freshness = Freshness::evaluate(newest, catalog, self.offset);
        album_info!(
            "remote newest {:?}, local newest {:?}, up to date: {}",
            freshness
                .remote_newest
                .as_ref()
                .map(|a| a.publish_date(self.offset)),
            freshness.local_newest,
            freshness.up_to_date
        );
        freshness
    }

    async fn sample(&self, order_hint: Option<bool>) -> Option<Article> {
        let attempts = self.client.settings().retry.max_attempts;
        match self.client.fetch_page(None, 1, order_hint, attempts).await {
            Ok(page) => {
                let first = page.items.into_iter().next();
                album_debug!(
                    "sample (reversed: {order_hint:?}) -> {:?}",
                    first.as_ref().map(|a| (&a.title, a.publish_time))
                );
                first
            }
            Err(err) => {
                album_warn!("sample (reversed: {order_hint:?}) failed: {err}");
                None
            }
        }
    }
}
