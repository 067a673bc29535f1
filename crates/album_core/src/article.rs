use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

use crate::filename::sanitize_title;

/// One item of a remote collection listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Remote message id (`msgid`), half of the continuation cursor.
    pub remote_id: String,
    /// Position inside the remote message (`itemidx`).
    pub item_index: String,
    pub title: String,
    pub url: String,
    /// Unix seconds.
    pub publish_time: i64,
    /// Position in the order the listing was served, starting at 0.
    pub sequence_position: usize,
}

impl Article {
    /// Cursor that resumes the listing right after this item.
    pub fn cursor(&self) -> PageCursor {
        PageCursor {
            msgid: self.remote_id.clone(),
            item_index: self.item_index.clone(),
        }
    }

    pub fn published_at(&self, offset: FixedOffset) -> DateTime<FixedOffset> {
        DateTime::<Utc>::from_timestamp(self.publish_time, 0)
            .unwrap_or_default()
            .with_timezone(&offset)
    }

    pub fn publish_date(&self, offset: FixedOffset) -> NaiveDate {
        self.published_at(offset).date_naive()
    }

    /// Dedup identity: publish date plus sanitized title. The remote id is not used.
    pub fn key(&self, offset: FixedOffset) -> CatalogKey {
        CatalogKey {
            date: self.publish_date(offset),
            title: sanitize_title(&self.title),
        }
    }
}

/// Opaque continuation token; `None` in place of a cursor means "start at the newest end".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    pub msgid: String,
    pub item_index: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub items: Vec<Article>,
    pub has_more: bool,
    /// Cursor after the last entry the server sent, including entries dropped
    /// as unreadable. `None` for an empty page.
    pub next_cursor: Option<PageCursor>,
}

/// `(publish_date, sanitized_title)` identity shared by remote articles and catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CatalogKey {
    pub date: NaiveDate,
    pub title: String,
}

/// Default offset for deriving publish dates (UTC+08:00).
pub fn default_publish_offset() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap_or(Utc.fix())
}
