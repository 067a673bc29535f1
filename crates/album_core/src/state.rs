use std::collections::HashSet;

use chrono::{FixedOffset, NaiveDate};

use crate::article::{default_publish_offset, Article, CatalogKey};
use crate::catalog::Catalog;
use crate::effect::{Effect, SkipReason};
use crate::filename::canonical_filename;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Freshness check only; never list or write.
    CheckOnly,
    /// Check freshness, then list and fetch missing items if the catalog is stale.
    #[default]
    Auto,
    /// List without probing and fetch only missing items.
    SkipExisting,
    /// List without probing and rewrite every item.
    Force,
}

impl SyncMode {
    pub fn runs_check(self) -> bool {
        matches!(self, SyncMode::CheckOnly | SyncMode::Auto)
    }

    pub fn skips_existing(self) -> bool {
        !matches!(self, SyncMode::Force)
    }
}

/// Processing order for listed items. Independent of the order the remote served them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Checking,
    UpToDate,
    NeedsListing,
    Listing,
    Fetching { index: usize },
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    UpToDate,
    Stale,
    Synced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncResult {
    pub success_count: usize,
    pub fail_count: usize,
    pub skip_count: usize,
}

/// Outcome of comparing the newest remote article with the local catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Freshness {
    pub up_to_date: bool,
    pub remote_newest: Option<Article>,
    pub local_newest: Option<NaiveDate>,
}

impl Freshness {
    /// Up to date iff the catalog is non-empty and its newest date is not older
    /// than the remote newest date. An unknown remote newest counts as stale.
    pub fn evaluate(remote_newest: Option<Article>, catalog: &Catalog, offset: FixedOffset) -> Self {
        let local_newest = catalog.newest_date();
        let remote_date = remote_newest.as_ref().map(|a| a.publish_date(offset));
        let up_to_date = match (local_newest, remote_date) {
            (Some(local), Some(remote)) => local >= remote,
            _ => false,
        };
        Self {
            up_to_date,
            remote_newest,
            local_newest,
        }
    }
}

/// An item scheduled for processing together with its derived file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedItem {
    pub article: Article,
    pub filename: String,
    pub key: CatalogKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncState {
    mode: SyncMode,
    order: ProcessingOrder,
    offset: FixedOffset,
    catalog: Catalog,
    phase: Phase,
    queue: Vec<PlannedItem>,
    next: usize,
    result: SyncResult,
    freshness: Option<Freshness>,
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new(SyncMode::default(), Catalog::new())
    }
}

impl SyncState {
    pub fn new(mode: SyncMode, catalog: Catalog) -> Self {
        Self {
            mode,
            order: ProcessingOrder::default(),
            offset: default_publish_offset(),
            catalog,
            phase: Phase::Idle,
            queue: Vec::new(),
            next: 0,
            result: SyncResult::default(),
            freshness: None,
        }
    }

    pub fn with_order(mut self, order: ProcessingOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result(&self) -> SyncResult {
        self.result
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn freshness(&self) -> Option<&Freshness> {
        self.freshness.as_ref()
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Items in processing order, after duplicate removal.
    pub fn planned(&self) -> &[PlannedItem] {
        &self.queue
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::UpToDate | Phase::NeedsListing | Phase::Done)
    }

    pub fn status(&self) -> Option<SyncStatus> {
        match self.phase {
            Phase::UpToDate => Some(SyncStatus::UpToDate),
            Phase::NeedsListing => Some(SyncStatus::Stale),
            Phase::Done => Some(SyncStatus::Synced),
            _ => None,
        }
    }

    pub(crate) fn begin(&mut self) -> Vec<Effect> {
        if self.mode.runs_check() {
            self.phase = Phase::Checking;
            vec![Effect::CheckRemote]
        } else {
            self.phase = Phase::Listing;
            vec![Effect::FetchListing]
        }
    }

    pub(crate) fn apply_check(&mut self, freshness: Freshness) -> Vec<Effect> {
        let up_to_date = freshness.up_to_date;
        self.freshness = Some(freshness);
        if up_to_date {
            self.phase = Phase::UpToDate;
            return vec![Effect::Finish {
                status: SyncStatus::UpToDate,
            }];
        }
        if self.mode == SyncMode::CheckOnly {
            self.phase = Phase::NeedsListing;
            return vec![Effect::Finish {
                status: SyncStatus::Stale,
            }];
        }
        self.phase = Phase::Listing;
        vec![Effect::FetchListing]
    }

    /// Drop later items that repeat an earlier identity, then order the rest.
    pub(crate) fn apply_listing(&mut self, articles: Vec<Article>) -> Vec<Effect> {
        let mut effects = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = Vec::with_capacity(articles.len());
        for article in articles {
            let key = article.key(self.offset);
            let filename = canonical_filename(key.date, &key.title);
            if !seen.insert(key.clone()) {
                self.result.skip_count += 1;
                effects.push(Effect::ReportSkip {
                    filename,
                    reason: SkipReason::DuplicateInListing,
                });
                continue;
            }
            queue.push(PlannedItem {
                article,
                filename,
                key,
            });
        }

        match self.order {
            ProcessingOrder::NewestFirst => {
                queue.sort_by(|a, b| b.article.publish_time.cmp(&a.article.publish_time))
            }
            ProcessingOrder::OldestFirst => {
                queue.sort_by(|a, b| a.article.publish_time.cmp(&b.article.publish_time))
            }
        }

        self.queue = queue;
        self.next = 0;
        effects.extend(self.advance());
        effects
    }

    pub(crate) fn apply_item_done(&mut self, index: usize, stored: bool) -> Vec<Effect> {
        if self.phase != (Phase::Fetching { index }) {
            return Vec::new();
        }
        if stored {
            self.result.success_count += 1;
        } else {
            self.result.fail_count += 1;
        }
        self.next = index + 1;
        self.advance()
    }

    /// Move to the next item that needs fetching, skipping catalogued ones.
    fn advance(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Some(item) = self.queue.get(self.next) {
            if self.mode.skips_existing() && self.catalog.contains(&item.key) {
                self.result.skip_count += 1;
                effects.push(Effect::ReportSkip {
                    filename: item.filename.clone(),
                    reason: SkipReason::AlreadyStored,
                });
                self.next += 1;
                continue;
            }
            let index = self.next;
            self.phase = Phase::Fetching { index };
            effects.push(Effect::FetchItem {
                index,
                item: item.clone(),
            });
            return effects;
        }
        self.phase = Phase::Done;
        effects.push(Effect::Finish {
            status: SyncStatus::Synced,
        });
        effects
    }
}
