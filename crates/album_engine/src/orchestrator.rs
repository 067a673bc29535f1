use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use album_core::{
    default_publish_offset, update, Article, Effect, Msg, PlannedItem, ProcessingOrder,
    SkipReason, SyncMode, SyncResult, SyncState, SyncStatus,
};
use album_logging::{album_info, album_warn, set_collection_scope};
use chrono::{FixedOffset, NaiveDate};

use crate::catalog_store::{CatalogStore, DirectoryCatalog};
use crate::client::{ListingSettings, RemoteCollection, RemoteCollectionClient};
use crate::detector::ChangeDetector;
use crate::document::build_article_document;
use crate::extract::{ContentExtractor, Extractor};
use crate::pages::ArticleFetcher;
use crate::persist::{AtomicFileWriter, WriteOutcome, WritePolicy};
use crate::retry::{RetryPolicy, Sleeper, TokioSleeper};
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub listing: ListingSettings,
    /// Retry policy for article pages, kept apart from the listing policy.
    pub content_retry: RetryPolicy,
    /// Pause after every stored item to stay under the remote rate limit.
    pub inter_item_delay: Duration,
    pub order: ProcessingOrder,
    pub publish_offset: FixedOffset,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            listing: ListingSettings::default(),
            content_retry: RetryPolicy::content(),
            inter_item_delay: Duration::from_secs(2),
            order: ProcessingOrder::NewestFirst,
            publish_offset: default_publish_offset(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub collection: String,
    pub status: SyncStatus,
    pub result: SyncResult,
    pub remote_newest: Option<Article>,
    pub local_newest: Option<NaiveDate>,
}

/// Runs one incremental sync of one collection into one output directory.
///
/// `run` always returns a report; page, item and write failures are folded into
/// the counters.
pub struct SyncOrchestrator {
    name: String,
    client: RemoteCollectionClient,
    pages: ArticleFetcher,
    extractor: Box<dyn Extractor>,
    catalog: Box<dyn CatalogStore>,
    writer: AtomicFileWriter,
    sleeper: Arc<dyn Sleeper>,
    settings: SyncSettings,
}

impl SyncOrchestrator {
    pub fn new(
        name: impl Into<String>,
        collection: RemoteCollection,
        output_dir: impl Into<PathBuf>,
        transport: Arc<dyn Transport>,
        settings: SyncSettings,
    ) -> Self {
        let output_dir = output_dir.into();
        let sleeper: Arc<dyn Sleeper> = Arc::new(TokioSleeper);
        Self {
            name: name.into(),
            client: RemoteCollectionClient::new(
                collection,
                transport.clone(),
                settings.listing.clone(),
            ),
            pages: ArticleFetcher::new(transport, settings.content_retry),
            extractor: Box::new(ContentExtractor::default()),
            catalog: Box::new(DirectoryCatalog::new(output_dir.clone())),
            writer: AtomicFileWriter::new(output_dir),
            sleeper,
            settings,
        }
    }

    /// Route every pause (backoff, page and item delays) through `sleeper`.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.client = self.client.with_sleeper(sleeper.clone());
        self.pages = self.pages.with_sleeper(sleeper.clone());
        self.sleeper = sleeper;
        self
    }

    pub fn with_catalog_store(mut self, catalog: Box<dyn CatalogStore>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_extractor(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn output_dir(&self) -> &Path {
        self.writer.dir()
    }

    pub async fn run(&self, mode: SyncMode) -> SyncReport {
        set_collection_scope(Some(&self.name));
        album_info!("sync started ({mode:?}) into {:?}", self.output_dir());

        let offset = self.settings.publish_offset;
        let mut state = SyncState::new(mode, self.catalog.load())
            .with_order(self.settings.order)
            .with_offset(offset);
        let mut inbox = VecDeque::from([Msg::Start]);
        let mut status = SyncStatus::Synced;

        while let Some(msg) = inbox.pop_front() {
            let (next, effects) = update(state, msg);
            state = next;
            for effect in effects {
                match effect {
                    Effect::CheckRemote => {
                        let freshness = ChangeDetector::new(&self.client, offset)
                            .is_local_up_to_date(state.catalog())
                            .await;
                        inbox.push_back(Msg::CheckCompleted(freshness));
                    }
                    Effect::FetchListing => {
                        let articles = self.client.fetch_all(self.settings.listing.page_size).await;
                        album_info!("listing complete: {} articles", articles.len());
                        inbox.push_back(Msg::ListingCompleted(articles));
                    }
                    Effect::FetchItem { index, item } => {
                        let total = state.planned().len();
                        let policy = if mode.skips_existing() {
                            WritePolicy::KeepExisting
                        } else {
                            WritePolicy::Replace
                        };
                        inbox.push_back(self.process_item(index, total, &item, policy).await);
                    }
                    Effect::ReportSkip { filename, reason } => match reason {
                        SkipReason::AlreadyStored => {
                            if state.catalog().contains_filename(&filename) {
                                album_info!("skip (exists): {filename}")
                            } else {
                                album_info!("skip (stored under an older name): {filename}")
                            }
                        }
                        SkipReason::DuplicateInListing => {
                            album_info!("skip (duplicate in listing): {filename}")
                        }
                    },
                    Effect::Finish { status: finished } => status = finished,
                }
            }
        }

        let result = state.result();
        album_info!(
            "sync finished ({status:?}): success {}, failed {}, skipped {}",
            result.success_count,
            result.fail_count,
            result.skip_count
        );
        set_collection_scope(None);

        let (remote_newest, local_newest) = match state.freshness() {
            Some(freshness) => (freshness.remote_newest.clone(), freshness.local_newest),
            None => (None, state.catalog().newest_date()),
        };
        SyncReport {
            collection: self.name.clone(),
            status,
            result,
            remote_newest,
            local_newest,
        }
    }

    async fn process_item(
        &self,
        index: usize,
        total: usize,
        item: &PlannedItem,
        policy: WritePolicy,
    ) -> Msg {
        let article = &item.article;
        album_info!("[{}/{total}] fetching: {}", index + 1, article.title);

        if article.url.trim().is_empty() {
            return failed(index, "article has no url".to_string());
        }

        let page = match self.pages.fetch(&article.url).await {
            Ok(page) => page,
            Err(err) => return failed(index, err.to_string()),
        };

        let body = self.extractor.extract(&page.html);
        if body.is_empty() {
            album_warn!("no content region found in {}", article.url);
        }
        let document = build_article_document(
            &article.title,
            article.published_at(self.settings.publish_offset),
            &article.url,
            &body,
        );

        match self.writer.write(&item.filename, &document, policy) {
            Ok((path, outcome)) => {
                if outcome == WriteOutcome::Kept {
                    album_info!("kept existing file {path:?}");
                }
                self.sleeper.sleep(self.settings.inter_item_delay).await;
                Msg::ItemStored { index }
            }
            Err(err) => failed(index, err.to_string()),
        }
    }
}

fn failed(index: usize, reason: String) -> Msg {
    album_warn!("item {} failed: {reason}", index + 1);
    Msg::ItemFailed { index, reason }
}
