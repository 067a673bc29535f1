//! Album core: pure domain types, catalog rules and the sync state machine.
mod article;
mod catalog;
mod effect;
mod filename;
mod msg;
mod state;
mod update;

pub use article::{default_publish_offset, Article, CatalogKey, Page, PageCursor};
pub use catalog::{Catalog, CatalogEntry};
pub use effect::{Effect, SkipReason};
pub use filename::{
    canonical_filename, parse_catalog_filename, sanitize_title, ARTICLE_EXTENSION,
    MAX_TITLE_CHARS, RESERVED_FILENAMES,
};
pub use msg::Msg;
pub use state::{
    Freshness, Phase, PlannedItem, ProcessingOrder, SyncMode, SyncResult, SyncState, SyncStatus,
};
pub use update::update;
