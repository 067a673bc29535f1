//! Album engine: remote listing, change detection, extraction and persistence.
mod catalog_store;
mod client;
mod convert;
mod decode;
mod detector;
mod document;
mod extract;
mod import;
mod metadata;
mod orchestrator;
mod pages;
mod persist;
mod retry;
mod transport;
mod types;
mod wire;

pub use catalog_store::{scan_directory, CatalogStore, DirectoryCatalog};
pub use client::{ListingSettings, RemoteCollection, RemoteCollectionClient, DEFAULT_LISTING_ENDPOINT};
pub use convert::{Converter, Html2MdConverter};
pub use decode::{decode_html, DecodedHtml};
pub use detector::ChangeDetector;
pub use document::{build_article_document, CONTENT_UNAVAILABLE};
pub use extract::{locate_content, normalize_text, ContentExtractor, Extractor};
pub use import::{import_article, ImportError, ImportOverrides};
pub use metadata::{page_publish_time, page_title};
pub use orchestrator::{SyncOrchestrator, SyncReport, SyncSettings};
pub use pages::ArticleFetcher;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError, WriteOutcome, WritePolicy};
pub use retry::{with_retry, RetryPolicy, Sleeper, TokioSleeper};
pub use transport::{ReqwestTransport, Transport, TransportResponse, TransportSettings};
pub use types::{FailureKind, FetchError};
