use std::path::{Path, PathBuf};

use album_core::canonical_filename;
use album_logging::album_info;
use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use thiserror::Error;

use crate::document::build_article_document;
use crate::extract::Extractor;
use crate::metadata::{page_publish_time, page_title};
use crate::pages::ArticleFetcher;
use crate::persist::{AtomicFileWriter, PersistError, WritePolicy};
use crate::FetchError;

const UNTITLED_ARTICLE: &str = "untitled";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("write failed: {0}")]
    Persist(#[from] PersistError),
}

/// Caller-supplied replacements for what the page itself says.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOverrides {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Fetch one article page outside any collection and store it like a synced item.
/// An existing file with the same name is replaced.
pub async fn import_article(
    fetcher: &ArticleFetcher,
    extractor: &dyn Extractor,
    url: &str,
    output_dir: &Path,
    overrides: &ImportOverrides,
    offset: FixedOffset,
) -> Result<PathBuf, ImportError> {
    let page = fetcher.fetch(url).await?;

    let title = overrides
        .title
        .clone()
        .or_else(|| page_title(&page.html))
        .unwrap_or_else(|| UNTITLED_ARTICLE.to_string());

    let published_at = match overrides.date {
        Some(date) => date
            .and_hms_opt(0, 0, 0)
            .and_then(|midnight| offset.from_local_datetime(&midnight).single())
            .unwrap_or_else(|| Utc::now().with_timezone(&offset)),
        None => page_publish_time(&page.html, offset)
            .unwrap_or_else(|| Utc::now().with_timezone(&offset)),
    };

    let filename = canonical_filename(published_at.date_naive(), &title);
    let body = extractor.extract(&page.html);
    let document = build_article_document(&title, published_at, url, &body);

    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    let (path, outcome) = writer.write(&filename, &document, WritePolicy::Replace)?;
    album_info!("imported {url} as {path:?} ({outcome:?})");
    Ok(path)
}
