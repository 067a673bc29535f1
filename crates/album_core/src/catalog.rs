use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::article::CatalogKey;
use crate::filename::parse_catalog_filename;

/// An already-persisted article, derived from its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub publish_date: NaiveDate,
    pub title: String,
    pub filename: String,
}

impl CatalogEntry {
    pub fn key(&self) -> CatalogKey {
        CatalogKey {
            date: self.publish_date,
            title: self.title.clone(),
        }
    }
}

/// Dedup index of one output directory, keyed by file name.
///
/// The catalog is recomputed from the directory contents on every run and never
/// persisted on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
    keys: HashSet<CatalogKey>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from raw file names, silently skipping names that do not parse.
    pub fn from_filenames<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::new();
        for name in names {
            if let Some(entry) = parse_catalog_filename(name.as_ref()) {
                catalog.insert(entry);
            }
        }
        catalog
    }

    pub fn insert(&mut self, entry: CatalogEntry) {
        self.keys.insert(entry.key());
        self.entries.insert(entry.filename.clone(), entry);
    }

    pub fn contains(&self, key: &CatalogKey) -> bool {
        self.keys.contains(key)
    }

    pub fn contains_filename(&self, filename: &str) -> bool {
        self.entries.contains_key(filename)
    }

    /// Latest publish date present, from file names only.
    pub fn newest_date(&self) -> Option<NaiveDate> {
        self.entries.values().map(|e| e.publish_date).max()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
