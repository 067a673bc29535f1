use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use album_core::Catalog;
use album_logging::{album_debug, album_warn};

/// Source of the dedup catalog for one output directory.
pub trait CatalogStore: Send + Sync {
    fn load(&self) -> Catalog;
}

/// Catalog derived from the article files currently in a directory.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    dir: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl CatalogStore for DirectoryCatalog {
    fn load(&self) -> Catalog {
        match scan_directory(&self.dir) {
            Ok(catalog) => {
                album_debug!("catalog of {:?}: {} articles", self.dir, catalog.len());
                catalog
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Catalog::new(),
            Err(err) => {
                album_warn!("could not scan {:?}, treating as empty: {}", self.dir, err);
                Catalog::new()
            }
        }
    }
}

/// List regular files in `dir` and keep those named like articles.
pub fn scan_directory(dir: &Path) -> io::Result<Catalog> {
    let names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    Ok(Catalog::from_filenames(names))
}
