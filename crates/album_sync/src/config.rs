//! Collection table: which remote album mirrors into which directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use album_engine::RemoteCollection;
use album_logging::album_warn;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid collection table: {0}")]
    Json(#[from] serde_json::Error),
    #[error("collection {name}: bad album url: {reason}")]
    InvalidAlbumUrl { name: String, reason: String },
    #[error("collection {0}: needs an id or an album url")]
    MissingId(String),
    #[error("unknown collection {0}")]
    UnknownCollection(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollectionEntry {
    #[serde(default)]
    pub id: Option<String>,
    pub output_directory: PathBuf,
    /// `__biz` of the publishing account.
    #[serde(default)]
    pub account: Option<String>,
    /// Shared album link; supplies both account and id.
    #[serde(default)]
    pub url: Option<String>,
}

/// A collection ready to hand to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCollection {
    pub name: String,
    pub remote: RemoteCollection,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CollectionsConfig {
    collections: BTreeMap<String, CollectionEntry>,
}

impl CollectionsConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn resolve(&self, name: &str) -> Result<ResolvedCollection, ConfigError> {
        let entry = self
            .collections
            .get(name)
            .ok_or_else(|| ConfigError::UnknownCollection(name.to_string()))?;
        resolve_entry(name, entry)
    }

    pub fn resolve_all(&self) -> Result<Vec<ResolvedCollection>, ConfigError> {
        self.collections
            .iter()
            .map(|(name, entry)| resolve_entry(name, entry))
            .collect()
    }
}

fn resolve_entry(name: &str, entry: &CollectionEntry) -> Result<ResolvedCollection, ConfigError> {
    let from_url = match &entry.url {
        Some(url) => Some(RemoteCollection::from_album_url(url).map_err(|err| {
            ConfigError::InvalidAlbumUrl {
                name: name.to_string(),
                reason: err.to_string(),
            }
        })?),
        None => None,
    };

    let album_id = entry
        .id
        .clone()
        .or_else(|| from_url.as_ref().map(|remote| remote.album_id.clone()))
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ConfigError::MissingId(name.to_string()))?;
    let account = entry
        .account
        .clone()
        .or_else(|| from_url.map(|remote| remote.account))
        .unwrap_or_else(|| {
            album_warn!("collection {name} has no account; requests go out without __biz");
            String::new()
        });

    Ok(ResolvedCollection {
        name: name.to_string(),
        remote: RemoteCollection::new(account, album_id),
        output_dir: entry.output_directory.clone(),
    })
}
