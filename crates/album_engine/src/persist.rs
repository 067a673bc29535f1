use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot use output directory {path:?}: {reason}")]
    OutputDir { path: PathBuf, reason: String },
    #[error("writing {path:?} failed: {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// What to do when the target file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    KeepExisting,
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Replaced,
    /// The file existed and the policy kept it untouched.
    Kept,
}

/// Create `dir` (and parents) unless it already is a directory.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let failed = |reason: String| PersistError::OutputDir {
        path: dir.to_path_buf(),
        reason,
    };
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(failed("not a directory".to_string())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|err| failed(err.to_string()))
        }
        Err(err) => Err(failed(err.to_string())),
    }
}

/// Writes article files into one directory through a temp file and rename, so a
/// failed write never leaves a partial article behind.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(
        &self,
        filename: &str,
        content: &str,
        policy: WritePolicy,
    ) -> Result<(PathBuf, WriteOutcome), PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let existed = target.is_file();
        if existed && policy == WritePolicy::KeepExisting {
            return Ok((target, WriteOutcome::Kept));
        }

        let io_err = |source: io::Error| PersistError::Io {
            path: target.clone(),
            source,
        };
        let mut staged = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        staged.write_all(content.as_bytes()).map_err(io_err)?;
        staged.as_file().sync_all().map_err(io_err)?;
        // persist renames over an existing target
        staged.persist(&target).map_err(|err| io_err(err.error))?;

        let outcome = if existed {
            WriteOutcome::Replaced
        } else {
            WriteOutcome::Created
        };
        Ok((target, outcome))
    }
}
