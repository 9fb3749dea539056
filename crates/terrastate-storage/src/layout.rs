//! On-disk layout of the state directory.
//!
//! Per environment `e` the directory holds:
//! - `{e}-tfstate.json`: the pretty-printed state document
//! - `{e}-tfstate.lock`: the lock marker (presence is the lock)
//!
//! plus short-lived `.{e}-tfstate.json.*` temporaries while a write is in
//! flight.

use std::fs;
use std::path::{Path, PathBuf};

use terrastate_core::Environment;

use crate::error::StorageError;

const STATE_SUFFIX: &str = "-tfstate.json";
const LOCK_SUFFIX: &str = "-tfstate.lock";

/// The directory all documents and lock markers live in.
#[derive(Debug, Clone)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    /// Opens `root`, creating it (and any parents) if it does not exist.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        if root.exists() {
            if !root.is_dir() {
                return Err(StorageError::NotADirectory(root));
            }
        } else {
            create_dir_all(&root).map_err(|e| StorageError::io(&root, e))?;
        }
        Ok(StateDir { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document file for `env`.
    pub fn state_file(&self, env: &Environment) -> PathBuf {
        self.root.join(format!("{env}{STATE_SUFFIX}"))
    }

    /// Path of the lock marker for `env`.
    pub fn lock_file(&self, env: &Environment) -> PathBuf {
        self.root.join(format!("{env}{LOCK_SUFFIX}"))
    }

    /// File-name prefix for in-flight temporaries of `env`'s document.
    pub(crate) fn temp_prefix(&self, env: &Environment) -> String {
        format!(".{env}{STATE_SUFFIX}.")
    }

    /// Flushes directory entries so a completed rename survives a crash.
    ///
    /// Best effort: not every platform lets a directory be opened for sync.
    pub(crate) fn sync(&self) {
        #[cfg(unix)]
        if let Ok(dir) = fs::File::open(&self.root) {
            let _ = dir.sync_all();
        }
    }
}

#[cfg(unix)]
fn create_dir_all(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o744).create(path)
}

#[cfg(not(unix))]
fn create_dir_all(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)
}
