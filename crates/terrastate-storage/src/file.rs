//! File-backed implementation of [`StateStore`].
//!
//! [`FileStore`] keeps one pretty-printed JSON file per environment. Writes
//! never touch the live file in place: the new document is written and
//! synced to a temporary file in the same directory, then renamed over the
//! old one. A crash mid-write leaves the previous document intact.

use std::fs;
use std::io::{ErrorKind, Write};

use terrastate_core::{Environment, StateDocument};

use crate::error::StorageError;
use crate::layout::StateDir;
use crate::traits::StateStore;

/// State documents stored as files in a [`StateDir`].
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: StateDir,
}

impl FileStore {
    pub fn new(dir: StateDir) -> Self {
        FileStore { dir }
    }
}

impl StateStore for FileStore {
    fn get(&self, env: &Environment) -> Result<StateDocument, StorageError> {
        let path = self.dir.state_file(env);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StateDocument::default()),
            Err(e) => return Err(StorageError::io(path, e)),
        };
        serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt { path, source })
    }

    fn put(&self, env: &Environment, doc: StateDocument) -> Result<StateDocument, StorageError> {
        let mut bytes = serde_json::to_vec_pretty(&doc)?;
        bytes.push(b'\n');

        let root = self.dir.root();
        let mut tmp = tempfile::Builder::new()
            .prefix(&self.dir.temp_prefix(env))
            .tempfile_in(root)
            .map_err(|e| StorageError::io(root, e))?;
        tmp.write_all(&bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| StorageError::io(tmp.path(), e))?;

        // Dropping `tmp` on any error above removes the temporary file.
        let path = self.dir.state_file(env);
        tmp.persist(&path)
            .map_err(|e| StorageError::io(&path, e.error))?;
        self.dir.sync();

        Ok(doc)
    }

    fn delete(&self, env: &Environment) -> Result<bool, StorageError> {
        let path = self.dir.state_file(env);
        match fs::remove_file(&path) {
            Ok(()) => {
                self.dir.sync();
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }
}
