//! Per-environment exclusive locks backed by marker files.
//!
//! [`LockManager`] provides one lock per environment with two states,
//! unlocked and locked. The lock is the marker file itself: acquiring
//! creates it with `create_new` (`O_CREAT | O_EXCL`), which the kernel
//! performs as a single test-and-set, and releasing removes it. Because no
//! state lives in memory, independent processes sharing the directory see
//! the same locks.
//!
//! The marker's content is a [`LockInfo`] describing the holder. It is
//! informational only; presence of the file is the lock.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use terrastate_core::Environment;

use crate::error::StorageError;
use crate::layout::StateDir;

/// Holder metadata written into a lock marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    /// Random id of this acquisition.
    pub id: Uuid,
    pub environment: String,
    /// Process that created the marker.
    pub pid: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub acquired_at: DateTime<Utc>,
}

impl LockInfo {
    fn for_current_process(env: &Environment) -> Self {
        LockInfo {
            id: Uuid::new_v4(),
            environment: env.to_string(),
            pid: std::process::id(),
            hostname: std::env::var("HOSTNAME").ok().filter(|h| !h.is_empty()),
            acquired_at: Utc::now(),
        }
    }
}

/// Snapshot of one environment's lock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockStatus {
    pub locked: bool,
    /// `None` when unlocked, or when the marker's content is unreadable.
    pub holder: Option<LockInfo>,
}

/// Grants and releases per-environment locks in a [`StateDir`].
#[derive(Debug, Clone)]
pub struct LockManager {
    dir: StateDir,
}

impl LockManager {
    pub fn new(dir: StateDir) -> Self {
        LockManager { dir }
    }

    /// Locks `env`, failing with [`StorageError::AlreadyLocked`] if a marker
    /// already exists.
    pub fn acquire(&self, env: &Environment) -> Result<LockInfo, StorageError> {
        let path = self.dir.lock_file(env);
        let mut marker = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyLocked(env.clone()))
            }
            Err(e) => return Err(StorageError::io(path, e)),
        };

        let info = LockInfo::for_current_process(env);
        let written = serde_json::to_vec_pretty(&info)
            .map_err(std::io::Error::from)
            .and_then(|bytes| marker.write_all(&bytes))
            .and_then(|()| marker.sync_all());
        if let Err(e) = written {
            // The marker is ours; remove it so a failed acquire leaves no lock.
            drop(marker);
            let _ = fs::remove_file(&path);
            return Err(StorageError::io(path, e));
        }

        self.dir.sync();
        Ok(info)
    }

    /// Unlocks `env`, failing with [`StorageError::NotLocked`] if there is
    /// no marker.
    pub fn release(&self, env: &Environment) -> Result<(), StorageError> {
        let path = self.dir.lock_file(env);
        match fs::remove_file(&path) {
            Ok(()) => {
                self.dir.sync();
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotLocked(env.clone())),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    /// Reads the current lock state of `env` without changing it.
    pub fn status(&self, env: &Environment) -> Result<LockStatus, StorageError> {
        let path = self.dir.lock_file(env);
        match fs::read(&path) {
            Ok(bytes) => Ok(LockStatus {
                locked: true,
                holder: serde_json::from_slice(&bytes).ok(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(LockStatus {
                locked: false,
                holder: None,
            }),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }
}
