//! Advisory file locks guarding read-modify-write cycles.
//!
//! Responsibilities:
//! - Acquire an exclusive `fs2` lock on `<file>.lock`.
//! - Release it when the guard drops, on every exit path.
//!
//! Does NOT handle:
//! - Timeouts. Acquisition blocks until the holder releases.
//!
//! Invariants:
//! - The lock file sits next to the guarded file and is never removed.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

/// Path of the lock file guarding `path`.
pub fn lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

/// Holds an exclusive lock until dropped.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Block until the exclusive lock for `path` is held.
    pub fn acquire(path: &Path) -> std::io::Result<Self> {
        let lock_path = lock_path(path);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        file.lock_exclusive()?;
        tracing::debug!(path = %lock_path.display(), "acquired lock");
        Ok(Self {
            file,
            path: lock_path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release lock");
        } else {
            tracing::debug!(path = %self.path.display(), "released lock");
        }
    }
}
