//! File locking and atomic writes for list files
//!
//! Writers take an advisory exclusive lock (fs2) on a sidecar
//! `<file>.lock`, then replace the file by writing a temp sibling and
//! renaming it into place.
//!
//! The in-process mutex in the registry already serializes writers of one
//! list; the file lock extends that to several processes sharing a data
//! directory.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::error::{Error, Result};

/// Default lock timeout in milliseconds
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5000;

/// Pause between attempts while another holder has the lock
const RETRY_PAUSE: Duration = Duration::from_millis(25);

/// Exclusive advisory lock, released on drop
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Lock `path` (created if missing), waiting at most `timeout_ms`.
    pub fn acquire(path: impl AsRef<Path>, timeout_ms: u64) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        while let Err(err) = file.try_lock_exclusive() {
            if !contended(&err) {
                return Err(Error::Io(err));
            }
            if Instant::now() >= deadline {
                tracing::warn!(path = %path.display(), timeout_ms, "gave up waiting for lock");
                return Err(Error::LockFailed(path.to_path_buf()));
            }
            std::thread::sleep(RETRY_PAUSE);
        }

        Ok(FileLock {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn contended(err: &io::Error) -> bool {
    // Windows reports sharing violations (32, 33) instead of WouldBlock.
    err.kind() == io::ErrorKind::WouldBlock
        || (cfg!(windows) && matches!(err.raw_os_error(), Some(32) | Some(33)))
}

/// Sidecar lock path for a data file: `todos.json` -> `todos.json.lock`
pub fn lock_path_for(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.lock", path.display()))
}

/// Atomically write data to a file
///
/// Writes a temporary sibling file, syncs it, then renames it over the
/// target, so readers see either the old or the new content.
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Same directory, so the rename stays on one filesystem
    let temp_path = path.with_extension(format!(
        "{}.tmp.{}",
        path.extension().and_then(|e| e.to_str()).unwrap_or(""),
        std::process::id()
    ));

    let mut temp_file = File::create(&temp_path)?;
    temp_file.write_all(data)?;
    temp_file.sync_all()?;
    drop(temp_file);

    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::Io(err));
    }

    Ok(())
}

/// Write data atomically while holding `<path>.lock`
pub fn write_atomic_locked(path: impl AsRef<Path>, data: &[u8], timeout_ms: u64) -> Result<()> {
    let path = path.as_ref();
    let _lock = FileLock::acquire(lock_path_for(path), timeout_ms)?;
    write_atomic(path, data)
}

/// Remove a file while holding `<path>.lock`; a missing file is not an error
pub fn remove_locked(path: impl AsRef<Path>, timeout_ms: u64) -> Result<bool> {
    let path = path.as_ref();
    let _lock = FileLock::acquire(lock_path_for(path), timeout_ms)?;
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(Error::Io(err)),
    }
}
