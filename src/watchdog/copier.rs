use std::fs::{File, TryLockError};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why an archive copy failed. All variants are non-fatal; the same copy is
/// retried on the next tick against a freshly computed destination.
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("failed to open source '{path}': {source}")]
    OpenSource {
        path: PathBuf,
        source: io::Error,
    },
    #[error("source '{path}' is locked by another process")]
    SourceLocked { path: PathBuf },
    #[error("failed to create destination '{path}': {source}")]
    CreateDest {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed copying '{path}': {source}")]
    Copy {
        path: PathBuf,
        source: io::Error,
    },
}

/// Copy `source` to `dest` byte for byte, holding an exclusive lock on the
/// source for the duration.
///
/// The lock is acquired non-blocking: if the game is mid-write and holds the
/// file, we fail immediately instead of waiting or reading a torn save.
pub fn copy_locked(source: &Path, dest: &Path) -> Result<u64, CopyError> {
    let mut src = File::open(source).map_err(|e| CopyError::OpenSource {
        path: source.to_path_buf(),
        source: e,
    })?;

    match src.try_lock() {
        Ok(()) => {}
        Err(TryLockError::WouldBlock) => {
            return Err(CopyError::SourceLocked {
                path: source.to_path_buf(),
            });
        }
        Err(TryLockError::Error(e)) => {
            return Err(CopyError::OpenSource {
                path: source.to_path_buf(),
                source: e,
            });
        }
    }

    let mut dst = File::create(dest).map_err(|e| CopyError::CreateDest {
        path: dest.to_path_buf(),
        source: e,
    })?;

    io::copy(&mut src, &mut dst).map_err(|e| CopyError::Copy {
        path: source.to_path_buf(),
        source: e,
    })
}
