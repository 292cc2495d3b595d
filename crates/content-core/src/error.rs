// content-core/src/error.rs
//! Error types shared across the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a content index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("`{}` is not a directory; cannot build a content index out of a file", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot read base path `{}`", .path.display())]
    PathUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the folder watcher.
#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("folder watcher for `{}` is already running", .0.display())]
    AlreadyRunning(PathBuf),
}

/// Errors raised by the full-text index.
///
/// Only backing-store failures surface here; malformed queries and stale
/// hits are handled internally and never reach the caller.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("cannot prepare backing store at `{}`", .path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build or open the full-text index")]
    Build(#[from] tantivy::TantivyError),
}

/// Item construction failure, reported by an [`crate::item::ItemBuilder`].
///
/// Recoverable from the indexer's point of view: the candidate item and its
/// prospective subtree are dropped and the scan continues.
#[derive(Debug, Error)]
#[error("cannot construct item from `{}`: {reason}", .path.display())]
pub struct ItemError {
    pub path: PathBuf,
    pub reason: String,
}

impl ItemError {
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
