// content-core/src/watcher.rs
//! Polling folder watcher.
//!
//! Observes the set of qualifying paths under a root on a fixed cadence and
//! publishes one [`FolderChange`] per detected non-empty delta. Tracks
//! presence/absence only; a disappearance is never correlated with an
//! appearance as a rename.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::WatcherError;

/// Entries for which the predicate returns `true` are omitted from snapshots
/// and, if they are directories, not recursed into.
pub type SkipPredicate = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// Membership change between two folder snapshots.
#[derive(Debug, Clone)]
pub struct FolderChange {
    timestamp: SystemTime,
    new_paths: Vec<PathBuf>,
    disappeared_paths: Vec<PathBuf>,
}

impl FolderChange {
    fn new(new_paths: Vec<PathBuf>, disappeared_paths: Vec<PathBuf>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            new_paths,
            disappeared_paths,
        }
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// Paths present in this scan but not the previous one, in path order.
    pub fn new_paths(&self) -> &[PathBuf] {
        &self.new_paths
    }

    /// Paths present in the previous scan but not this one, in path order.
    pub fn disappeared_paths(&self) -> &[PathBuf] {
        &self.disappeared_paths
    }
}

impl fmt::Display for FolderChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "folder change (new: {}, disappeared: {})",
            self.new_paths.len(),
            self.disappeared_paths.len()
        )
    }
}

/// Watcher configuration.
#[derive(Debug, Clone)]
pub struct WatcherOptions {
    pub root: PathBuf,
    pub recursive: bool,
    pub interval: Duration,
}

impl WatcherOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            recursive: true,
            interval: Duration::from_secs(2),
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

/// Background task polling a folder for membership changes.
pub struct FolderWatcher {
    options: WatcherOptions,
    skip: SkipPredicate,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FolderWatcher {
    pub fn new(
        options: WatcherOptions,
        skip: impl Fn(&Path) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            options,
            skip: Arc::new(skip),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Start the polling task and return the event channel.
    ///
    /// The first scan only establishes the baseline and never emits. Events
    /// are published synchronously in scan order; a slow consumer delays the
    /// next scan rather than reordering deliveries.
    pub fn start(&mut self) -> Result<mpsc::Receiver<FolderChange>, WatcherError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(WatcherError::AlreadyRunning(self.options.root.clone()));
        }

        let (tx, rx) = mpsc::channel(1);
        let options = self.options.clone();
        let skip = Arc::clone(&self.skip);
        let running = Arc::clone(&self.running);
        self.handle = Some(tokio::spawn(watch_loop(options, skip, running, tx)));
        Ok(rx)
    }

    /// Request termination. The task observes the request after its current
    /// sleep/scan cycle, so exit is bounded by one interval of latency.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Wait for the background task to finish after [`stop`](Self::stop).
    pub async fn stopped(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

async fn watch_loop(
    options: WatcherOptions,
    skip: SkipPredicate,
    running: Arc<AtomicBool>,
    tx: mpsc::Sender<FolderChange>,
) {
    // Baseline snapshot: membership only, no event.
    let mut baseline = loop {
        if !running.load(Ordering::SeqCst) {
            return;
        }
        match snapshot(&options, &skip).await {
            Some(entries) => break entries,
            None => tokio::time::sleep(options.interval).await,
        }
    };
    debug!(
        root = %options.root.display(),
        entries = baseline.len(),
        "baseline established"
    );

    while running.load(Ordering::SeqCst) {
        tokio::time::sleep(options.interval).await;
        if !running.load(Ordering::SeqCst) {
            break;
        }

        // A failed scan skips this cycle and keeps the previous baseline;
        // it must not be mistaken for a mass disappearance.
        let Some(entries) = snapshot(&options, &skip).await else {
            continue;
        };

        let new_paths: Vec<PathBuf> = entries.difference(&baseline).cloned().collect();
        let disappeared_paths: Vec<PathBuf> = baseline.difference(&entries).cloned().collect();
        baseline = entries;

        if new_paths.is_empty() && disappeared_paths.is_empty() {
            continue;
        }

        let change = FolderChange::new(new_paths, disappeared_paths);
        debug!(root = %options.root.display(), "{change}");
        if tx.send(change).await.is_err() {
            debug!("event receiver dropped, stopping watcher");
            break;
        }
    }

    running.store(false, Ordering::SeqCst);
    debug!(root = %options.root.display(), "watcher stopped");
}

/// One full scan, run off the async executor. `None` means the cycle failed
/// and should be skipped.
async fn snapshot(options: &WatcherOptions, skip: &SkipPredicate) -> Option<BTreeSet<PathBuf>> {
    let options = options.clone();
    let skip = Arc::clone(skip);
    let result = tokio::task::spawn_blocking(move || scan_entries(&options, &skip)).await;

    match result {
        Ok(Ok(entries)) => Some(entries),
        Ok(Err(err)) => {
            warn!(error = %err, "folder scan failed, skipping cycle");
            None
        }
        Err(err) => {
            warn!(error = %err, "folder scan task failed, skipping cycle");
            None
        }
    }
}

fn scan_entries(
    options: &WatcherOptions,
    skip: &SkipPredicate,
) -> walkdir::Result<BTreeSet<PathBuf>> {
    let mut walker = WalkDir::new(&options.root).sort_by_file_name();
    if !options.recursive {
        walker = walker.max_depth(1);
    }

    let mut entries = BTreeSet::new();
    for entry in walker.into_iter().filter_entry(|e| !skip(e.path())) {
        let entry = entry?;
        if entry.depth() == 0 {
            // The root itself is not a member of its own snapshot.
            continue;
        }
        // In recursive mode directories are descended into, not recorded.
        if options.recursive && entry.file_type().is_dir() {
            continue;
        }
        entries.insert(entry.into_path());
    }
    Ok(entries)
}
