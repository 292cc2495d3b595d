use super::Command;
use crate::error::Result;
use crate::item_builder::FileItemBuilder;

use content_core::{Config, ContentIndex, FolderWatcher, FullTextIndex, WatcherOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::info;

pub struct WatchCommand {
    config: Config,
    path: PathBuf,
}

impl WatchCommand {
    pub fn new(cfg: Config, path: PathBuf) -> Self {
        Self { config: cfg, path }
    }
}

#[async_trait::async_trait]
impl Command for WatchCommand {
    async fn execute(&self) -> Result<()> {
        let extensions = &self.config.scanner.content_extensions;

        let tree = ContentIndex::build(&self.path, extensions, &FileItemBuilder)?;
        let content = Arc::new(RwLock::new(tree));
        let fulltext = FullTextIndex::new(Arc::clone(&content), &self.config.search.storage_path)?
            .with_writer_memory(self.config.search.writer_memory);
        fulltext.update()?;

        let options = WatcherOptions::new(&self.path)
            .recursive(self.config.watcher.recursive)
            .interval(self.config.watcher.poll_interval());
        let skip_hidden = self.config.watcher.skip_hidden;
        let mut watcher = FolderWatcher::new(options, move |path: &Path| {
            skip_hidden
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with('.'))
        });
        let mut changes = watcher.start()?;

        info!(path = %self.path.display(), "watching for changes, press Ctrl-C to stop");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    watcher.stop();
                    watcher.stopped().await;
                    break;
                }
                change = changes.recv() => {
                    let Some(change) = change else { break };
                    info!(
                        new = change.new_paths().len(),
                        disappeared = change.disappeared_paths().len(),
                        "repository changed, rebuilding"
                    );
                    let rebuilt = ContentIndex::build(&self.path, extensions, &FileItemBuilder)?;
                    *content.write().unwrap() = rebuilt;
                    fulltext.update()?;
                }
            }
        }

        Ok(())
    }
}
