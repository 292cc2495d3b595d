use super::Command;
use crate::error::Result;
use crate::item_builder::FileItemBuilder;

use content_core::{Config, ContentIndex, FullTextIndex};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

pub struct SearchCommand {
    config: Config,
    path: PathBuf,
    query: String,
    limit: Option<usize>,
}

impl SearchCommand {
    pub fn new(cfg: Config, path: PathBuf, query: String, limit: Option<usize>) -> Self {
        Self {
            config: cfg,
            path,
            query,
            limit,
        }
    }
}

#[async_trait::async_trait]
impl Command for SearchCommand {
    async fn execute(&self) -> Result<()> {
        let tree = ContentIndex::build(
            &self.path,
            &self.config.scanner.content_extensions,
            &FileItemBuilder,
        )?;
        let content = Arc::new(RwLock::new(tree));

        let fulltext = FullTextIndex::new(content, &self.config.search.storage_path)?
            .with_writer_memory(self.config.search.writer_memory);
        fulltext.update()?;

        let limit = self.limit.unwrap_or(self.config.search.max_results);
        let results = fulltext.search(&self.query, limit)?;

        if results.is_empty() {
            println!("no matching items");
        }
        for hit in results {
            println!("[{:.2}] {}  ({})", hit.score, hit.title, hit.item.route);
        }

        Ok(())
    }
}
