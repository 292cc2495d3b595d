use super::Command;
use crate::error::Result;
use crate::item_builder::FileItemBuilder;

use content_core::{Config, ContentIndex};
use std::path::PathBuf;

pub struct IndexCommand {
    config: Config,
    path: PathBuf,
}

impl IndexCommand {
    pub fn new(cfg: Config, path: PathBuf) -> Self {
        Self { config: cfg, path }
    }
}

#[async_trait::async_trait]
impl Command for IndexCommand {
    async fn execute(&self) -> Result<()> {
        let index = ContentIndex::build(
            &self.path,
            &self.config.scanner.content_extensions,
            &FileItemBuilder,
        )?;

        index.walk(&mut |item| {
            let depth = item.route.components().len();
            println!("{:indent$}{}  {}", "", item.route, item.title, indent = depth * 2);
        });
        println!("{} items", index.count());

        Ok(())
    }
}
