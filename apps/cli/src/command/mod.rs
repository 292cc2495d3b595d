pub mod index;
pub mod search;
pub mod watch;

use crate::error::Result;

pub use index::IndexCommand;
pub use search::SearchCommand;
pub use watch::WatchCommand;

#[async_trait::async_trait]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}
