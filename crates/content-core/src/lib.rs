// content-core/src/lib.rs
//! Content indexing core.
//!
//! Turns a repository of content source files into a hierarchical content
//! model and keeps it searchable:
//! - recursive content tree builder (one item per contributing directory)
//! - polling folder watcher emitting membership-change events
//! - Tantivy-backed full-text index mirrored from the content tree

pub mod config;
pub mod error;
pub mod indexer;
pub mod item;
pub mod schema;
pub mod search;
pub mod watcher;

pub use config::{Config, ScannerConfig, SearchConfig, WatcherConfig};
pub use error::{IndexError, ItemError, SearchError, WatcherError};
pub use indexer::{ContentIndex, FirstMatch, SourceSelector};
pub use item::{ContentItem, ItemBuilder, Route};
pub use search::{FullTextIndex, SearchResult};
pub use watcher::{FolderChange, FolderWatcher, WatcherOptions};
