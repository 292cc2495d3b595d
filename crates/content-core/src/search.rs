// content-core/src/search.rs
//! Full-text index mirrored from the content tree.
//!
//! `update` is a full rebuild into a fresh generation directory that is
//! atomically swapped in, so concurrent searches keep reading a consistent
//! generation. Hits are resolved against the live content tree at query
//! time; stale ids are dropped, never reported as errors.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::QueryParser;
use tantivy::schema::Value;
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, TantivyError, doc};
use tracing::{debug, warn};

use crate::error::SearchError;
use crate::indexer::ContentIndex;
use crate::item::{ContentItem, Route};
use crate::schema::{SchemaFields, build_schema};

const DEFAULT_WRITER_MEMORY: usize = 50_000_000;

/// A scored hit resolved against the live content tree.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub score: f32,
    pub title: String,
    pub item: ContentItem,
}

/// One built generation of the backing store.
struct Generation {
    dir: PathBuf,
    index: Index,
    reader: IndexReader,
}

/// Searchable mirror of a [`ContentIndex`].
pub struct FullTextIndex {
    content: Arc<RwLock<ContentIndex>>,
    storage_root: PathBuf,
    /// Currently served generation; `None` until the first `update`.
    active: RwLock<Option<Generation>>,
    /// Serializes rebuilds; searches only contend on `active`.
    update_lock: Mutex<()>,
    generation: AtomicU64,
    writer_memory: usize,
}

impl FullTextIndex {
    /// Reserve a private backing-store location. Builds nothing yet; the
    /// index is empty until the first [`update`](Self::update).
    pub fn new(
        content: Arc<RwLock<ContentIndex>>,
        storage_root: impl Into<PathBuf>,
    ) -> Result<Self, SearchError> {
        let storage_root = storage_root.into();
        fs::create_dir_all(&storage_root).map_err(|source| SearchError::Store {
            path: storage_root.clone(),
            source,
        })?;

        Ok(Self {
            content,
            storage_root,
            active: RwLock::new(None),
            update_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
            writer_memory: DEFAULT_WRITER_MEMORY,
        })
    }

    pub fn with_writer_memory(mut self, bytes: usize) -> Self {
        self.writer_memory = bytes;
        self
    }

    /// Full rebuild from the current content tree.
    ///
    /// Builds into a fresh generation directory, then swaps it in; the
    /// previous generation keeps serving searches until the swap. Mutually
    /// exclusive with other updates.
    pub fn update(&self) -> Result<(), SearchError> {
        let _update = self.update_lock.lock().unwrap();

        // Snapshot the documents before touching the backing store, so the
        // content read lock is not held across index building.
        let documents: Vec<(String, String, String)> = {
            let content = self.content.read().unwrap();
            let mut documents = Vec::new();
            content.walk(&mut |item| {
                documents.push((item.route.value(), item.title.clone(), index_text(item)));
            });
            documents
        };

        let next = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let dir = self.storage_root.join(format!("gen-{next:06}"));
        fs::create_dir_all(&dir).map_err(|source| SearchError::Store {
            path: dir.clone(),
            source,
        })?;

        let schema = build_schema();
        let fields = SchemaFields::from_schema(&schema);
        let directory = MmapDirectory::open(&dir).map_err(TantivyError::from)?;
        let index = Index::open_or_create(directory, schema)?;

        let mut writer: IndexWriter = index.writer(self.writer_memory)?;
        let document_count = documents.len();
        for (route, title, body) in documents {
            writer.add_document(doc!(
                fields.route => route,
                fields.title => title,
                fields.body => body,
            ))?;
        }
        writer.commit()?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()?;

        let previous = {
            let mut active = self.active.write().unwrap();
            active.replace(Generation { dir, index, reader })
        };
        if let Some(old) = previous {
            let Generation {
                dir: old_dir,
                index: old_index,
                reader: old_reader,
            } = old;
            // Release mmap handles before deleting the directory.
            drop(old_reader);
            drop(old_index);
            if let Err(err) = fs::remove_dir_all(&old_dir) {
                warn!(dir = %old_dir.display(), error = %err, "cannot remove stale generation");
            }
        }

        debug!(documents = document_count, "full-text index rebuilt");
        Ok(())
    }

    /// Scored keyword query, capped at `max_results`, in descending score
    /// order. Each hit is resolved against the live content tree; hits whose
    /// route no longer resolves are dropped. Before the first update, and
    /// for malformed query syntax, the result list is empty.
    pub fn search(&self, keyword: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
        if max_results == 0 {
            return Ok(Vec::new());
        }

        let active = self.active.read().unwrap();
        let Some(generation) = active.as_ref() else {
            debug!("search before first update, no results");
            return Ok(Vec::new());
        };

        let searcher = generation.reader.searcher();
        let schema = generation.index.schema();
        let fields = SchemaFields::from_schema(&schema);

        let query_parser = QueryParser::for_index(&generation.index, vec![fields.body]);
        let query = match query_parser.parse_query(keyword) {
            Ok(query) => query,
            Err(err) => {
                warn!(keyword, error = %err, "query syntax error");
                return Ok(Vec::new());
            }
        };

        let top_docs = searcher.search(&query, &TopDocs::with_limit(max_results))?;

        let content = self.content.read().unwrap();
        let mut results = Vec::new();
        for (score, address) in top_docs {
            let stored: TantivyDocument = searcher.doc(address)?;
            let route_value = stored
                .get_first(fields.route)
                .and_then(|value| value.as_str())
                .unwrap_or_default();
            let title = stored
                .get_first(fields.title)
                .and_then(|value| value.as_str())
                .unwrap_or_default()
                .to_string();

            let route = Route::parse(route_value);
            match content.find(&route) {
                Some(item) => results.push(SearchResult {
                    score,
                    title,
                    item: item.clone(),
                }),
                None => debug!(route = route_value, "dropping hit with stale route"),
            }
        }

        Ok(results)
    }
}

/// Indexed text of an item: title, description, route components and
/// rendered content, concatenated.
fn index_text(item: &ContentItem) -> String {
    let mut text = item.title.clone();
    text.push(' ');
    text.push_str(&item.description);
    text.push(' ');
    text.push_str(&item.route.components().join(" "));
    text.push(' ');
    text.push_str(&item.content);
    text
}
