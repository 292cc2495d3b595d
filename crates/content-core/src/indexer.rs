// content-core/src/indexer.rs
//! Content tree builder.
//!
//! Scans a directory tree and assembles a forest of [`ContentItem`]s.
//! Each directory contributes at most one item, sourced from the entry the
//! [`SourceSelector`] picks among its qualifying files. Directories without
//! a qualifying source are transparent: items found in their subtrees are
//! promoted to the nearest contributing ancestor, or to the root.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::IndexError;
use crate::item::{ContentItem, ItemBuilder, Route};

/// Strategy for picking a directory's content source among its qualifying
/// entries, listed in stable enumeration order.
pub trait SourceSelector: Send + Sync {
    fn select<'a>(&self, candidates: &'a [PathBuf]) -> Option<&'a Path>;
}

/// The shipped selection rule: the first qualifying entry wins and every
/// later qualifying entry in the same directory is ignored.
pub struct FirstMatch;

impl SourceSelector for FirstMatch {
    fn select<'a>(&self, candidates: &'a [PathBuf]) -> Option<&'a Path> {
        candidates.first().map(PathBuf::as_path)
    }
}

/// Ordered forest of content items discovered under a base path.
#[derive(Debug)]
pub struct ContentIndex {
    base_path: PathBuf,
    items: Vec<ContentItem>,
}

impl ContentIndex {
    /// An index with no items, useful as a placeholder before the first build.
    pub fn empty(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            items: Vec::new(),
        }
    }

    /// Assemble an index from externally built items.
    pub fn from_items(base_path: impl Into<PathBuf>, items: Vec<ContentItem>) -> Self {
        Self {
            base_path: base_path.into(),
            items,
        }
    }

    /// Build the full forest from the current filesystem state using the
    /// [`FirstMatch`] selection rule.
    ///
    /// Synchronous and non-incremental: every call rescans everything.
    pub fn build(
        base_path: impl Into<PathBuf>,
        extensions: &[String],
        item_builder: &dyn ItemBuilder,
    ) -> Result<Self, IndexError> {
        Self::build_with_selector(base_path, extensions, item_builder, &FirstMatch)
    }

    /// Build with an explicit source-selection strategy.
    pub fn build_with_selector(
        base_path: impl Into<PathBuf>,
        extensions: &[String],
        item_builder: &dyn ItemBuilder,
        selector: &dyn SourceSelector,
    ) -> Result<Self, IndexError> {
        let base_path = base_path.into();

        let metadata = fs::metadata(&base_path).map_err(|source| IndexError::PathUnreadable {
            path: base_path.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(IndexError::NotADirectory(base_path));
        }

        let mut scanner = Scanner {
            base: &base_path,
            extensions,
            builder: item_builder,
            selector,
            visited: HashSet::new(),
        };
        let items = scanner.scan_directory(&base_path);

        Ok(Self { base_path, items })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Root-level items of the forest, in discovery order.
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    /// Depth-first pre-order traversal visiting every item exactly once.
    pub fn walk(&self, visit: &mut dyn FnMut(&ContentItem)) {
        for item in &self.items {
            item.walk(visit);
        }
    }

    /// Resolve a route against the live tree.
    pub fn find(&self, route: &Route) -> Option<&ContentItem> {
        fn find_in<'a>(items: &'a [ContentItem], route: &Route) -> Option<&'a ContentItem> {
            for item in items {
                if item.route == *route {
                    return Some(item);
                }
                if let Some(found) = find_in(&item.children, route) {
                    return Some(found);
                }
            }
            None
        }
        find_in(&self.items, route)
    }

    /// Total number of items in the forest.
    pub fn count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }
}

struct Scanner<'a> {
    base: &'a Path,
    extensions: &'a [String],
    builder: &'a dyn ItemBuilder,
    selector: &'a dyn SourceSelector,
    /// Canonical paths of directories already scanned; bounds the descent
    /// when symlinks form a cycle.
    visited: HashSet<PathBuf>,
}

impl Scanner<'_> {
    /// Items contributed by `dir`: either the single item built from its
    /// selected source, or its subdirectories' items promoted one level up.
    fn scan_directory(&mut self, dir: &Path) -> Vec<ContentItem> {
        let canonical = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        if !self.visited.insert(canonical) {
            debug!(directory = %dir.display(), "already scanned, skipping");
            return Vec::new();
        }

        let entries = match sorted_entries(dir) {
            Ok(entries) => entries,
            Err(err) => {
                // A subtree that became unreadable mid-traversal contributes
                // nothing; the rest of the build continues.
                warn!(directory = %dir.display(), error = %err, "cannot read directory");
                return Vec::new();
            }
        };

        let candidates: Vec<PathBuf> = entries
            .iter()
            .filter(|path| path.is_file() && has_extension(path, self.extensions))
            .cloned()
            .collect();

        match self.selector.select(&candidates) {
            Some(source) => {
                let source = source.to_path_buf();
                let children = self.scan_subdirectories(&entries);
                let route = Route::for_source(self.base, &source);
                match self.builder.build(&source, route, children) {
                    Ok(item) => vec![item],
                    Err(err) => {
                        warn!("skipping item: {err}");
                        Vec::new()
                    }
                }
            }
            // No qualifying source: this directory is transparent and its
            // subtrees' items are promoted to the caller's level.
            None => self.scan_subdirectories(&entries),
        }
    }

    fn scan_subdirectories(&mut self, entries: &[PathBuf]) -> Vec<ContentItem> {
        let mut items = Vec::new();
        for entry in entries {
            if entry.is_dir() {
                items.extend(self.scan_directory(entry));
            }
        }
        items
    }
}

/// Immediate entries of `dir` in stable name order. `read_dir` order is
/// platform-dependent, so sort explicitly.
fn sorted_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    entries.sort_by_key(|path| path.file_name().map(|name| name.to_os_string()));
    Ok(entries)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ItemError;
    use rstest::rstest;
    use std::fs;
    use tempfile::tempdir;

    /// Builds items directly from the filesystem: title is the file stem,
    /// content is the raw file text.
    struct StubBuilder;

    impl ItemBuilder for StubBuilder {
        fn build(
            &self,
            source: &Path,
            route: Route,
            children: Vec<ContentItem>,
        ) -> Result<ContentItem, ItemError> {
            let title = source
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let content = fs::read_to_string(source)
                .map_err(|err| ItemError::new(source, err.to_string()))?;
            Ok(ContentItem::new(route, title, "", content, children))
        }
    }

    /// Fails construction for any source whose file name contains `reject`.
    struct RejectingBuilder {
        reject: &'static str,
    }

    impl ItemBuilder for RejectingBuilder {
        fn build(
            &self,
            source: &Path,
            route: Route,
            children: Vec<ContentItem>,
        ) -> Result<ContentItem, ItemError> {
            if source.to_string_lossy().contains(self.reject) {
                return Err(ItemError::new(source, "rejected by test builder"));
            }
            StubBuilder.build(source, route, children)
        }
    }

    fn md_extensions() -> Vec<String> {
        vec!["md".to_string()]
    }

    fn routes(index: &ContentIndex) -> Vec<String> {
        let mut routes = Vec::new();
        index.walk(&mut |item| routes.push(item.route.value()));
        routes
    }

    #[test]
    fn test_build_rejects_file_base() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain.md");
        fs::write(&file, "# hi").unwrap();

        let err = ContentIndex::build(&file, &md_extensions(), &StubBuilder).unwrap_err();
        assert!(matches!(err, IndexError::NotADirectory(_)));
    }

    #[test]
    fn test_build_missing_base() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = ContentIndex::build(&missing, &md_extensions(), &StubBuilder).unwrap_err();
        assert!(matches!(err, IndexError::PathUnreadable { .. }));
    }

    #[test]
    fn test_first_qualifying_source_wins() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "first").unwrap();
        fs::write(dir.path().join("b.md"), "second").unwrap();

        let index = ContentIndex::build(dir.path(), &md_extensions(), &StubBuilder).unwrap();
        assert_eq!(index.count(), 1);
        assert_eq!(index.items()[0].title, "a");
        assert_eq!(index.items()[0].content, "first");
    }

    #[test]
    fn test_transparent_directory_promotes_items() {
        let dir = tempdir().unwrap();
        // No source at the top level; x contributes an item.
        fs::create_dir(dir.path().join("x")).unwrap();
        fs::write(dir.path().join("x/item.md"), "promoted").unwrap();

        let index = ContentIndex::build(dir.path(), &md_extensions(), &StubBuilder).unwrap();
        assert_eq!(routes(&index), ["/x"]);
        // Promoted to the forest's root level, not nested under a synthetic node.
        assert_eq!(index.items().len(), 1);
        assert!(index.items()[0].children.is_empty());
    }

    #[test]
    fn test_children_nest_under_contributing_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.md"), "root").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/child.md"), "child").unwrap();

        let index = ContentIndex::build(dir.path(), &md_extensions(), &StubBuilder).unwrap();
        assert_eq!(routes(&index), ["/", "/sub"]);
        assert_eq!(index.items()[0].children.len(), 1);
        assert_eq!(index.items()[0].children[0].title, "child");
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.md"), "root").unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/a.md"), "a").unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b/b.md"), "b").unwrap();

        let first = ContentIndex::build(dir.path(), &md_extensions(), &StubBuilder).unwrap();
        let second = ContentIndex::build(dir.path(), &md_extensions(), &StubBuilder).unwrap();
        assert_eq!(routes(&first), routes(&second));
        assert_eq!(routes(&first), ["/", "/a", "/b"]);
    }

    #[test]
    fn test_construction_failure_drops_subtree_only() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("bad")).unwrap();
        fs::write(dir.path().join("bad/broken.md"), "x").unwrap();
        fs::create_dir(dir.path().join("bad/nested")).unwrap();
        fs::write(dir.path().join("bad/nested/inner.md"), "x").unwrap();
        fs::create_dir(dir.path().join("good")).unwrap();
        fs::write(dir.path().join("good/fine.md"), "x").unwrap();

        let builder = RejectingBuilder { reject: "broken" };
        let index = ContentIndex::build(dir.path(), &md_extensions(), &builder).unwrap();
        // The failing item and its whole prospective subtree are gone, the
        // sibling survives.
        assert_eq!(routes(&index), ["/good"]);
    }

    #[test]
    fn test_find_resolves_nested_route() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.md"), "root").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/child.md"), "child").unwrap();

        let index = ContentIndex::build(dir.path(), &md_extensions(), &StubBuilder).unwrap();
        let found = index.find(&Route::parse("/sub")).unwrap();
        assert_eq!(found.title, "child");
        assert!(index.find(&Route::parse("/missing")).is_none());
    }

    #[rstest]
    #[case("UPPER.MD", true)]
    #[case("mixed.Md", true)]
    #[case("notes.txt", false)]
    #[case("extensionless", false)]
    fn test_extension_match_is_case_insensitive(#[case] name: &str, #[case] qualifies: bool) {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(name), "text").unwrap();

        let index = ContentIndex::build(dir.path(), &md_extensions(), &StubBuilder).unwrap();
        assert_eq!(index.count(), usize::from(qualifies));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_terminates() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("loop")).unwrap();
        fs::write(dir.path().join("loop/item.md"), "x").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop/back")).unwrap();

        let index = ContentIndex::build(dir.path(), &md_extensions(), &StubBuilder).unwrap();
        assert_eq!(routes(&index), ["/loop"]);
    }
}
