// content-core/src/item.rs
//! The content model: routes, items and the item-construction seam.

use std::fmt;
use std::path::Path;

use crate::error::ItemError;

/// Hierarchical identifier of a content item.
///
/// Normalized to `/`-separated components with no empty segments; the root
/// route has no components and renders as `"/"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Route {
    components: Vec<String>,
}

impl Route {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_components<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            components: components.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a route from its string form, e.g. `"/docs/setup"`.
    /// Empty segments are dropped, so `"docs//setup/"` parses the same.
    pub fn parse(value: &str) -> Self {
        Self::from_components(value.split('/').filter(|c| !c.is_empty()))
    }

    /// Route for an item constructed from `source`: the directory of the
    /// source file, relative to the index base path.
    pub fn for_source(base: &Path, source: &Path) -> Self {
        let dir = source.parent().unwrap_or(source);
        let relative = dir.strip_prefix(base).unwrap_or(Path::new(""));
        Self::from_components(
            relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned()),
        )
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    /// String form: `"/"`-prefixed joined components, `"/"` for the root.
    pub fn value(&self) -> String {
        if self.components.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", self.components.join("/"))
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value())
    }
}

/// A node of the published content tree.
///
/// Items exclusively own their children; the tree is rooted and acyclic by
/// construction.
#[derive(Debug, Clone)]
pub struct ContentItem {
    pub route: Route,
    pub title: String,
    pub description: String,
    pub content: String,
    pub children: Vec<ContentItem>,
}

impl ContentItem {
    pub fn new(
        route: Route,
        title: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<String>,
        children: Vec<ContentItem>,
    ) -> Self {
        Self {
            route,
            title: title.into(),
            description: description.into(),
            content: content.into(),
            children,
        }
    }

    /// Depth-first pre-order traversal of this item and all descendants.
    pub fn walk(&self, visit: &mut dyn FnMut(&ContentItem)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// External collaborator that turns a selected source file into a populated
/// [`ContentItem`].
///
/// Construction may fail; the indexer then drops the candidate item together
/// with its whole prospective subtree and continues.
pub trait ItemBuilder: Send + Sync {
    fn build(
        &self,
        source: &Path,
        route: Route,
        children: Vec<ContentItem>,
    ) -> Result<ContentItem, ItemError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_root_route_value() {
        assert_eq!(Route::root().value(), "/");
        assert!(Route::root().is_root());
    }

    #[test]
    fn test_route_parse_roundtrip() {
        let route = Route::parse("/docs/setup");
        assert_eq!(route.components(), ["docs", "setup"]);
        assert_eq!(route.value(), "/docs/setup");
        assert_eq!(Route::parse("docs//setup/"), route);
    }

    #[test]
    fn test_route_for_source() {
        let base = PathBuf::from("/repo");
        let source = base.join("docs/setup/index.md");
        assert_eq!(Route::for_source(&base, &source).value(), "/docs/setup");

        let top_level = base.join("readme.md");
        assert!(Route::for_source(&base, &top_level).is_root());
    }

    #[test]
    fn test_walk_is_preorder() {
        let leaf = ContentItem::new(Route::parse("/a/b"), "b", "", "", vec![]);
        let root = ContentItem::new(Route::parse("/a"), "a", "", "", vec![leaf]);

        let mut seen = Vec::new();
        root.walk(&mut |item| seen.push(item.route.value()));
        assert_eq!(seen, ["/a", "/a/b"]);
    }
}
