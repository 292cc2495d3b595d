//! Item construction for plain markdown-ish sources.
//!
//! Deliberately minimal: title from the first `#` heading or the file stem,
//! description from the first plain line, content is the raw file text.
//! Rich markdown processing is somebody else's job.

use std::fs;
use std::path::Path;

use content_core::{ContentItem, ItemBuilder, ItemError, Route};

pub struct FileItemBuilder;

impl ItemBuilder for FileItemBuilder {
    fn build(
        &self,
        source: &Path,
        route: Route,
        children: Vec<ContentItem>,
    ) -> Result<ContentItem, ItemError> {
        let text = fs::read_to_string(source)
            .map_err(|err| ItemError::new(source, err.to_string()))?;

        let title = text
            .lines()
            .find_map(|line| line.strip_prefix('#'))
            .map(|heading| heading.trim_start_matches('#').trim().to_string())
            .filter(|heading| !heading.is_empty())
            .unwrap_or_else(|| {
                source
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });

        let description = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with('#'))
            .unwrap_or("")
            .to_string();

        Ok(ContentItem::new(route, title, description, text, children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_title_from_heading() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("doc.md");
        fs::write(&source, "# My Title\n\nFirst paragraph.\n").unwrap();

        let item = FileItemBuilder
            .build(&source, Route::parse("/doc"), vec![])
            .unwrap();
        assert_eq!(item.title, "My Title");
        assert_eq!(item.description, "First paragraph.");
    }

    #[test]
    fn test_title_falls_back_to_file_stem() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("notes.md");
        fs::write(&source, "no heading here\n").unwrap();

        let item = FileItemBuilder
            .build(&source, Route::root(), vec![])
            .unwrap();
        assert_eq!(item.title, "notes");
    }

    #[test]
    fn test_unreadable_source_fails_construction() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.md");

        let err = FileItemBuilder.build(&missing, Route::root(), vec![]);
        assert!(err.is_err());
    }
}
