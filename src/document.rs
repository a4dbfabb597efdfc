//! Document loading and discovery.

use crate::{Error, Result};
use clinanno_core::AnnotationGraph;
use std::path::{Path, PathBuf};

/// Form feed, which XML 1.0 cannot carry.
const FORM_FEED: char = '\u{000C}';

/// One input document and its annotation graph.
#[derive(Debug, Clone)]
pub struct Document {
    /// Where the text came from
    pub source: PathBuf,
    /// Graph over the (normalized) text
    pub graph: AnnotationGraph,
}

impl Document {
    /// Wrap already-normalized text.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            graph: AnnotationGraph::new(text),
        }
    }

    /// Document text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.graph.text()
    }

    /// File name of the source, used to name output files.
    #[must_use]
    pub fn base_name(&self) -> String {
        base_name(&self.source)
    }
}

/// File name component of a path (lossy), or the whole path if it has none.
#[must_use]
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Replace characters the graph serializer cannot represent.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    raw.replace(FORM_FEED, " ")
}

/// Reads raw text documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentLoader;

impl DocumentLoader {
    /// Create a loader.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Read a document and seed an empty graph over its normalized text.
    pub fn load(&self, path: &Path) -> Result<Document> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("failed to read {}: {}", path.display(), e),
            ))
        })?;
        Ok(Document::new(path, normalize_text(&raw)))
    }
}

/// List the documents in a directory: regular, non-hidden files sorted by
/// file name.
pub fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| Error::config(format!("cannot list {}: {}", dir.display(), e)))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry?;
        if is_hidden(&entry.file_name().to_string_lossy()) {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_form_feed_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        fs::write(&path, "Page one\u{000C}Page two").unwrap();

        let doc = DocumentLoader::new().load(&path).unwrap();
        assert_eq!(doc.text(), "Page one Page two");
        assert_eq!(doc.text().len(), "Page one\u{000C}Page two".len());
        assert_eq!(doc.base_name(), "note.txt");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = DocumentLoader::new()
            .load(Path::new("/definitely/not/here.txt"))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_startup_fatal());
    }

    #[test]
    fn test_discovery_skips_hidden_and_dirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join(".DS_Store"), "x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let found = discover_documents(dir.path()).unwrap();
        let names: Vec<_> = found.iter().map(|p| base_name(p)).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_discovery_of_missing_dir_is_fatal() {
        let err = discover_documents(Path::new("/no/such/dir")).unwrap_err();
        assert!(err.is_startup_fatal());
    }
}
