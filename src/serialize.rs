//! Writing per-document outputs.
//!
//! ```text
//! graph ──► render XMI  ──┐
//!       └─► render codes ─┼─► write xmi_dir/<base>.xmi
//!                         └─► write code_dir/<base>
//! ```
//!
//! Both outputs are rendered before anything touches the disk. If the
//! second write fails the first file is removed, so a document ends up
//! with both outputs or neither.

use crate::extract::ConceptExtractor;
use crate::xmi::write_xmi;
use crate::{Error, Result};
use clinanno_core::AnnotationGraph;
use std::path::{Path, PathBuf};

/// Graph file suffix.
pub const XMI_EXTENSION: &str = "xmi";

/// Writes graph files and/or code files for finished graphs.
#[derive(Debug, Clone, Default)]
pub struct DocumentSerializer {
    xmi_dir: Option<PathBuf>,
    code_dir: Option<PathBuf>,
    extractor: ConceptExtractor,
}

impl DocumentSerializer {
    /// Serializer with no outputs enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `<base>.xmi` graph files under `dir` (created on demand).
    #[must_use]
    pub fn with_xmi_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.xmi_dir = Some(dir.into());
        self
    }

    /// Write `<base>` code files under `dir`, which must already exist.
    #[must_use]
    pub fn with_code_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.code_dir = Some(dir.into());
        self
    }

    /// Path of the graph file for a document base name.
    #[must_use]
    pub fn xmi_path(&self, base_name: &str) -> Option<PathBuf> {
        self.xmi_dir
            .as_ref()
            .map(|dir| dir.join(format!("{base_name}.{XMI_EXTENSION}")))
    }

    /// Path of the code file for a document base name.
    #[must_use]
    pub fn code_path(&self, base_name: &str) -> Option<PathBuf> {
        self.code_dir.as_ref().map(|dir| dir.join(base_name))
    }

    /// Write every enabled output for one graph; returns the written paths.
    pub fn write(&self, base_name: &str, graph: &AnnotationGraph) -> Result<Vec<PathBuf>> {
        let mut pending: Vec<(PathBuf, String)> = Vec::with_capacity(2);
        if let Some(path) = self.xmi_path(base_name) {
            pending.push((path, write_xmi(graph)?));
        }
        if let Some(path) = self.code_path(base_name) {
            pending.push((path, self.extractor.render(graph)));
        }

        if let Some(dir) = &self.xmi_dir {
            std::fs::create_dir_all(dir).map_err(|e| io_context(e, "create", dir))?;
        }

        let mut written = Vec::with_capacity(pending.len());
        for (path, body) in pending {
            if let Err(e) = std::fs::write(&path, body) {
                rollback(&written);
                return Err(io_context(e, "write", &path));
            }
            written.push(path);
        }
        Ok(written)
    }
}

fn rollback(written: &[PathBuf]) {
    for path in written {
        if let Err(e) = std::fs::remove_file(path) {
            log::warn!("could not remove partial output {}: {}", path.display(), e);
        }
    }
}

fn io_context(e: std::io::Error, action: &str, path: &Path) -> Error {
    Error::Io(std::io::Error::new(
        e.kind(),
        format!("failed to {} {}: {}", action, path.display(), e),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinanno_core::{AnnotationKind, Mention, MentionType, OntologyConcept, Polarity, Span};
    use tempfile::TempDir;

    fn graph() -> AnnotationGraph {
        let mut graph = AnnotationGraph::new("no chest pain");
        let mention = Mention::new(MentionType::Entity, Polarity::Negated)
            .with_concepts(vec![OntologyConcept::umls("C0008031")]);
        graph
            .add(Span::new(3, 13), AnnotationKind::Mention(mention))
            .unwrap();
        graph
    }

    #[test]
    fn test_writes_both_outputs() {
        let tmp = TempDir::new().unwrap();
        let codes = tmp.path().join("codes");
        std::fs::create_dir(&codes).unwrap();
        let xmi = tmp.path().join("out").join("xmi");

        let serializer = DocumentSerializer::new()
            .with_xmi_dir(&xmi)
            .with_code_dir(&codes);
        let written = serializer.write("note1.txt", &graph()).unwrap();

        assert_eq!(written.len(), 2);
        assert!(xmi.join("note1.txt.xmi").is_file());
        assert_eq!(
            std::fs::read_to_string(codes.join("note1.txt")).unwrap(),
            "-C0008031|chest_pain|EntityMention"
        );
    }

    #[test]
    fn test_code_file_overwritten() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("doc"), "stale").unwrap();
        let serializer = DocumentSerializer::new().with_code_dir(tmp.path());
        serializer
            .write("doc", &AnnotationGraph::new("nothing"))
            .unwrap();
        assert_eq!(std::fs::read_to_string(tmp.path().join("doc")).unwrap(), "");
    }

    #[test]
    fn test_missing_code_dir_removes_graph_file() {
        let tmp = TempDir::new().unwrap();
        let xmi = tmp.path().join("xmi");
        let serializer = DocumentSerializer::new()
            .with_xmi_dir(&xmi)
            .with_code_dir(tmp.path().join("absent"));

        let err = serializer.write("doc", &graph()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(!xmi.join("doc.xmi").exists());
    }

    #[test]
    fn test_render_failure_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let serializer = DocumentSerializer::new()
            .with_xmi_dir(tmp.path().join("xmi"))
            .with_code_dir(tmp.path());
        let graph = AnnotationGraph::new("bell\u{0007}");
        assert!(serializer.write("doc", &graph).is_err());
        assert!(!tmp.path().join("doc").exists());
        assert!(!tmp.path().join("xmi").exists());
    }
}
