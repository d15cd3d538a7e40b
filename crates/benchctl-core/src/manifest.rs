//! Manifest files before and after template rendering

use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// Line separating resource documents inside a manifest file
pub const DOCUMENT_SEPARATOR: &str = "---";

/// A manifest template as read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFile {
    /// Path the template was read from
    pub path: PathBuf,

    /// Raw template text, before any substitution
    pub raw_template: String,
}

impl ManifestFile {
    /// Build a manifest from in-memory content
    pub fn new(path: impl Into<PathBuf>, raw_template: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            raw_template: raw_template.into(),
        }
    }

    /// Read a manifest template from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw_template = std::fs::read_to_string(path).map_err(|source| CoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            raw_template,
        })
    }

    /// Read every path in order
    pub fn load_all(paths: &[PathBuf]) -> Result<Vec<Self>> {
        paths.iter().map(Self::load).collect()
    }

    /// Display name used as the template name and in diagnostics
    pub fn name(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// A manifest after variable substitution
///
/// One per source file; `content` may hold several resource documents
/// separated by [`DOCUMENT_SEPARATOR`] lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Name of the file this document was rendered from
    pub source_file: String,

    /// Rendered text
    pub content: String,
}

impl RenderedDocument {
    pub fn new(source_file: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            content: content.into(),
        }
    }

    /// Split the content into its non-empty, trimmed sections
    ///
    /// A section boundary is a line consisting of exactly `---`
    /// (trailing whitespace tolerated).
    pub fn sections(&self) -> Vec<&str> {
        let mut sections = Vec::new();
        let mut start = 0;
        let mut offset = 0;

        for line in self.content.split_inclusive('\n') {
            if line.trim_end() == DOCUMENT_SEPARATOR {
                sections.push(&self.content[start..offset]);
                start = offset + line.len();
            }
            offset += line.len();
        }
        sections.push(&self.content[start..]);

        sections
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}
