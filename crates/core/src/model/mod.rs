//! Core data model: documents and the locations they are loaded from.
//!
//! Sections are defined next to the extractor in [`crate::sections`] because
//! they borrow their lines from a [`Document`].

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Where a document comes from and the identifier it is known by in a run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DocumentSource {
    pub id: String,
    pub path: PathBuf,
}

impl DocumentSource {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { id: id.into(), path: path.into() }
    }
}

/// A loaded text document.
///
/// Immutable once constructed: the fields are private and only exposed
/// through borrowing accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: String,
    location: PathBuf,
    lines: Vec<String>,
    digest: String,
}

impl Document {
    /// Build a document from in-memory text.
    ///
    /// Accepts both `\n` and `\r\n` line endings; a trailing newline does not
    /// produce an extra empty line.
    pub fn from_text(id: impl Into<String>, location: impl Into<PathBuf>, text: &str) -> Self {
        let lines = text.lines().map(str::to_string).collect();
        let digest = format!("{:x}", Sha256::digest(text.as_bytes()));
        Self { id: id.into(), location: location.into(), lines, digest }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Hex SHA-256 of the raw text the document was built from.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}
