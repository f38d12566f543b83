//! Document loading from the filesystem.

use std::path::PathBuf;

use rayon::prelude::*;
use thiserror::Error;

use crate::model::{Document, DocumentSource};

/// Error raised when a declared document cannot be turned into text.
///
/// Fatal for the run: comparisons cannot proceed without every declared document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read document '{id}' at {}: {source}", path.display())]
    Unreadable {
        id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document '{id}' at {} is not valid UTF-8 text", path.display())]
    NotText { id: String, path: PathBuf },
}

impl LoadError {
    /// Identifier of the document that failed to load.
    pub fn document_id(&self) -> &str {
        match self {
            LoadError::Unreadable { id, .. } | LoadError::NotText { id, .. } => id,
        }
    }
}

/// Reads documents from disk, optionally in parallel.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentLoader {
    parallel: bool,
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self { parallel: false }
    }

    /// Load independent documents on the rayon pool. Output order is unaffected.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Load a single document, preserving its line order exactly.
    pub fn load(&self, source: &DocumentSource) -> Result<Document, LoadError> {
        let bytes = std::fs::read(&source.path).map_err(|err| LoadError::Unreadable {
            id: source.id.clone(),
            path: source.path.clone(),
            source: err,
        })?;
        let text = String::from_utf8(bytes).map_err(|_| LoadError::NotText {
            id: source.id.clone(),
            path: source.path.clone(),
        })?;

        let doc = Document::from_text(&source.id, &source.path, &text);
        tracing::debug!(
            id = %doc.id(),
            path = %source.path.display(),
            lines = doc.line_count(),
            "loaded document"
        );
        Ok(doc)
    }

    /// Load every source, returning documents in input order.
    ///
    /// On failure the error for the earliest failing source (in input order) is returned.
    pub fn load_all(&self, sources: &[DocumentSource]) -> Result<Vec<Document>, LoadError> {
        if self.parallel {
            // Collect every outcome first; rayon's Result collection picks an arbitrary error.
            let outcomes: Vec<Result<Document, LoadError>> =
                sources.par_iter().map(|source| self.load(source)).collect();
            outcomes.into_iter().collect()
        } else {
            sources.iter().map(|source| self.load(source)).collect()
        }
    }
}
