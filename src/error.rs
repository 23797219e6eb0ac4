//! Errors surfaced by the analysis pipeline.
//!
//! Only repository-level and language-level conditions escalate to the
//! caller. File-level read or parse failures never show up here; they are
//! absorbed by the extractor as empty module nodes.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning or extracting a repository.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The repository root is missing or is not a directory.
    #[error("repository path does not exist or is not a directory: {}", .0.display())]
    InvalidRepository(PathBuf),

    /// The registry marks the language as AST-capable but no backend is wired.
    #[error("AST extraction not yet implemented for language: {0}")]
    NotImplemented(String),

    /// Enumerating the repository root failed.
    #[error("walking {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Reading a directory listing failed.
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalysisError {
    /// Whether the error is a developer-facing gap rather than bad input.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, AnalysisError::NotImplemented(_))
    }
}
