//! Structural AST extraction.
//!
//! Reduces each source file of one language to a minimal tree of
//! definitions: a module root holding classes and functions, nested as they
//! are in the source, each with a line span.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  has_ast?  ┌──────────────┐  per file  ┌─────────────┐
//! │ Registry     │───────────▶│ BackendSet   │───────────▶│ AstFile     │
//! └──────────────┘            │ (Python, JS, │  (rayon)   │ (module     │
//!        │ no                 │  TS, Java)   │            │  root)      │
//!        ▼                    └──────────────┘            └─────────────┘
//!   Ok(None)                         │ missing
//!                                    ▼
//!                             NotImplemented
//! ```
//!
//! A file that cannot be read or parsed is never dropped and never fails
//! the batch; it is represented by an empty module spanning line 1.
//!
//! # Adding a New Language
//!
//! 1. Create a module in `src/ast/languages/` with a [`treesitter::Grammar`]
//!    (or implement [`LanguageBackend`] directly)
//! 2. Add it to `BackendSet::builtin`
//! 3. Mark the language `has_ast` in the registry

mod languages;
mod traits;
#[cfg(feature = "tree-sitter")]
pub mod treesitter;
mod types;

pub use languages::BackendSet;
pub use traits::LanguageBackend;
pub use types::{children_end_line, AstFile, AstNode, AstResult, NodeType};

use std::fs;
use std::path::Path;
use std::time::Duration;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::AnalysisError;
use crate::registry::{LanguageRegistry, ParserBackend};
use crate::scanner::repo_name;

/// Default bound on a single file's parse time.
pub const DEFAULT_PARSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Extracts structural ASTs, consulting the registry before any parsing.
#[derive(Debug)]
pub struct AstExtractor {
    registry: LanguageRegistry,
    backends: BackendSet,
    parallel: bool,
}

impl Default for AstExtractor {
    fn default() -> Self {
        Self::new(
            LanguageRegistry::builtin(),
            BackendSet::builtin(Some(DEFAULT_PARSE_TIMEOUT)),
        )
    }
}

impl AstExtractor {
    /// Create an extractor over an explicit registry and backend set.
    pub fn new(registry: LanguageRegistry, backends: BackendSet) -> Self {
        Self {
            registry,
            backends,
            parallel: true,
        }
    }

    /// Parse files in parallel (default) or sequentially.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The registry this extractor consults.
    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// The backends available to this extractor.
    pub fn backends(&self) -> &BackendSet {
        &self.backends
    }

    /// Extract ASTs for `files` (repo-relative, all of `language`).
    ///
    /// Returns `Ok(None)` when the registry reports no AST support for the
    /// language, and `NotImplemented` when it reports support that no
    /// backend provides. Otherwise the result holds exactly one entry per
    /// input file, in input order.
    pub fn extract(
        &self,
        root: &Path,
        language: &str,
        files: &[String],
    ) -> Result<Option<AstResult>, AnalysisError> {
        let caps = self.registry.capabilities_for(language);
        if !caps.has_ast {
            debug!("no AST support for {}", language);
            return Ok(None);
        }

        let backend = match caps.parser_backend {
            ParserBackend::TreeSitter => self.backends.get(language),
            ParserBackend::None => None,
        }
        .ok_or_else(|| AnalysisError::NotImplemented(language.to_string()))?;

        let ast_files: Vec<AstFile> = if self.parallel {
            files
                .par_iter()
                .map(|f| extract_file(root, f, language, backend))
                .collect()
        } else {
            files
                .iter()
                .map(|f| extract_file(root, f, language, backend))
                .collect()
        };

        info!("extracted {} {} files", ast_files.len(), language);

        Ok(Some(AstResult {
            repo: repo_name(root),
            language: language.to_string(),
            files: ast_files,
        }))
    }
}

/// Extract with the built-in registry and backends.
pub fn extract(
    root: &Path,
    language: &str,
    files: &[String],
) -> Result<Option<AstResult>, AnalysisError> {
    AstExtractor::default().extract(root, language, files)
}

fn extract_file(
    root: &Path,
    rel_path: &str,
    language: &str,
    backend: &dyn LanguageBackend,
) -> AstFile {
    let path = root.join(rel_path);
    let parsed = read_source(&path).and_then(|source| backend.parse_file(&path, &source));
    if parsed.is_none() {
        debug!("unparsable, emitting empty module: {}", rel_path);
    }

    AstFile {
        file_path: rel_path.to_string(),
        language: language.to_string(),
        root: parsed.unwrap_or_else(AstNode::empty_module),
    }
}

fn read_source(path: &Path) -> Option<String> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("cannot read {}: {}", path.display(), e);
            return None;
        }
    };
    match String::from_utf8(bytes) {
        Ok(source) => Some(source),
        Err(_) => {
            debug!("not valid UTF-8: {}", path.display());
            None
        }
    }
}
