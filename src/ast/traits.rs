//! Core trait for structural AST backends.

use std::path::Path;

use super::AstNode;

/// Language-specific structural parser.
///
/// Each AST-capable language provides one implementation. Backends are
/// selected by language name after consulting the capability registry.
///
/// # Thread Safety
///
/// Files are parsed in parallel, so implementations must be `Send + Sync`.
/// tree_sitter::Parser is not Sync; create one per call.
pub trait LanguageBackend: Send + Sync {
    /// Returns the language identifier (e.g., "python").
    fn language_id(&self) -> &'static str;

    /// Returns file extensions this backend handles (without dot).
    fn file_extensions(&self) -> &'static [&'static str];

    /// Build the structural tree for one file.
    ///
    /// Returns `None` when the source cannot be parsed: syntax errors,
    /// parser timeouts, or parser setup failures. `path` is only used to
    /// pick a grammar dialect and for diagnostics.
    fn parse_file(&self, path: &Path, source: &str) -> Option<AstNode>;

    /// Check if this backend handles the given file extension.
    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions().contains(&ext)
    }
}
