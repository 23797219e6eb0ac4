//! Language capability registry.
//!
//! Declares what the pipeline knows about each language: whether a
//! structural AST can be produced, which parser backend would produce it,
//! and how mature that support is. This module holds data only; it never
//! parses and never touches the filesystem.
//!
//! The registry is an ordinary value. Build one with
//! [`LanguageRegistry::builtin`], adjust it with
//! [`LanguageRegistry::with_language`], and hand it to the components that
//! need it. Every language-specific decision goes through
//! [`LanguageRegistry::capabilities_for`], so supporting a new language is a
//! change in one place.

mod builtin;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Backend that would produce a structural AST for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserBackend {
    TreeSitter,
    None,
}

impl ParserBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParserBackend::TreeSitter => "tree_sitter",
            ParserBackend::None => "none",
        }
    }
}

impl fmt::Display for ParserBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maturity of a language's support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportStatus {
    Stable,
    Experimental,
    Unknown,
}

impl SupportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportStatus::Stable => "stable",
            SupportStatus::Experimental => "experimental",
            SupportStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SupportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the pipeline can do for one language.
///
/// Fields missing from a deserialized record take their
/// [`LanguageCapabilities::UNKNOWN`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageCapabilities {
    pub has_ast: bool,
    pub parser_backend: ParserBackend,
    pub supports_import_graph: bool,
    pub supports_entry_points: bool,
    pub status: SupportStatus,
}

impl LanguageCapabilities {
    /// Capability record for languages the registry knows nothing about.
    pub const UNKNOWN: Self = Self {
        has_ast: false,
        parser_backend: ParserBackend::None,
        supports_import_graph: false,
        supports_entry_points: false,
        status: SupportStatus::Unknown,
    };

    /// A fully supported tree-sitter language at the given maturity.
    pub const fn tree_sitter(status: SupportStatus) -> Self {
        Self {
            has_ast: true,
            parser_backend: ParserBackend::TreeSitter,
            supports_import_graph: true,
            supports_entry_points: true,
            status,
        }
    }
}

impl Default for LanguageCapabilities {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

static UNKNOWN: LanguageCapabilities = LanguageCapabilities::UNKNOWN;

/// Lookup table from language name to capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRegistry {
    entries: BTreeMap<String, LanguageCapabilities>,
}

impl LanguageRegistry {
    /// A registry with no entries; every lookup yields the unknown record.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The built-in capability table.
    pub fn builtin() -> Self {
        let entries = builtin::BUILTIN_LANGUAGES
            .iter()
            .map(|(name, caps)| (name.to_string(), *caps))
            .collect();
        Self { entries }
    }

    /// Add or replace a language entry.
    pub fn with_language(mut self, name: impl Into<String>, caps: LanguageCapabilities) -> Self {
        self.insert(name, caps);
        self
    }

    /// Add or replace a language entry in place.
    pub fn insert(&mut self, name: impl Into<String>, caps: LanguageCapabilities) {
        self.entries.insert(name.into(), caps);
    }

    /// Look up a language by exact name.
    ///
    /// Never fails: unregistered names map to [`LanguageCapabilities::UNKNOWN`].
    pub fn capabilities_for(&self, language: &str) -> &LanguageCapabilities {
        self.entries.get(language).unwrap_or(&UNKNOWN)
    }

    /// Whether the language has an explicit entry.
    pub fn contains(&self, language: &str) -> bool {
        self.entries.contains_key(language)
    }

    /// All entries, sorted by language name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &LanguageCapabilities)> {
        self.entries.iter().map(|(name, caps)| (name.as_str(), caps))
    }

    /// Names of languages with AST support, sorted.
    pub fn ast_languages(&self) -> Vec<&str> {
        self.entries()
            .filter(|(_, caps)| caps.has_ast)
            .map(|(name, _)| name)
            .collect()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_python_is_stable() {
        let registry = LanguageRegistry::builtin();
        let caps = registry.capabilities_for("python");
        assert!(caps.has_ast);
        assert_eq!(caps.parser_backend, ParserBackend::TreeSitter);
        assert_eq!(caps.status, SupportStatus::Stable);
    }

    #[test]
    fn test_java_is_experimental() {
        let registry = LanguageRegistry::builtin();
        assert_eq!(
            registry.capabilities_for("java").status,
            SupportStatus::Experimental
        );
    }

    #[test]
    fn test_unregistered_language_is_unknown() {
        let registry = LanguageRegistry::builtin();
        assert_eq!(
            *registry.capabilities_for("cobol"),
            LanguageCapabilities::UNKNOWN
        );
        // Lookup is by exact name
        assert!(!registry.capabilities_for("Python").has_ast);
    }

    #[test]
    fn test_registered_without_ast() {
        let registry = LanguageRegistry::builtin();
        for lang in ["c", "cpp", "go", "rust"] {
            let caps = registry.capabilities_for(lang);
            assert!(registry.contains(lang));
            assert!(!caps.has_ast, "{} should not have AST support", lang);
            assert_eq!(caps.parser_backend, ParserBackend::None);
        }
    }

    #[test]
    fn test_with_language_overrides_without_touching_builtin() {
        let custom = LanguageRegistry::builtin()
            .with_language("go", LanguageCapabilities::tree_sitter(SupportStatus::Experimental));
        assert!(custom.capabilities_for("go").has_ast);
        assert!(!LanguageRegistry::builtin().capabilities_for("go").has_ast);
    }

    #[test]
    fn test_ast_languages_sorted() {
        let registry = LanguageRegistry::builtin();
        assert_eq!(
            registry.ast_languages(),
            vec!["java", "javascript", "python", "typescript"]
        );
    }

    #[test]
    fn test_capabilities_wire_format() {
        let json = serde_json::to_value(LanguageCapabilities::UNKNOWN).unwrap();
        assert_eq!(json["parser_backend"], "none");
        assert_eq!(json["status"], "unknown");

        let json =
            serde_json::to_value(LanguageCapabilities::tree_sitter(SupportStatus::Stable)).unwrap();
        assert_eq!(json["parser_backend"], "tree_sitter");
        assert_eq!(json["status"], "stable");
    }
}
