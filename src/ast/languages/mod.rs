//! Language-specific backend implementations.

#[cfg(feature = "tree-sitter")]
mod java;
#[cfg(feature = "tree-sitter")]
mod javascript;
#[cfg(feature = "tree-sitter")]
mod python;
#[cfg(feature = "tree-sitter")]
mod typescript;

use std::collections::BTreeMap;
use std::time::Duration;

use super::LanguageBackend;

/// Backends keyed by language name.
///
/// The extractor only consults this set after the registry has confirmed a
/// language is AST-capable; a capable language with no entry here is a
/// `NotImplemented` condition.
#[derive(Default)]
pub struct BackendSet {
    backends: BTreeMap<&'static str, Box<dyn LanguageBackend>>,
}

impl BackendSet {
    /// A set with no backends.
    pub fn empty() -> Self {
        Self::default()
    }

    /// All backends compiled into this build.
    ///
    /// `parse_timeout` bounds each file's parse; `None` means unbounded.
    #[cfg(feature = "tree-sitter")]
    pub fn builtin(parse_timeout: Option<Duration>) -> Self {
        Self::empty()
            .with_backend(java::new_backend().with_timeout(parse_timeout))
            .with_backend(javascript::new_backend().with_timeout(parse_timeout))
            .with_backend(python::new_backend().with_timeout(parse_timeout))
            .with_backend(typescript::new_backend().with_timeout(parse_timeout))
    }

    /// No tree-sitter backends without the `tree-sitter` feature.
    #[cfg(not(feature = "tree-sitter"))]
    pub fn builtin(_parse_timeout: Option<Duration>) -> Self {
        Self::empty()
    }

    /// Add a backend, replacing any existing one for the same language.
    pub fn with_backend(mut self, backend: impl LanguageBackend + 'static) -> Self {
        self.register(Box::new(backend));
        self
    }

    /// Register a boxed backend.
    pub fn register(&mut self, backend: Box<dyn LanguageBackend>) {
        self.backends.insert(backend.language_id(), backend);
    }

    /// Get the backend for a language.
    pub fn get(&self, language: &str) -> Option<&dyn LanguageBackend> {
        self.backends.get(language).map(|b| b.as_ref())
    }

    /// Languages with a backend, sorted.
    pub fn languages(&self) -> Vec<&'static str> {
        self.backends.keys().copied().collect()
    }
}

impl std::fmt::Debug for BackendSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSet")
            .field("languages", &self.languages())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(feature = "tree-sitter")]
    fn test_builtin_backends_cover_registry() {
        use crate::registry::LanguageRegistry;

        let backends = BackendSet::builtin(None);
        let registry = LanguageRegistry::builtin();
        for lang in registry.ast_languages() {
            assert!(backends.get(lang).is_some(), "no backend for {}", lang);
        }
    }

    #[test]
    #[cfg(feature = "tree-sitter")]
    fn test_backends_handle_their_extensions() {
        let backends = BackendSet::builtin(None);
        assert!(backends.get("python").unwrap().handles_extension("py"));
        assert!(backends.get("typescript").unwrap().handles_extension("tsx"));
        assert!(!backends.get("java").unwrap().handles_extension("py"));
    }

    #[test]
    fn test_empty_set() {
        let backends = BackendSet::empty();
        assert!(backends.get("python").is_none());
        assert!(backends.languages().is_empty());
    }
}
