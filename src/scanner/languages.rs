//! Extension and ignore tables used by the scanner.

use phf::phf_map;

/// File extension (lowercase, without dot) to language name.
///
/// Every language listed here has an entry in the built-in registry.
pub static EXTENSION_LANGUAGES: phf::Map<&'static str, &'static str> = phf_map! {
    // Python
    "py" => "python",
    "pyi" => "python",
    // JavaScript
    "js" => "javascript",
    "jsx" => "javascript",
    "mjs" => "javascript",
    "cjs" => "javascript",
    // TypeScript
    "ts" => "typescript",
    "tsx" => "typescript",
    "mts" => "typescript",
    "cts" => "typescript",
    // Java
    "java" => "java",
    // C
    "c" => "c",
    "h" => "c",
    // C++
    "cpp" => "cpp",
    "cc" => "cpp",
    "cxx" => "cpp",
    "hpp" => "cpp",
    "hh" => "cpp",
    // Rust
    "rs" => "rust",
    // Go
    "go" => "go",
};

/// Directory names that are never descended into.
///
/// Version control metadata, dependency and build output, caches, and IDE
/// settings.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "venv",
    ".venv",
    "__pycache__",
    ".mypy_cache",
    ".pytest_cache",
    ".tox",
    "dist",
    "build",
    "target",
    ".idea",
    ".vscode",
];

/// Map an extension to a built-in language. Matching is case-insensitive.
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    EXTENSION_LANGUAGES
        .get(ext.to_ascii_lowercase().as_str())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::LanguageRegistry;

    #[test]
    fn test_case_insensitive_lookup() {
        assert_eq!(language_for_extension("py"), Some("python"));
        assert_eq!(language_for_extension("PY"), Some("python"));
        assert_eq!(language_for_extension("Tsx"), Some("typescript"));
        assert_eq!(language_for_extension("md"), None);
        assert_eq!(language_for_extension(""), None);
    }

    #[test]
    fn test_every_language_is_registered() {
        let registry = LanguageRegistry::builtin();
        for (ext, lang) in EXTENSION_LANGUAGES.entries() {
            assert!(
                registry.contains(lang),
                "extension {} maps to unregistered language {}",
                ext,
                lang
            );
        }
    }
}
