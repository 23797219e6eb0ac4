//! Built-in language capability table.

use super::{LanguageCapabilities, SupportStatus};

/// Single source of truth for the default capabilities.
///
/// Every language the scanner can produce must appear here.
pub(super) const BUILTIN_LANGUAGES: &[(&str, LanguageCapabilities)] = &[
    (
        "python",
        LanguageCapabilities::tree_sitter(SupportStatus::Stable),
    ),
    (
        "javascript",
        LanguageCapabilities::tree_sitter(SupportStatus::Stable),
    ),
    (
        "typescript",
        LanguageCapabilities::tree_sitter(SupportStatus::Stable),
    ),
    (
        "java",
        LanguageCapabilities::tree_sitter(SupportStatus::Experimental),
    ),
    ("cpp", LanguageCapabilities::UNKNOWN),
    ("c", LanguageCapabilities::UNKNOWN),
    ("rust", LanguageCapabilities::UNKNOWN),
    ("go", LanguageCapabilities::UNKNOWN),
    ("unknown", LanguageCapabilities::UNKNOWN),
];
