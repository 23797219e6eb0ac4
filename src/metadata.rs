//! Repository archetype classification.
//!
//! Deterministic, explainable heuristics over scan output and the names of
//! the root's top-level directories. No parsing is involved.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::scanner::ScanResult;

/// Filenames that conventionally start a program.
pub const DEFAULT_ENTRY_POINT_FILES: &[&str] = &[
    "main.py",
    "app.py",
    "__main__.py",
    "index.js",
    "server.js",
    "index.ts",
    "server.ts",
    "Main.java",
    "main.go",
    "main.rs",
];

/// Top-level directory names reported as structural signals.
pub const DEFAULT_KNOWN_TOP_LEVEL_DIRS: &[&str] =
    &["src", "backend", "frontend", "app", "tests", "docs"];

/// Top-level directories associated with front-end sources.
pub const DEFAULT_FRONTEND_DIRS: &[&str] = &["frontend", "src"];

/// Front-end scripting languages.
pub const DEFAULT_FRONTEND_LANGUAGES: &[&str] = &["javascript", "typescript"];

/// Repository archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoType {
    Library,
    Service,
    Frontend,
    Mixed,
    Unknown,
}

impl RepoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoType::Library => "library",
            RepoType::Service => "service",
            RepoType::Frontend => "frontend",
            RepoType::Mixed => "mixed",
            RepoType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RepoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Repository-level metadata derived from a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMetadata {
    /// Known structural directories present at the root, sorted.
    pub top_level_dirs: Vec<String>,
    pub language_breakdown: BTreeMap<String, usize>,
    /// Entry-point files, sorted.
    pub entry_points: Vec<String>,
    pub repo_type: RepoType,
}

/// Tunable inputs to the classification heuristics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierRules {
    pub entry_point_files: BTreeSet<String>,
    pub known_top_level_dirs: BTreeSet<String>,
    pub frontend_dirs: BTreeSet<String>,
    pub frontend_languages: BTreeSet<String>,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            entry_point_files: to_set(DEFAULT_ENTRY_POINT_FILES),
            known_top_level_dirs: to_set(DEFAULT_KNOWN_TOP_LEVEL_DIRS),
            frontend_dirs: to_set(DEFAULT_FRONTEND_DIRS),
            frontend_languages: to_set(DEFAULT_FRONTEND_LANGUAGES),
        }
    }
}

impl ClassifierRules {
    /// Whether the basename of `rel_path` is an entry-point filename (case-sensitive).
    pub fn is_entry_point(&self, rel_path: &str) -> bool {
        let basename = rel_path.rsplit('/').next().unwrap_or(rel_path);
        self.entry_point_files.contains(basename)
    }

    /// Derive metadata from a scan and the root's top-level directory names.
    pub fn classify(&self, scan: &ScanResult, top_level_dir_names: &BTreeSet<String>) -> RepoMetadata {
        let top_level_dirs: Vec<String> = top_level_dir_names
            .intersection(&self.known_top_level_dirs)
            .cloned()
            .collect();

        let mut entry_points: Vec<String> = scan
            .files
            .iter()
            .filter(|f| self.is_entry_point(f))
            .cloned()
            .collect();
        entry_points.sort();

        let repo_type = self.repo_type(&scan.languages, top_level_dir_names, !entry_points.is_empty());

        RepoMetadata {
            top_level_dirs,
            language_breakdown: scan.language_counts(),
            entry_points,
            repo_type,
        }
    }

    /// Apply the archetype rules in priority order; the first match wins.
    pub fn repo_type(
        &self,
        languages: &[String],
        top_level_dir_names: &BTreeSet<String>,
        has_entry_points: bool,
    ) -> RepoType {
        if languages.len() > 1 {
            return RepoType::Mixed;
        }

        if let [language] = languages {
            let frontend_layout = !self.frontend_dirs.is_disjoint(top_level_dir_names);
            if frontend_layout && self.frontend_languages.contains(language) {
                return RepoType::Frontend;
            }
        }

        if has_entry_points {
            return RepoType::Service;
        }

        if languages.len() == 1 {
            return RepoType::Library;
        }

        RepoType::Unknown
    }
}

/// Classify with the default rules.
pub fn classify(scan: &ScanResult, top_level_dir_names: &BTreeSet<String>) -> RepoMetadata {
    ClassifierRules::default().classify(scan, top_level_dir_names)
}

fn to_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}
