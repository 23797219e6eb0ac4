//! Repository scanner.
//!
//! Walks a source tree, prunes ignorable directories, and classifies every
//! remaining file by extension. Files with unrecognised extensions are left
//! out of the result entirely.
//!
//! Output is sorted so that two scans of an unchanged tree serialize to the
//! same bytes no matter what order the filesystem yields entries in.

mod languages;

pub use languages::{language_for_extension, DEFAULT_IGNORE_DIRS, EXTENSION_LANGUAGES};

use globset::GlobSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Component, Path};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::AnalysisError;

/// Structured view of a repository's source files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Repository name, taken from the root directory name.
    pub repo: String,
    /// Distinct languages present, sorted.
    pub languages: Vec<String>,
    pub file_count: usize,
    /// Repo-relative paths with `/` separators, sorted.
    pub files: Vec<String>,
    /// Language of each entry in `files`.
    pub file_languages: BTreeMap<String, String>,
}

impl ScanResult {
    /// Files of one language, in `files` order.
    pub fn files_for_language(&self, language: &str) -> Vec<String> {
        self.files
            .iter()
            .filter(|f| self.file_languages.get(*f).map(String::as_str) == Some(language))
            .cloned()
            .collect()
    }

    /// Number of files per language.
    pub fn language_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for lang in self.file_languages.values() {
            *counts.entry(lang.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// Configurable filesystem scanner.
#[derive(Debug, Clone)]
pub struct Scanner {
    ignore_dirs: HashSet<String>,
    extensions: HashMap<String, String>,
    exclude: Option<GlobSet>,
    follow_links: bool,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// A scanner with the built-in ignore set and extension table.
    pub fn new() -> Self {
        Self {
            ignore_dirs: DEFAULT_IGNORE_DIRS.iter().map(|d| d.to_string()).collect(),
            extensions: HashMap::new(),
            exclude: None,
            follow_links: false,
        }
    }

    /// Add a directory name to the ignore set.
    pub fn ignore_dir(mut self, name: impl Into<String>) -> Self {
        self.ignore_dirs.insert(name.into());
        self
    }

    /// Map an extension (without dot) to a language, overriding the built-in table.
    pub fn extension(mut self, ext: &str, language: impl Into<String>) -> Self {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        self.extensions.insert(ext, language.into());
        self
    }

    /// Skip repo-relative paths matching any of these globs.
    pub fn exclude(mut self, globs: GlobSet) -> Self {
        self.exclude = Some(globs);
        self
    }

    /// Follow symbolic links while walking. Link loops are reported and skipped.
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Whether a path segment prunes the walk.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_dirs.contains(name)
    }

    /// Language for a file path, or `None` for unrecognised extensions.
    pub fn language_for(&self, path: &Path) -> Option<String> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if let Some(lang) = self.extensions.get(&ext) {
            return Some(lang.clone());
        }
        language_for_extension(&ext).map(str::to_string)
    }

    /// Scan a repository root.
    pub fn scan(&self, root: &Path) -> Result<ScanResult, AnalysisError> {
        if !root.is_dir() {
            return Err(AnalysisError::InvalidRepository(root.to_path_buf()));
        }

        let mut files = Vec::new();
        let mut file_languages = BTreeMap::new();
        let mut languages = BTreeSet::new();

        let walker = WalkDir::new(root)
            .follow_links(self.follow_links)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_ignored(&e.file_name().to_string_lossy()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(AnalysisError::Walk {
                        path: root.to_path_buf(),
                        source: e,
                    });
                }
                Err(e) => {
                    if let Some(ancestor) = e.loop_ancestor() {
                        warn!("skipping symlink loop back to {}", ancestor.display());
                    } else {
                        warn!("skipping unreadable entry: {}", e);
                    }
                    continue;
                }
            };

            let file_type = entry.file_type();
            let is_file =
                file_type.is_file() || (file_type.is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            // Lossy conversion would map distinct names onto one key
            let Some(rel_path) = relative_path_string(relative) else {
                warn!("skipping non-UTF-8 path: {}", entry.path().display());
                continue;
            };

            if let Some(exclude) = &self.exclude {
                if exclude.is_match(&rel_path) {
                    debug!("excluded by pattern: {}", rel_path);
                    continue;
                }
            }

            let Some(language) = self.language_for(entry.path()) else {
                continue;
            };

            languages.insert(language.clone());
            file_languages.insert(rel_path.clone(), language);
            files.push(rel_path);
        }

        files.sort();
        debug!(
            "scanned {}: {} files in {} languages",
            root.display(),
            files.len(),
            languages.len()
        );

        Ok(ScanResult {
            repo: repo_name(root),
            languages: languages.into_iter().collect(),
            file_count: files.len(),
            files,
            file_languages,
        })
    }

    /// Names of the immediate, non-ignored subdirectories of `root`, sorted.
    pub fn top_level_dir_names(&self, root: &Path) -> Result<BTreeSet<String>, AnalysisError> {
        if !root.is_dir() {
            return Err(AnalysisError::InvalidRepository(root.to_path_buf()));
        }
        let entries = fs::read_dir(root).map_err(|source| AnalysisError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        let mut dirs = BTreeSet::new();
        for entry in entries.flatten() {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if entry.path().is_dir() && !self.is_ignored(&name) {
                dirs.insert(name);
            }
        }
        Ok(dirs)
    }
}

/// Scan with the default scanner.
pub fn scan(root: &Path) -> Result<ScanResult, AnalysisError> {
    Scanner::new().scan(root)
}

/// Repository name derived from the root directory.
pub fn repo_name(root: &Path) -> String {
    if let Some(name) = root.file_name() {
        return name.to_string_lossy().to_string();
    }
    // "." and friends have no file name until resolved
    root.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_default()
}

/// Join path components with `/` so output is identical across platforms.
///
/// Returns `None` when a component is not valid UTF-8.
pub(crate) fn relative_path_string(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        if let Component::Normal(part) = component {
            parts.push(part.to_str()?);
        }
    }
    Some(parts.join("/"))
}
