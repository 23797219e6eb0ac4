//! Repository-level summary of an extraction result.
//!
//! Pure functions over in-memory trees: no parsing, no file I/O. Each file's
//! tree is walked once; counts are summed and depths maxed across files.

use serde::{Deserialize, Serialize};

use crate::ast::{AstFile, AstNode, AstResult, NodeType};

/// Number of files kept in [`Summary::most_complex_files`].
pub const MOST_COMPLEX_LIMIT: usize = 5;

/// Structural counts for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub file_path: String,
    pub classes: usize,
    /// Functions and async functions.
    pub functions: usize,
    /// Deepest level reached, the module root being depth 1.
    pub max_depth: usize,
}

impl FileSummary {
    /// Ranking key: (definitions, depth).
    pub fn complexity_key(&self) -> (usize, usize) {
        (self.classes + self.functions, self.max_depth)
    }
}

/// Digest of an extraction result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub repo: String,
    pub language: String,
    pub files_analyzed: usize,
    pub total_classes: usize,
    pub total_functions: usize,
    /// 0 when no files were analyzed.
    pub max_nesting_depth: usize,
    /// Up to five files, most complex first.
    pub most_complex_files: Vec<FileSummary>,
}

/// Summarize an extraction result.
pub fn summarize(result: &AstResult) -> Summary {
    let mut ranked = file_summaries(result);

    let total_classes = ranked.iter().map(|f| f.classes).sum();
    let total_functions = ranked.iter().map(|f| f.functions).sum();
    let max_nesting_depth = ranked.iter().map(|f| f.max_depth).max().unwrap_or(0);

    // Stable: exact ties keep extraction order
    ranked.sort_by(|a, b| b.complexity_key().cmp(&a.complexity_key()));
    ranked.truncate(MOST_COMPLEX_LIMIT);

    Summary {
        repo: result.repo.clone(),
        language: result.language.clone(),
        files_analyzed: result.files.len(),
        total_classes,
        total_functions,
        max_nesting_depth,
        most_complex_files: ranked,
    }
}

/// Per-file summaries in extraction order.
pub fn file_summaries(result: &AstResult) -> Vec<FileSummary> {
    result.files.iter().map(summarize_file).collect()
}

/// Count classes, functions and depth in one file.
pub fn summarize_file(file: &AstFile) -> FileSummary {
    let mut classes = 0;
    let mut functions = 0;
    let mut max_depth = 0;

    // Explicit stack so adversarially deep trees cannot exhaust the call stack
    let mut stack: Vec<(&AstNode, usize)> = vec![(&file.root, 1)];
    while let Some((node, depth)) = stack.pop() {
        max_depth = max_depth.max(depth);
        if node.node_type == NodeType::Class {
            classes += 1;
        } else if node.node_type.is_callable() {
            functions += 1;
        }
        stack.extend(node.children.iter().map(|child| (child, depth + 1)));
    }

    FileSummary {
        file_path: file.file_path.clone(),
        classes,
        functions,
        max_depth,
    }
}
