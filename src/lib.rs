//! Codenarrator - structural analysis of source repositories.
//!
//! Codenarrator reduces a repository to a small, deterministic structural
//! picture: which source files exist in which languages, what classes and
//! functions each file defines, how deeply they nest, and what kind of
//! repository it is.
//!
//! # Architecture
//!
//! - `registry`: Per-language capability table, consulted before any parsing
//! - `scanner`: Filesystem walk and extension-based classification
//! - `ast`: Structural AST extraction over tree-sitter backends
//! - `summary`: Counts, depths and complexity ranking over extracted trees
//! - `metadata`: Repository archetype heuristics
//! - `pipeline`: Facade running the stages in order
//! - `config`: YAML configuration schema and discovery
//! - `report`: Output formatting (pretty, JSON)
//!
//! # Example
//!
//! ```no_run
//! use codenarrator::Pipeline;
//! use std::path::Path;
//!
//! let analysis = Pipeline::default().analyze(Path::new("."))?;
//! println!("{} is a {} repository", analysis.scan.repo, analysis.metadata.repo_type);
//! # Ok::<(), codenarrator::AnalysisError>(())
//! ```

pub mod ast;
pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod scanner;
pub mod summary;

pub use ast::{extract, AstExtractor, AstFile, AstNode, AstResult, BackendSet, LanguageBackend, NodeType};
pub use config::Config;
pub use error::AnalysisError;
pub use metadata::{classify, ClassifierRules, RepoMetadata, RepoType};
pub use pipeline::{Pipeline, RepoAnalysis};
pub use registry::{LanguageCapabilities, LanguageRegistry, ParserBackend, SupportStatus};
pub use scanner::{scan, ScanResult, Scanner};
pub use summary::{file_summaries, summarize, FileSummary, Summary};
