//! Pipeline that ties scanning, extraction, summarizing and classification together.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::ast::{AstExtractor, AstResult};
use crate::config::Config;
use crate::error::AnalysisError;
use crate::metadata::{ClassifierRules, RepoMetadata};
use crate::scanner::{ScanResult, Scanner};
use crate::summary::{self, Summary};

/// Everything the pipeline derives from one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoAnalysis {
    pub scan: ScanResult,
    pub metadata: RepoMetadata,
    /// One summary per AST-capable language present, by language name.
    pub summaries: Vec<Summary>,
    /// Languages present that have no AST support, sorted.
    pub unsupported_languages: Vec<String>,
}

/// Runs the analysis stages with a fixed set of components.
#[derive(Debug)]
pub struct Pipeline {
    scanner: Scanner,
    extractor: AstExtractor,
    rules: ClassifierRules,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Scanner::new(), AstExtractor::default(), ClassifierRules::default())
    }
}

impl Pipeline {
    /// Create a pipeline from explicit components.
    pub fn new(scanner: Scanner, extractor: AstExtractor, rules: ClassifierRules) -> Self {
        Self {
            scanner,
            extractor,
            rules,
        }
    }

    /// Create a pipeline from a configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            config.scanner()?,
            config.extractor(),
            config.classifier_rules(),
        ))
    }

    pub fn extractor(&self) -> &AstExtractor {
        &self.extractor
    }

    pub fn scan(&self, root: &Path) -> Result<ScanResult, AnalysisError> {
        self.scanner.scan(root)
    }

    /// Extract ASTs for an explicit file list. `Ok(None)` means no AST support.
    pub fn extract(
        &self,
        root: &Path,
        language: &str,
        files: &[String],
    ) -> Result<Option<AstResult>, AnalysisError> {
        self.extractor.extract(root, language, files)
    }

    /// Extract ASTs for every scanned file of `language`.
    pub fn extract_language(
        &self,
        root: &Path,
        scan: &ScanResult,
        language: &str,
    ) -> Result<Option<AstResult>, AnalysisError> {
        self.extract(root, language, &scan.files_for_language(language))
    }

    pub fn summarize(&self, result: &AstResult) -> Summary {
        summary::summarize(result)
    }

    pub fn metadata(&self, root: &Path, scan: &ScanResult) -> Result<RepoMetadata, AnalysisError> {
        let dirs = self.scanner.top_level_dir_names(root)?;
        Ok(self.rules.classify(scan, &dirs))
    }

    /// Run every stage over a repository.
    pub fn analyze(&self, root: &Path) -> Result<RepoAnalysis, AnalysisError> {
        let scan = self.scan(root)?;
        let metadata = self.metadata(root, &scan)?;

        let mut summaries = Vec::new();
        let mut unsupported_languages = Vec::new();
        for language in &scan.languages {
            match self.extract_language(root, &scan, language)? {
                Some(result) => summaries.push(self.summarize(&result)),
                None => unsupported_languages.push(language.clone()),
            }
        }

        info!(
            "analyzed {}: {} files, {} summarized languages, repo type {}",
            scan.repo,
            scan.file_count,
            summaries.len(),
            metadata.repo_type
        );

        Ok(RepoAnalysis {
            scan,
            metadata,
            summaries,
            unsupported_languages,
        })
    }
}
