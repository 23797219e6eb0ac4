//! Configuration file schema and loading.
//!
//! A configuration file is optional. Every section and every field has a
//! default, so an empty file and no file at all behave identically.

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::ast::{AstExtractor, BackendSet, DEFAULT_PARSE_TIMEOUT};
use crate::metadata::ClassifierRules;
use crate::registry::{LanguageCapabilities, LanguageRegistry};
use crate::scanner::Scanner;

/// File names looked up in the working directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["codenarrator.yaml", ".codenarrator.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Registry overrides: entries here replace or extend the built-in table.
    #[serde(default)]
    pub languages: BTreeMap<String, LanguageCapabilities>,
}

/// Scanner settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ScannerConfig {
    /// Directory names pruned in addition to the built-in set
    #[serde(default)]
    pub ignore_dirs: Vec<String>,
    /// Extra `extension: language` entries (e.g., `pyw: python`)
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
    /// Glob patterns over repo-relative paths (e.g., "**/migrations/**")
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub follow_links: bool,
}

/// Extraction settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ExtractionConfig {
    /// Parse files in parallel (default: true)
    #[serde(default)]
    pub parallel: Option<bool>,
    /// Per-file parse timeout in milliseconds (default: 5000, 0 disables)
    #[serde(default)]
    pub parse_timeout_ms: Option<u64>,
}

impl ExtractionConfig {
    pub fn is_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }

    /// Returns `None` when parse time is unbounded.
    pub fn parse_timeout(&self) -> Option<Duration> {
        match self.parse_timeout_ms {
            Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
            None => Some(DEFAULT_PARSE_TIMEOUT),
        }
    }
}

/// Classifier settings. Each present list replaces the default set.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub entry_points: Option<Vec<String>>,
    #[serde(default)]
    pub known_top_level_dirs: Option<Vec<String>>,
    #[serde(default)]
    pub frontend_dirs: Option<Vec<String>>,
    #[serde(default)]
    pub frontend_languages: Option<Vec<String>>,
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Load the configuration in effect.
    ///
    /// An explicit path must exist. Otherwise the working directory and then
    /// the user config directory are searched; finding nothing yields the
    /// defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let cwd = std::env::current_dir().context("resolving working directory")?;
                discover(&cwd)
            }
        };

        let config = match path {
            Some(path) => {
                debug!("loading config from {}", path.display());
                Self::parse_file(&path)?
            }
            None => Self::default(),
        };
        validate(&config)?;
        Ok(config)
    }

    /// The registry with this configuration's overrides applied.
    pub fn registry(&self) -> LanguageRegistry {
        let mut registry = LanguageRegistry::builtin();
        for (name, caps) in &self.languages {
            registry.insert(name.clone(), *caps);
        }
        registry
    }

    /// A scanner with this configuration's ignore set, extensions and excludes.
    pub fn scanner(&self) -> anyhow::Result<Scanner> {
        let mut scanner = Scanner::new().follow_links(self.scanner.follow_links);
        for dir in &self.scanner.ignore_dirs {
            scanner = scanner.ignore_dir(dir.clone());
        }
        for (ext, language) in &self.scanner.extensions {
            scanner = scanner.extension(ext, language.clone());
        }
        if !self.scanner.exclude.is_empty() {
            scanner = scanner.exclude(build_globset(&self.scanner.exclude)?);
        }
        Ok(scanner)
    }

    /// The built-in backends with this configuration's parse timeout.
    pub fn backends(&self) -> BackendSet {
        BackendSet::builtin(self.extraction.parse_timeout())
    }

    /// An extractor over [`Config::registry`] and [`Config::backends`].
    pub fn extractor(&self) -> AstExtractor {
        AstExtractor::new(self.registry(), self.backends()).parallel(self.extraction.is_parallel())
    }

    pub fn classifier_rules(&self) -> ClassifierRules {
        let mut rules = ClassifierRules::default();
        let c = &self.classifier;
        if let Some(v) = &c.entry_points {
            rules.entry_point_files = v.iter().cloned().collect();
        }
        if let Some(v) = &c.known_top_level_dirs {
            rules.known_top_level_dirs = v.iter().cloned().collect();
        }
        if let Some(v) = &c.frontend_dirs {
            rules.frontend_dirs = v.iter().cloned().collect();
        }
        if let Some(v) = &c.frontend_languages {
            rules.frontend_languages = v.iter().cloned().collect();
        }
        rules
    }
}

/// Find a config file for a working directory: a local file first, then
/// the per-user one.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    local_config_file(dir).or_else(user_config_file)
}

/// The first of [`CONFIG_FILE_NAMES`] present in `dir`.
pub fn local_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

fn user_config_file() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "codenarrator")
        .map(|d| d.config_dir().join("config.yaml"))
        .filter(|path| path.is_file())
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .with_context(|| format!("invalid exclude pattern {:?}", pattern))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Validate a configuration for correctness.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    for pattern in &config.scanner.exclude {
        Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid exclude pattern {:?}: {}", pattern, e))?;
    }

    for (ext, language) in &config.scanner.extensions {
        if ext.trim_start_matches('.').is_empty() {
            anyhow::bail!("empty extension mapped to {:?}", language);
        }
        if language.is_empty() {
            anyhow::bail!("extension {:?} mapped to an empty language name", ext);
        }
    }

    for dir in &config.scanner.ignore_dirs {
        if dir.is_empty() {
            anyhow::bail!("empty name in scanner.ignore_dirs");
        }
    }

    if config.languages.keys().any(|name| name.is_empty()) {
        anyhow::bail!("empty language name in languages");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ParserBackend, SupportStatus};
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
scanner:
  ignore_dirs: [vendor]
  extensions:
    pyw: python
  exclude:
    - "**/migrations/**"
extraction:
  parallel: false
  parse_timeout_ms: 250
classifier:
  entry_points: [cli.py]
languages:
  go:
    has_ast: true
    parser_backend: tree_sitter
    status: experimental
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.scanner.ignore_dirs, vec!["vendor"]);
        assert!(!config.extraction.is_parallel());
        assert_eq!(config.extraction.parse_timeout(), Some(Duration::from_millis(250)));
        validate(&config).unwrap();

        let go = config.languages["go"];
        assert!(go.has_ast);
        assert_eq!(go.parser_backend, ParserBackend::TreeSitter);
        assert_eq!(go.status, SupportStatus::Experimental);
        assert!(!go.supports_import_graph);

        let rules = config.classifier_rules();
        assert!(rules.entry_point_files.contains("cli.py"));
        assert!(!rules.entry_point_files.contains("main.py"));
        assert!(rules.frontend_dirs.contains("src"));
    }

    #[test]
    fn test_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert!(config.extraction.is_parallel());
        assert_eq!(config.extraction.parse_timeout(), Some(DEFAULT_PARSE_TIMEOUT));
        assert_eq!(config.registry(), LanguageRegistry::builtin());
        assert_eq!(config.classifier_rules(), ClassifierRules::default());
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config = ExtractionConfig {
            parse_timeout_ms: Some(0),
            ..Default::default()
        };
        assert_eq!(config.parse_timeout(), None);
    }

    #[test]
    fn test_registry_overrides() {
        let mut config = Config::default();
        config
            .languages
            .insert("python".into(), LanguageCapabilities::UNKNOWN);
        let registry = config.registry();
        assert!(!registry.capabilities_for("python").has_ast);
        assert!(registry.capabilities_for("java").has_ast);
    }

    #[test]
    fn test_scanner_from_config() {
        let temp = TempDir::new().unwrap();
        for rel in ["app/x.py", "app/y.pyw", "vendor/z.py", "db/migrations/001.py"] {
            let path = temp.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }

        let config: Config = serde_yaml::from_str(
            "scanner:\n  ignore_dirs: [vendor]\n  extensions: {pyw: python}\n  exclude: [\"**/migrations/**\"]\n",
        )
        .unwrap();
        let scan = config.scanner().unwrap().scan(temp.path()).unwrap();
        assert_eq!(scan.files, vec!["app/x.py", "app/y.pyw"]);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let mut config = Config::default();
        config.scanner.exclude.push("a[".into());
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.scanner.extensions.insert("x".into(), String::new());
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.languages.insert(String::new(), LanguageCapabilities::UNKNOWN);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_local_config_discovery() {
        let temp = TempDir::new().unwrap();
        assert!(local_config_file(temp.path()).is_none());

        fs::write(temp.path().join(".codenarrator.yaml"), "{}").unwrap();
        assert_eq!(
            local_config_file(temp.path()),
            Some(temp.path().join(".codenarrator.yaml"))
        );

        fs::write(temp.path().join("codenarrator.yaml"), "{}").unwrap();
        assert_eq!(
            local_config_file(temp.path()),
            Some(temp.path().join("codenarrator.yaml"))
        );
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let err = Config::load(Some(&temp.path().join("nope.yaml"))).unwrap_err();
        assert!(err.to_string().contains("nope.yaml"));
    }
}
