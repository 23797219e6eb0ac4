//! Command-line interface for codenarrator.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::ast::AstResult;
use crate::config::Config;
use crate::pipeline::Pipeline;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_NO_AST: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Structural analysis of source repositories.
///
/// Scans a repository, extracts a minimal structural AST (classes and
/// functions) for supported languages, summarizes it, and classifies the
/// repository's archetype.
#[derive(Parser)]
#[command(name = "codenarrator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List source files and languages
    Scan(PathArgs),
    /// Extract the structural AST for one language
    Ast(LanguageArgs),
    /// Summarize the structural AST for one language
    Summary(LanguageArgs),
    /// Classify the repository
    Metadata(PathArgs),
    /// Run every stage
    Analyze(PathArgs),
    /// Show the language capability registry
    Languages,
}

/// Arguments for commands that take only a repository.
#[derive(Parser)]
pub struct PathArgs {
    /// Repository root
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

/// Arguments for commands that work on one language.
#[derive(Parser)]
pub struct LanguageArgs {
    /// Repository root
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Language to extract (e.g., python)
    #[arg(short, long)]
    pub language: String,
}

/// Install the stderr log subscriber. `RUST_LOG` wins unless `--verbose` is given.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Run the parsed command line and return the process exit code.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    let config = Config::load(cli.config.as_deref())?;
    let pipeline = Pipeline::from_config(&config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::Scan(args) => run_scan(&pipeline, args, cli.format, &mut out),
        Commands::Ast(args) => run_ast(&pipeline, args, cli.format, &mut out),
        Commands::Summary(args) => run_summary(&pipeline, args, cli.format, &mut out),
        Commands::Metadata(args) => run_metadata(&pipeline, args, cli.format, &mut out),
        Commands::Analyze(args) => run_analyze(&pipeline, args, cli.format, &mut out),
        Commands::Languages => run_languages(&config, cli.format, &mut out),
    }
}

/// Run the scan command.
pub fn run_scan(
    pipeline: &Pipeline,
    args: &PathArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<i32> {
    let scan = pipeline.scan(&args.path)?;
    match format {
        OutputFormat::Json => report::write_json(out, &scan)?,
        OutputFormat::Pretty => report::write_scan(out, &scan)?,
    }
    Ok(EXIT_SUCCESS)
}

fn extract_for(
    pipeline: &Pipeline,
    args: &LanguageArgs,
    format: OutputFormat,
) -> anyhow::Result<Option<AstResult>> {
    let scan = pipeline.scan(&args.path)?;
    let result = with_spinner(format, &format!("Parsing {} files", args.language), || {
        pipeline.extract_language(&args.path, &scan, &args.language)
    })?;

    if result.is_none() {
        eprintln!("No AST support for language: {}", args.language);
        eprintln!("Run 'codenarrator languages' to see supported languages");
    }
    Ok(result)
}

/// Run the ast command.
pub fn run_ast(
    pipeline: &Pipeline,
    args: &LanguageArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<i32> {
    let Some(result) = extract_for(pipeline, args, format)? else {
        return Ok(EXIT_NO_AST);
    };
    match format {
        OutputFormat::Json => report::write_json(out, &result)?,
        OutputFormat::Pretty => report::write_ast(out, &result)?,
    }
    Ok(EXIT_SUCCESS)
}

/// Run the summary command.
pub fn run_summary(
    pipeline: &Pipeline,
    args: &LanguageArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<i32> {
    let Some(result) = extract_for(pipeline, args, format)? else {
        return Ok(EXIT_NO_AST);
    };
    let summary = pipeline.summarize(&result);
    match format {
        OutputFormat::Json => report::write_json(out, &summary)?,
        OutputFormat::Pretty => report::write_summary(out, &summary)?,
    }
    Ok(EXIT_SUCCESS)
}

/// Run the metadata command.
pub fn run_metadata(
    pipeline: &Pipeline,
    args: &PathArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<i32> {
    let scan = pipeline.scan(&args.path)?;
    let metadata = pipeline.metadata(&args.path, &scan)?;
    match format {
        OutputFormat::Json => report::write_json(out, &metadata)?,
        OutputFormat::Pretty => report::write_metadata(out, &scan.repo, &metadata)?,
    }
    Ok(EXIT_SUCCESS)
}

/// Run the analyze command.
pub fn run_analyze(
    pipeline: &Pipeline,
    args: &PathArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<i32> {
    let analysis = with_spinner(format, "Analyzing repository", || {
        pipeline.analyze(&args.path)
    })?;
    match format {
        OutputFormat::Json => report::write_json(out, &analysis)?,
        OutputFormat::Pretty => report::write_analysis(out, &analysis)?,
    }
    Ok(EXIT_SUCCESS)
}

/// Run the languages command.
pub fn run_languages(
    config: &Config,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<i32> {
    let registry = config.registry();
    match format {
        OutputFormat::Json => report::write_json(out, &report::language_rows(&registry))?,
        OutputFormat::Pretty => report::write_languages(out, &registry)?,
    }
    Ok(EXIT_SUCCESS)
}

/// Show a spinner on an interactive stderr while `f` runs.
fn with_spinner<T>(format: OutputFormat, message: &str, f: impl FnOnce() -> T) -> T {
    if format != OutputFormat::Pretty || !io::stderr().is_terminal() {
        return f();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = f();
    spinner.finish_and_clear();
    result
}
