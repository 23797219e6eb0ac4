//! Output formatting for analysis results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: the serialized result, pretty-printed, for programmatic consumption

use colored::*;
use serde::Serialize;
use std::io::{self, Write};

use crate::ast::{AstNode, AstResult, NodeType};
use crate::metadata::{RepoMetadata, RepoType};
use crate::pipeline::RepoAnalysis;
use crate::registry::{LanguageRegistry, SupportStatus};
use crate::scanner::ScanResult;
use crate::summary::Summary;

// =============================================================================
// JSON Format
// =============================================================================

/// Serialize any result as pretty JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write any result as pretty JSON followed by a newline.
pub fn write_json<T: Serialize + ?Sized>(w: &mut impl Write, value: &T) -> anyhow::Result<()> {
    writeln!(w, "{}", to_json(value)?)?;
    Ok(())
}

/// Registry table row as serialized by `languages --format json`.
#[derive(Serialize)]
pub struct LanguageRow<'a> {
    pub language: &'a str,
    #[serde(flatten)]
    pub capabilities: &'a crate::registry::LanguageCapabilities,
}

/// Registry entries in name order.
pub fn language_rows(registry: &LanguageRegistry) -> Vec<LanguageRow<'_>> {
    registry
        .entries()
        .map(|(language, capabilities)| LanguageRow {
            language,
            capabilities,
        })
        .collect()
}

// =============================================================================
// Pretty Format
// =============================================================================

fn write_header(w: &mut impl Write, title: &str, repo: &str) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "  {} {}", "codenarrator".cyan().bold(), title.bold())?;
    writeln!(w, "  {}{}", "Repository: ".dimmed(), repo)?;
    writeln!(w)
}

/// Write a scan result.
pub fn write_scan(w: &mut impl Write, scan: &ScanResult) -> io::Result<()> {
    write_header(w, "scan", &scan.repo)?;
    writeln!(w, "  {} {}", "Files:".bold(), scan.file_count)?;

    let counts = scan.language_counts();
    if counts.is_empty() {
        writeln!(w, "    {}", "(no recognised source files)".dimmed())?;
    }
    for (language, count) in &counts {
        writeln!(w, "    {:<14} {:>6}", language.blue(), count)?;
    }
    writeln!(w)
}

/// Write an extraction result as one indented outline per file.
pub fn write_ast(w: &mut impl Write, result: &AstResult) -> io::Result<()> {
    write_header(w, &format!("ast ({})", result.language), &result.repo)?;

    for file in &result.files {
        write!(w, "  {}", file.file_path.blue())?;
        if file.root.is_empty_module() {
            write!(w, "  {}", "(no definitions)".dimmed())?;
        }
        writeln!(w)?;

        // Children pushed in reverse so they pop in source order
        let mut stack: Vec<(&AstNode, usize)> =
            file.root.children.iter().rev().map(|n| (n, 1)).collect();
        while let Some((node, depth)) = stack.pop() {
            write_node(w, node, depth)?;
            stack.extend(node.children.iter().rev().map(|n| (n, depth + 1)));
        }
    }
    writeln!(w)
}

fn write_node(w: &mut impl Write, node: &AstNode, depth: usize) -> io::Result<()> {
    let indent = "  ".repeat(depth + 1);
    let kind = match node.node_type {
        NodeType::Class => "class".magenta(),
        NodeType::Function => "fn".green(),
        NodeType::AsyncFunction => "async fn".green(),
        NodeType::Module => "module".normal(),
    };
    let name = node.name.as_deref().unwrap_or("<anonymous>");
    writeln!(
        w,
        "{}{} {} {}",
        indent,
        kind,
        name,
        format!("{}-{}", node.start_line, node.end_line).dimmed()
    )
}

/// Write a summary.
pub fn write_summary(w: &mut impl Write, summary: &Summary) -> io::Result<()> {
    write_header(w, &format!("summary ({})", summary.language), &summary.repo)?;
    write_summary_body(w, summary)?;
    writeln!(w)
}

fn write_summary_body(w: &mut impl Write, summary: &Summary) -> io::Result<()> {
    writeln!(w, "    {:<20} {}", "Files analyzed", summary.files_analyzed)?;
    writeln!(w, "    {:<20} {}", "Classes", summary.total_classes)?;
    writeln!(w, "    {:<20} {}", "Functions", summary.total_functions)?;
    writeln!(w, "    {:<20} {}", "Max nesting depth", summary.max_nesting_depth)?;

    if summary.most_complex_files.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "  {}", "Most complex files:".bold())?;
    for f in &summary.most_complex_files {
        writeln!(
            w,
            "    {:<40} {}",
            f.file_path.blue(),
            format!(
                "{} classes, {} functions, depth {}",
                f.classes, f.functions, f.max_depth
            )
            .dimmed()
        )?;
    }
    Ok(())
}

/// Write repository metadata.
pub fn write_metadata(w: &mut impl Write, repo: &str, metadata: &RepoMetadata) -> io::Result<()> {
    write_header(w, "metadata", repo)?;
    write_metadata_body(w, metadata)?;
    writeln!(w)
}

fn write_metadata_body(w: &mut impl Write, metadata: &RepoMetadata) -> io::Result<()> {
    writeln!(w, "  {} {}", "Type:".bold(), colored_repo_type(metadata.repo_type))?;

    let dirs = if metadata.top_level_dirs.is_empty() {
        "-".to_string()
    } else {
        metadata.top_level_dirs.join(", ")
    };
    writeln!(w, "  {} {}", "Top-level dirs:".bold(), dirs)?;

    writeln!(w, "  {} ({}):", "Entry points".bold(), metadata.entry_points.len())?;
    for entry in &metadata.entry_points {
        writeln!(w, "    {}", entry.blue())?;
    }

    writeln!(w, "  {}", "Languages:".bold())?;
    for (language, count) in &metadata.language_breakdown {
        writeln!(w, "    {:<14} {:>6}", language, count)?;
    }
    Ok(())
}

fn colored_repo_type(repo_type: RepoType) -> ColoredString {
    match repo_type {
        RepoType::Library => "library".green(),
        RepoType::Service => "service".cyan(),
        RepoType::Frontend => "frontend".magenta(),
        RepoType::Mixed => "mixed".yellow(),
        RepoType::Unknown => "unknown".dimmed(),
    }
}

/// Write a full analysis.
pub fn write_analysis(w: &mut impl Write, analysis: &RepoAnalysis) -> io::Result<()> {
    write_header(w, "analyze", &analysis.scan.repo)?;
    writeln!(w, "  {} {}", "Files:".bold(), analysis.scan.file_count)?;
    write_metadata_body(w, &analysis.metadata)?;

    for summary in &analysis.summaries {
        writeln!(w)?;
        writeln!(w, "  {}", summary.language.cyan().bold())?;
        write_summary_body(w, summary)?;
    }

    if !analysis.unsupported_languages.is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "  {} {}",
            "No AST support:".dimmed(),
            analysis.unsupported_languages.join(", ")
        )?;
    }
    writeln!(w)
}

/// Write the capability registry as a table.
pub fn write_languages(w: &mut impl Write, registry: &LanguageRegistry) -> io::Result<()> {
    writeln!(w)?;
    writeln!(
        w,
        "  {:<12} {:<5} {:<12} {:<8} {:<8} {}",
        "LANGUAGE".bold(),
        "AST".bold(),
        "BACKEND".bold(),
        "IMPORTS".bold(),
        "ENTRY".bold(),
        "STATUS".bold()
    )?;

    for (language, caps) in registry.entries() {
        let status = match caps.status {
            SupportStatus::Stable => "stable".green(),
            SupportStatus::Experimental => "experimental".yellow(),
            SupportStatus::Unknown => "unknown".dimmed(),
        };
        writeln!(
            w,
            "  {:<12} {:<5} {:<12} {:<8} {:<8} {}",
            language,
            yes_no(caps.has_ast),
            caps.parser_backend.as_str(),
            yes_no(caps.supports_import_graph),
            yes_no(caps.supports_entry_points),
            status
        )?;
    }
    writeln!(w)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
