//! Tests for the JSON wire format.
//!
//! Field names and enum spellings here are consumed by downstream tools and
//! must stay stable.

use std::path::PathBuf;

use codenarrator::report;
use codenarrator::{
    AstFile, AstNode, AstResult, LanguageRegistry, NodeType, Pipeline, RepoType,
};
use serde_json::{json, Value};

fn sample_repo() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("sample_repo")
}

fn to_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::from_str(&report::to_json(value).unwrap()).unwrap()
}

#[test]
fn test_ast_result_shape() {
    let method = AstNode::definition(NodeType::AsyncFunction, Some("run".into()), 2, 4, vec![]);
    let class = AstNode::definition(NodeType::Class, Some("Job".into()), 1, 4, vec![method]);
    let result = AstResult {
        repo: "demo".into(),
        language: "python".into(),
        files: vec![AstFile {
            file_path: "jobs/job.py".into(),
            language: "python".into(),
            root: AstNode::module(vec![class]),
        }],
    };

    assert_eq!(
        to_value(&result),
        json!({
            "repo": "demo",
            "language": "python",
            "files": [{
                "file_path": "jobs/job.py",
                "language": "python",
                "root": {
                    "node_type": "module",
                    "name": null,
                    "start_line": 1,
                    "end_line": 4,
                    "children": [{
                        "node_type": "class",
                        "name": "Job",
                        "start_line": 1,
                        "end_line": 4,
                        "children": [{
                            "node_type": "async_function",
                            "name": "run",
                            "start_line": 2,
                            "end_line": 4,
                            "children": []
                        }]
                    }]
                }
            }]
        })
    );
}

#[test]
fn test_scan_result_shape() {
    let scan = Pipeline::default().scan(&sample_repo()).unwrap();
    let value = to_value(&scan);

    assert_eq!(value["repo"], "sample_repo");
    assert_eq!(value["file_count"], 7);
    assert_eq!(value["languages"][0], "go");
    assert_eq!(value["files"][0], "backend/app.py");
    assert_eq!(value["file_languages"]["lib/Main.java"], "java");
}

#[test]
fn test_metadata_shape() {
    let pipeline = Pipeline::default();
    let root = sample_repo();
    let scan = pipeline.scan(&root).unwrap();
    let value = to_value(&pipeline.metadata(&root, &scan).unwrap());

    assert_eq!(value["repo_type"], "mixed");
    assert_eq!(value["top_level_dirs"], json!(["backend", "docs", "frontend"]));
    assert_eq!(value["language_breakdown"]["go"], 1);
    assert!(value["entry_points"].is_array());
}

#[test]
fn test_repo_type_spellings() {
    let spellings: Vec<Value> = [
        RepoType::Library,
        RepoType::Service,
        RepoType::Frontend,
        RepoType::Mixed,
        RepoType::Unknown,
    ]
    .iter()
    .map(to_value)
    .collect();
    assert_eq!(
        spellings,
        vec![
            json!("library"),
            json!("service"),
            json!("frontend"),
            json!("mixed"),
            json!("unknown")
        ]
    );
}

#[test]
fn test_summary_shape() {
    let result = AstResult {
        repo: "demo".into(),
        language: "java".into(),
        files: vec![AstFile {
            file_path: "A.java".into(),
            language: "java".into(),
            root: AstNode::empty_module(),
        }],
    };
    let value = to_value(&codenarrator::summarize(&result));

    assert_eq!(
        value,
        json!({
            "repo": "demo",
            "language": "java",
            "files_analyzed": 1,
            "total_classes": 0,
            "total_functions": 0,
            "max_nesting_depth": 1,
            "most_complex_files": [{
                "file_path": "A.java",
                "classes": 0,
                "functions": 0,
                "max_depth": 1
            }]
        })
    );
}

#[test]
fn test_languages_table_shape() {
    let registry = LanguageRegistry::builtin();
    let value = to_value(&report::language_rows(&registry));
    let rows = value.as_array().unwrap();

    let names: Vec<&str> = rows.iter().map(|r| r["language"].as_str().unwrap()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);

    let java = rows.iter().find(|r| r["language"] == "java").unwrap();
    assert_eq!(
        java,
        &json!({
            "language": "java",
            "has_ast": true,
            "parser_backend": "tree_sitter",
            "supports_import_graph": true,
            "supports_entry_points": true,
            "status": "experimental"
        })
    );

    let rust = rows.iter().find(|r| r["language"] == "rust").unwrap();
    assert_eq!(rust["parser_backend"], "none");
    assert_eq!(rust["status"], "unknown");
}
