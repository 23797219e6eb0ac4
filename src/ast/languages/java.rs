//! Java structural grammar.
//!
//! Interfaces, enums and records are reported as classes; constructors as
//! functions.

use crate::ast::treesitter::{DefinitionRule, Grammar, TreeSitterBackend};
use crate::ast::NodeType;

static DEFINITIONS: &[DefinitionRule] = &[
    DefinitionRule {
        kind: "class_declaration",
        node_type: NodeType::Class,
    },
    DefinitionRule {
        kind: "interface_declaration",
        node_type: NodeType::Class,
    },
    DefinitionRule {
        kind: "enum_declaration",
        node_type: NodeType::Class,
    },
    DefinitionRule {
        kind: "record_declaration",
        node_type: NodeType::Class,
    },
    DefinitionRule {
        kind: "method_declaration",
        node_type: NodeType::Function,
    },
    DefinitionRule {
        kind: "constructor_declaration",
        node_type: NodeType::Function,
    },
];

/// Enum methods sit one level below the enum body.
static TRANSPARENT: &[&str] = &["enum_body_declarations"];

/// Create a new Java backend.
pub fn new_backend() -> TreeSitterBackend {
    TreeSitterBackend::new(Grammar {
        language: tree_sitter_java::LANGUAGE.into(),
        language_name: "java",
        extensions: &["java"],
        definitions: DEFINITIONS,
        transparent: TRANSPARENT,
        namespaces: &[],
        rejected: &[],
        body_field: "body",
        dialects: Vec::new(),
    })
}
