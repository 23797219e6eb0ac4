//! JavaScript structural grammar (JSX included).

use crate::ast::treesitter::{DefinitionRule, Grammar, TreeSitterBackend};
use crate::ast::NodeType;

static DEFINITIONS: &[DefinitionRule] = &[
    DefinitionRule {
        kind: "class_declaration",
        node_type: NodeType::Class,
    },
    DefinitionRule {
        kind: "function_declaration",
        node_type: NodeType::Function,
    },
    DefinitionRule {
        kind: "generator_function_declaration",
        node_type: NodeType::Function,
    },
    DefinitionRule {
        kind: "method_definition",
        node_type: NodeType::Function,
    },
];

static TRANSPARENT: &[&str] = &["export_statement"];

/// Create a new JavaScript backend.
pub fn new_backend() -> TreeSitterBackend {
    TreeSitterBackend::new(Grammar {
        language: tree_sitter_javascript::LANGUAGE.into(),
        language_name: "javascript",
        extensions: &["js", "jsx", "mjs", "cjs"],
        definitions: DEFINITIONS,
        transparent: TRANSPARENT,
        namespaces: &[],
        rejected: &[],
        body_field: "body",
        dialects: Vec::new(),
    })
}
