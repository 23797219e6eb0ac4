//! TypeScript structural grammar.
//!
//! `.tsx` files are parsed with the TSX dialect.

use crate::ast::treesitter::{DefinitionRule, Grammar, TreeSitterBackend};
use crate::ast::NodeType;

static DEFINITIONS: &[DefinitionRule] = &[
    DefinitionRule {
        kind: "class_declaration",
        node_type: NodeType::Class,
    },
    DefinitionRule {
        kind: "abstract_class_declaration",
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

/// `declare` wraps a declaration. A top-level `namespace` may parse as an
/// expression statement.
static TRANSPARENT: &[&str] = &[
    "export_statement",
    "ambient_declaration",
    "expression_statement",
];

/// `namespace X {}` and `module X {}`; their definitions are reported at the enclosing level.
static NAMESPACES: &[&str] = &["internal_module", "module"];

/// Create a new TypeScript backend.
pub fn new_backend() -> TreeSitterBackend {
    TreeSitterBackend::new(Grammar {
        language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        language_name: "typescript",
        extensions: &["ts", "tsx", "mts", "cts"],
        definitions: DEFINITIONS,
        transparent: TRANSPARENT,
        namespaces: NAMESPACES,
        rejected: &[],
        body_field: "body",
        dialects: vec![("tsx", tree_sitter_typescript::LANGUAGE_TSX.into())],
    })
}
