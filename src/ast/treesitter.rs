//! Tree-sitter based structural backend.
//!
//! One generic backend serves every tree-sitter language. A [`Grammar`]
//! tells it which node kinds are definitions, which node kinds merely wrap
//! definitions (decorators, `export`), and which field holds a definition's
//! body. Everything else in the tree is ignored.
//!
//! Grammars are sometimes more permissive than the language they model
//! (tree-sitter-python still accepts Python 2 statements). A grammar lists
//! such constructs as [`RejectRule`]s and a file containing one is treated
//! like a file with a syntax error.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};
use tree_sitter::{Language, Node, Parser as TsParser, Point, Tree};

use super::{AstNode, LanguageBackend, NodeType};

/// Maps a tree-sitter node kind to a structural node type.
#[derive(Debug, Clone, Copy)]
pub struct DefinitionRule {
    /// Tree-sitter node kind (e.g., "class_definition")
    pub kind: &'static str,
    /// `Function` rules become `AsyncFunction` when the node has an `async` token.
    pub node_type: NodeType,
}

/// A node the grammar parses but the language itself rejects.
#[derive(Debug, Clone, Copy)]
pub struct RejectRule {
    /// Node kind, named or anonymous (e.g., "print_statement", "<>")
    pub kind: &'static str,
    /// Only match when the parent has this kind
    pub parent: Option<&'static str>,
    /// Only match when the node's source text is exactly this
    pub text: Option<&'static str>,
}

impl RejectRule {
    /// Reject every node of `kind`.
    pub const fn kind(kind: &'static str) -> Self {
        Self {
            kind,
            parent: None,
            text: None,
        }
    }

    /// Restrict the rule to nodes whose parent is `parent`.
    pub const fn within(mut self, parent: &'static str) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Restrict the rule to nodes whose source text is `text`.
    pub const fn with_text(mut self, text: &'static str) -> Self {
        self.text = Some(text);
        self
    }

    fn matches(&self, node: Node, source: &[u8]) -> bool {
        if node.kind() != self.kind {
            return false;
        }
        if let Some(parent) = self.parent {
            if node.parent().map(|p| p.kind()) != Some(parent) {
                return false;
            }
        }
        match self.text {
            Some(text) => node.utf8_text(source).ok() == Some(text),
            None => true,
        }
    }
}

/// Configuration for a tree-sitter language backend.
#[derive(Clone)]
pub struct Grammar {
    /// The tree-sitter language
    pub language: Language,
    /// Language name (e.g., "python")
    pub language_name: &'static str,
    /// File extensions handled (without dot)
    pub extensions: &'static [&'static str],
    /// Node kinds that produce structural nodes
    pub definitions: &'static [DefinitionRule],
    /// Node kinds whose children are inspected as if they were siblings
    pub transparent: &'static [&'static str],
    /// Node kinds whose body definitions are hoisted into the enclosing level
    /// (e.g., TypeScript namespaces)
    pub namespaces: &'static [&'static str],
    /// Constructs that make a file unparsable even though the grammar accepts them
    pub rejected: &'static [RejectRule],
    /// Field holding a definition's body
    pub body_field: &'static str,
    /// Alternate grammars keyed by file extension (e.g., TSX)
    pub dialects: Vec<(&'static str, Language)>,
}

/// Tree-sitter based backend.
pub struct TreeSitterBackend {
    grammar: Grammar,
    timeout: Option<Duration>,
}

impl TreeSitterBackend {
    /// Create a new backend with the given grammar and no parse timeout.
    pub fn new(grammar: Grammar) -> Self {
        Self {
            grammar,
            timeout: None,
        }
    }

    /// Bound the wall time of a single parse. A timed-out parse is unparsable.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    fn language_for(&self, path: &Path) -> &Language {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        if let Some(ext) = ext {
            if let Some((_, language)) = self.grammar.dialects.iter().find(|(d, _)| *d == ext) {
                return language;
            }
        }
        &self.grammar.language
    }

    /// Parse source code and return the tree, or `None` if it has syntax errors.
    fn parse_tree(&self, path: &Path, source: &str) -> Option<Tree> {
        let mut parser = TsParser::new();
        if let Err(e) = parser.set_language(self.language_for(path)) {
            warn!(
                "cannot load {} grammar for {}: {}",
                self.grammar.language_name,
                path.display(),
                e
            );
            return None;
        }
        if let Some(timeout) = self.timeout {
            parser.set_timeout_micros(timeout.as_micros().min(u64::MAX as u128) as u64);
        }

        let Some(tree) = parser.parse(source, None) else {
            debug!("parse timed out: {}", path.display());
            return None;
        };
        if tree.root_node().has_error() {
            debug!("syntax errors in {}", path.display());
            return None;
        }
        if let Some(node) = self.find_rejected(&tree, source.as_bytes()) {
            debug!(
                "unsupported {} syntax `{}` at {}:{}",
                self.grammar.language_name,
                node.kind(),
                path.display(),
                start_line(node)
            );
            return None;
        }
        Some(tree)
    }

    /// First node, named or anonymous, matching one of the grammar's reject rules.
    fn find_rejected<'t>(&self, tree: &'t Tree, source: &[u8]) -> Option<Node<'t>> {
        if self.grammar.rejected.is_empty() {
            return None;
        }

        // Pre-order walk with a cursor; no recursion on deep trees
        let mut cursor = tree.walk();
        loop {
            let node = cursor.node();
            if self.grammar.rejected.iter().any(|r| r.matches(node, source)) {
                return Some(node);
            }
            if cursor.goto_first_child() {
                continue;
            }
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    return None;
                }
            }
        }
    }

    fn rule_for(&self, kind: &str) -> Option<&DefinitionRule> {
        self.grammar.definitions.iter().find(|r| r.kind == kind)
    }

    /// Collect definitions among the direct children of `container`, in source order.
    fn collect_definitions(&self, container: Node, source: &[u8]) -> Vec<AstNode> {
        let mut definitions = Vec::new();
        let mut cursor = container.walk();

        for child in container.named_children(&mut cursor) {
            if let Some(rule) = self.rule_for(child.kind()) {
                definitions.push(self.convert(child, rule, source));
            } else if self.grammar.transparent.contains(&child.kind()) {
                definitions.extend(self.collect_definitions(child, source));
            } else if self.grammar.namespaces.contains(&child.kind()) {
                if let Some(body) = child.child_by_field_name(self.grammar.body_field) {
                    definitions.extend(self.collect_definitions(body, source));
                }
            }
        }

        definitions
    }

    fn convert(&self, node: Node, rule: &DefinitionRule, source: &[u8]) -> AstNode {
        let node_type = if rule.node_type == NodeType::Function && has_async_keyword(node) {
            NodeType::AsyncFunction
        } else {
            rule.node_type
        };

        let name = node
            .child_by_field_name("name")
            .and_then(|n| n.utf8_text(source).ok())
            .map(str::to_string);

        let children = node
            .child_by_field_name(self.grammar.body_field)
            .map(|body| self.collect_definitions(body, source))
            .unwrap_or_default();

        AstNode::definition(node_type, name, start_line(node), end_line(node), children)
    }
}

impl LanguageBackend for TreeSitterBackend {
    fn language_id(&self) -> &'static str {
        self.grammar.language_name
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        self.grammar.extensions
    }

    fn parse_file(&self, path: &Path, source: &str) -> Option<AstNode> {
        let tree = self.parse_tree(path, source)?;
        let children = self.collect_definitions(tree.root_node(), source.as_bytes());
        Some(AstNode::module(children))
    }
}

fn has_async_keyword(node: Node) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|c| !c.is_named() && c.kind() == "async");
    found
}

fn start_line(node: Node) -> usize {
    node.start_position().row + 1 // tree-sitter is 0-indexed
}

/// Last line holding code of the node. Trailing comments do not count.
fn end_line(node: Node) -> usize {
    let end = content_end(node);
    // A node ending at column 0 stops at the end of the previous line
    if end.column == 0 && end.row > node.start_position().row {
        end.row
    } else {
        end.row + 1
    }
}

/// End of the last descendant that is not an extra (comments, line continuations).
///
/// Grammars attach comments after the last statement to the enclosing
/// block, so the node's own end position would include them.
fn content_end(node: Node) -> Point {
    let mut last = node;
    loop {
        let next = {
            let mut cursor = last.walk();
            let found = last.children(&mut cursor).filter(|c| !c.is_extra()).last();
            found
        };
        match next {
            Some(child) => last = child,
            None => return last.end_position(),
        }
    }
}
