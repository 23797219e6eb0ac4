//! Language-agnostic structural AST types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of structural node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Module,
    Class,
    Function,
    AsyncFunction,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Module => "module",
            NodeType::Class => "class",
            NodeType::Function => "function",
            NodeType::AsyncFunction => "async_function",
        }
    }

    /// Functions and async functions.
    pub fn is_callable(&self) -> bool {
        matches!(self, NodeType::Function | NodeType::AsyncFunction)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A definition-like construct and the definitions nested inside it.
///
/// Lines are 1-indexed. A parent's `end_line` always covers the `end_line`
/// of each of its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstNode {
    pub node_type: NodeType,
    /// Declared name; `None` for modules and anonymous definitions.
    pub name: Option<String>,
    pub start_line: usize,
    pub end_line: usize,
    /// Nested definitions in source order.
    pub children: Vec<AstNode>,
}

impl AstNode {
    /// A module root spanning its children.
    pub fn module(children: Vec<AstNode>) -> Self {
        let end_line = children_end_line(&children);
        Self {
            node_type: NodeType::Module,
            name: None,
            start_line: 1,
            end_line,
            children,
        }
    }

    /// The module node used for files that could not be read or parsed.
    pub fn empty_module() -> Self {
        Self::module(Vec::new())
    }

    /// A definition node. `end_line` is widened to cover the children.
    pub fn definition(
        node_type: NodeType,
        name: Option<String>,
        start_line: usize,
        end_line: usize,
        children: Vec<AstNode>,
    ) -> Self {
        let start_line = start_line.max(1);
        let end_line = end_line.max(start_line).max(children_end_line(&children));
        Self {
            node_type,
            name,
            start_line,
            end_line,
            children,
        }
    }

    /// Whether this is a module with no extracted definitions.
    pub fn is_empty_module(&self) -> bool {
        self.node_type == NodeType::Module && self.children.is_empty()
    }
}

impl Drop for AstNode {
    // Flatten the subtree before it drops so nesting depth never reaches the call stack
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Largest `end_line` among `children`, or 1 when there are none.
pub fn children_end_line(children: &[AstNode]) -> usize {
    children.iter().map(|c| c.end_line).max().unwrap_or(1)
}

/// Structural AST for a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstFile {
    pub file_path: String,
    pub language: String,
    /// Always a module node.
    pub root: AstNode,
}

/// Extraction result for one language of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstResult {
    pub repo: String,
    pub language: String,
    /// One entry per requested file, in request order.
    pub files: Vec<AstFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_module_span() {
        let root = AstNode::empty_module();
        assert_eq!(root.node_type, NodeType::Module);
        assert_eq!((root.start_line, root.end_line), (1, 1));
        assert!(root.is_empty_module());
        assert!(root.name.is_none());
    }

    #[test]
    fn test_definition_widens_to_children() {
        let method = AstNode::definition(NodeType::Function, Some("m".into()), 3, 9, vec![]);
        let class = AstNode::definition(NodeType::Class, Some("A".into()), 2, 4, vec![method]);
        assert_eq!(class.end_line, 9);

        let module = AstNode::module(vec![class]);
        assert_eq!(module.end_line, 9);
    }

    #[test]
    fn test_definition_end_never_before_start() {
        let node = AstNode::definition(NodeType::Function, Some("f".into()), 7, 0, vec![]);
        assert_eq!((node.start_line, node.end_line), (7, 7));
    }

    #[test]
    fn test_deep_tree_drops() {
        let mut node = AstNode::definition(NodeType::Function, Some("leaf".into()), 1, 1, vec![]);
        for _ in 0..200_000 {
            node = AstNode::definition(NodeType::Class, None, 1, 1, vec![node]);
        }
        let root = AstNode::module(vec![node]);
        assert_eq!(root.children.len(), 1);
        drop(root);
    }

    #[test]
    fn test_clone_of_nested_tree_is_independent() {
        let inner = AstNode::definition(NodeType::Function, Some("m".into()), 2, 3, vec![]);
        let class = AstNode::definition(NodeType::Class, Some("A".into()), 1, 3, vec![inner]);
        let copy = class.clone();
        drop(class);
        assert_eq!(copy.children[0].name.as_deref(), Some("m"));
    }

    #[test]
    fn test_node_type_wire_names() {
        assert_eq!(
            serde_json::to_value(NodeType::AsyncFunction).unwrap(),
            "async_function"
        );
        assert_eq!(serde_json::to_value(NodeType::Module).unwrap(), "module");

        let json = serde_json::to_value(AstNode::empty_module()).unwrap();
        assert!(json["name"].is_null());
        assert_eq!(json["children"].as_array().unwrap().len(), 0);
    }
}
