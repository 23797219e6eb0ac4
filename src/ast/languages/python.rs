//! Python structural grammar.

use crate::ast::treesitter::{DefinitionRule, Grammar, RejectRule, TreeSitterBackend};
use crate::ast::NodeType;

/// Definition kinds. `async def` is a `function_definition` with an `async` token.
static DEFINITIONS: &[DefinitionRule] = &[
    DefinitionRule {
        kind: "class_definition",
        node_type: NodeType::Class,
    },
    DefinitionRule {
        kind: "function_definition",
        node_type: NodeType::Function,
    },
];

/// Decorators wrap the definition; the span is the definition's own.
static TRANSPARENT: &[&str] = &["decorated_definition"];

/// Python 2 syntax still in the grammar. Python 3 refuses to compile it.
static REJECTED: &[RejectRule] = &[
    RejectRule::kind("print_statement"),
    RejectRule::kind("exec_statement"),
    RejectRule::kind("<>"),
    // `except E, e:`
    RejectRule::kind(",").within("except_clause"),
    // Backtick repr is lexed as a string
    RejectRule::kind("string_start").with_text("`"),
];

/// Create a new Python backend.
pub fn new_backend() -> TreeSitterBackend {
    TreeSitterBackend::new(Grammar {
        language: tree_sitter_python::LANGUAGE.into(),
        language_name: "python",
        extensions: &["py", "pyi"],
        definitions: DEFINITIONS,
        transparent: TRANSPARENT,
        namespaces: &[],
        rejected: REJECTED,
        body_field: "body",
        dialects: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstNode, LanguageBackend};
    use std::path::Path;

    fn parse(source: &str) -> Option<AstNode> {
        new_backend().parse_file(Path::new("test.py"), source)
    }

    #[test]
    fn test_module_level_definitions_in_order() {
        let source = r#"
import os

def first():
    pass

X = 1

class Second:
    pass

async def third():
    await first()
"#;
        let root = parse(source).unwrap();
        let names: Vec<_> = root
            .children
            .iter()
            .map(|c| (c.name.as_deref().unwrap(), c.node_type))
            .collect();
        assert_eq!(
            names,
            vec![
                ("first", NodeType::Function),
                ("Second", NodeType::Class),
                ("third", NodeType::AsyncFunction),
            ]
        );
        assert_eq!(root.start_line, 1);
        assert_eq!(root.end_line, 13);
    }

    #[test]
    fn test_deep_nesting() {
        let source = r#"
def outer():
    class Inner:
        def method(self):
            def closure():
                return 1
            return closure
    return Inner
"#;
        let root = parse(source).unwrap();
        let outer = &root.children[0];
        let inner = &outer.children[0];
        let method = &inner.children[0];
        let closure = &method.children[0];

        assert_eq!(outer.node_type, NodeType::Function);
        assert_eq!(inner.node_type, NodeType::Class);
        assert_eq!(method.name.as_deref(), Some("method"));
        assert_eq!(closure.name.as_deref(), Some("closure"));
        assert_eq!((closure.start_line, closure.end_line), (5, 6));
        assert!(outer.end_line >= inner.end_line);
        assert!(inner.end_line >= method.end_line);
    }

    #[test]
    fn test_statements_are_omitted() {
        let source = r#"
x = [i for i in range(3)]
if x:
    print(x)
for i in x:
    pass
"#;
        let root = parse(source).unwrap();
        assert!(root.children.is_empty());
        assert_eq!((root.start_line, root.end_line), (1, 1));
    }

    #[test]
    fn test_decorated_method() {
        let source = r#"
class Service:
    @property
    def name(self):
        return "svc"

    @staticmethod
    async def start():
        pass
"#;
        let root = parse(source).unwrap();
        let class = &root.children[0];
        assert_eq!(class.children.len(), 2);
        assert_eq!(class.children[0].start_line, 4);
        assert_eq!(class.children[1].node_type, NodeType::AsyncFunction);
    }

    #[test]
    fn test_syntax_error() {
        assert!(parse("class Broken(\n    def x\n").is_none());
    }

    #[test]
    fn test_python2_syntax_is_unparsable() {
        let sources = [
            "def f():\n    print x\n",
            "print >>sys.stderr, 'oops'\n",
            "exec \"code\"\n",
            "y = `x`\n",
            "if a <> b:\n    pass\n",
            "try:\n    pass\nexcept ValueError, e:\n    pass\n",
        ];
        for source in sources {
            assert!(parse(source).is_none(), "accepted: {:?}", source);
        }
    }

    #[test]
    fn test_python3_lookalikes_parse() {
        let source = r#"
def f(code, a, b):
    print("x", file=sys.stderr)
    exec(code)
    if a != b:
        pass
    try:
        pass
    except (ValueError, KeyError) as e:
        pass
    return 'y', "z"
"#;
        let root = parse(source).unwrap();
        assert_eq!(root.children[0].name.as_deref(), Some("f"));
    }

    #[test]
    fn test_trailing_comment_not_in_span() {
        let source = r#"
def f():
    return 1
    # trailing

class A:
    x = 1
    # trailing
"#;
        let root = parse(source).unwrap();
        assert_eq!((root.children[0].start_line, root.children[0].end_line), (2, 3));
        assert_eq!((root.children[1].start_line, root.children[1].end_line), (6, 7));
        assert_eq!(root.end_line, 7);
    }
}
