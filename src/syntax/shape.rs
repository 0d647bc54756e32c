//! Closed set of node shapes the analyzers care about.
//!
//! Tree-sitter exposes node kinds as strings. [`NodeShape::of`] maps each
//! node to one variant of a closed enum once, so consumers dispatch with an
//! exhaustive `match` instead of re-testing kind strings.

use tree_sitter::Node;

use super::parse::ParsedSource;

/// Statement kinds that count as a branch or loop inside a function body.
const BRANCH_KINDS: &[&str] = &[
    "if_statement",
    "for_statement",
    "for_in_statement",
    "while_statement",
    "do_statement",
    "switch_statement",
];

/// What the walker should do after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Continue,
    SkipChildren,
}

/// A member/call chain such as `supabase.from('x').select()`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallShape<'a> {
    /// Left-most identifier of the chain (`supabase`), or the callee of a
    /// plain call (`fetch`).
    pub root: Option<&'a str>,
    /// The method invoked by this call (`select`), if it is a member call.
    pub method: Option<&'a str>,
    /// Every property name along the chain, outermost last.
    pub chain: Vec<&'a str>,
}

impl<'a> CallShape<'a> {
    /// The name that is actually invoked: the method, or the root for plain calls.
    pub fn callee(&self) -> Option<&'a str> {
        self.method.or(self.root)
    }
}

/// Syntactic role of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeShape<'a> {
    /// JSX element, self-closing element or fragment.
    Markup { tag: Option<&'a str> },
    /// A function or method call.
    Call(CallShape<'a>),
    /// A function, arrow function or method with the number of branch/loop
    /// statements in its body.
    Function {
        name: Option<&'a str>,
        branches: usize,
    },
    /// Object key, class field or JSX attribute name.
    Property { name: &'a str },
    /// Variable declarator with a plain identifier name.
    Binding { name: &'a str },
    /// `import ... from 'source'`.
    Import { source: &'a str },
    Other,
}

impl<'a> NodeShape<'a> {
    /// Classifies a node.
    pub fn of(node: Node<'_>, parsed: &ParsedSource<'a>) -> Self {
        match node.kind() {
            "jsx_element" => {
                let tag = node
                    .child_by_field_name("open_tag")
                    .or_else(|| node.named_child(0))
                    .and_then(|open| open.child_by_field_name("name"))
                    .map(|n| parsed.node_text(&n));
                NodeShape::Markup { tag }
            }
            "jsx_self_closing_element" => NodeShape::Markup {
                tag: node
                    .child_by_field_name("name")
                    .map(|n| parsed.node_text(&n)),
            },
            "jsx_fragment" => NodeShape::Markup { tag: None },
            "call_expression" => match node.child_by_field_name("function") {
                Some(callee) => NodeShape::Call(call_shape(callee, parsed)),
                None => NodeShape::Other,
            },
            "function_declaration"
            | "generator_function_declaration"
            | "function_expression"
            | "function"
            | "generator_function"
            | "arrow_function"
            | "method_definition" => NodeShape::Function {
                name: node
                    .child_by_field_name("name")
                    .map(|n| parsed.node_text(&n)),
                branches: node
                    .child_by_field_name("body")
                    .map(count_branches)
                    .unwrap_or(0),
            },
            "pair" => match node.child_by_field_name("key") {
                Some(key) if key.kind() == "property_identifier" => NodeShape::Property {
                    name: parsed.node_text(&key),
                },
                _ => NodeShape::Other,
            },
            "jsx_attribute" => match node.named_child(0) {
                Some(name) if name.kind() == "property_identifier" => NodeShape::Property {
                    name: parsed.node_text(&name),
                },
                _ => NodeShape::Other,
            },
            "public_field_definition" | "field_definition" => {
                match node
                    .child_by_field_name("name")
                    .or_else(|| node.child_by_field_name("property"))
                {
                    Some(name) => NodeShape::Property {
                        name: parsed.node_text(&name),
                    },
                    None => NodeShape::Other,
                }
            }
            "variable_declarator" => match node.child_by_field_name("name") {
                Some(name) if name.kind() == "identifier" => NodeShape::Binding {
                    name: parsed.node_text(&name),
                },
                _ => NodeShape::Other,
            },
            "import_statement" => match node.child_by_field_name("source") {
                Some(source) => NodeShape::Import {
                    source: unquote(parsed.node_text(&source)),
                },
                None => NodeShape::Other,
            },
            _ => NodeShape::Other,
        }
    }
}

/// Pre-order walk over every node below (and including) `root`.
pub fn walk_tree<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>) -> Visit) {
    let mut cursor = root.walk();
    loop {
        let descend = visit(cursor.node()) == Visit::Continue;
        if descend && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Strips the surrounding quotes from a string literal.
pub fn unquote(text: &str) -> &str {
    text.trim_start_matches(['"', '\'', '`'])
        .trim_end_matches(['"', '\'', '`'])
}

fn count_branches(body: Node<'_>) -> usize {
    let mut count = 0;
    walk_tree(body, |node| {
        if BRANCH_KINDS.contains(&node.kind()) {
            count += 1;
        }
        Visit::Continue
    });
    count
}

fn call_shape<'a>(callee: Node<'_>, parsed: &ParsedSource<'a>) -> CallShape<'a> {
    let mut shape = CallShape::default();
    if callee.kind() == "member_expression" {
        shape.method = callee
            .child_by_field_name("property")
            .map(|p| parsed.node_text(&p));
    }

    // Walk down the object side of the chain collecting property names.
    let mut current = Some(callee);
    while let Some(node) = current {
        current = match node.kind() {
            "member_expression" => {
                if let Some(property) = node.child_by_field_name("property") {
                    shape.chain.push(parsed.node_text(&property));
                }
                node.child_by_field_name("object")
            }
            "call_expression" => node.child_by_field_name("function"),
            "await_expression" | "parenthesized_expression" | "non_null_expression" => {
                node.named_child(0)
            }
            "identifier" | "this" => {
                shape.root = Some(parsed.node_text(&node));
                None
            }
            _ => None,
        };
    }
    shape.chain.reverse();
    shape
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SourceParser;
    use std::path::Path;

    fn shapes_of(text: &str, file: &str) -> Vec<String> {
        let mut parser = SourceParser::new().unwrap();
        let parsed = parser.parse_file(text, Path::new(file)).unwrap();
        let mut shapes = Vec::new();
        walk_tree(parsed.root(), |node| {
            let shape = NodeShape::of(node, &parsed);
            if shape != NodeShape::Other {
                shapes.push(format!("{:?}", shape));
            }
            Visit::Continue
        });
        shapes
    }

    #[test]
    fn test_call_chain_shape() {
        let mut parser = SourceParser::new().unwrap();
        let text = "supabase.from('users').select('*');";
        let parsed = parser.parse_file(text, Path::new("a.ts")).unwrap();

        let mut calls = Vec::new();
        walk_tree(parsed.root(), |node| {
            if let NodeShape::Call(call) = NodeShape::of(node, &parsed) {
                calls.push(call);
            }
            Visit::Continue
        });

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].root, Some("supabase"));
        assert_eq!(calls[0].method, Some("select"));
        assert_eq!(calls[0].chain, vec!["from", "select"]);
        assert_eq!(calls[1].method, Some("from"));
    }

    #[test]
    fn test_plain_call_callee() {
        let mut parser = SourceParser::new().unwrap();
        let parsed = parser.parse_file("fetch(url);", Path::new("a.js")).unwrap();
        let mut callee = None;
        walk_tree(parsed.root(), |node| {
            if let NodeShape::Call(call) = NodeShape::of(node, &parsed) {
                callee = call.callee();
            }
            Visit::Continue
        });
        assert_eq!(callee, Some("fetch"));
    }

    #[test]
    fn test_function_branch_count() {
        let text = r#"
function decide(x) {
    if (x > 1) { return 1; }
    for (const y of x) { if (y) { return 2; } }
    return 0;
}
"#;
        let shapes = shapes_of(text, "a.js");
        assert!(shapes
            .iter()
            .any(|s| s.contains("Function") && s.contains("decide") && s.contains("branches: 3")));
    }

    #[test]
    fn test_markup_and_attributes() {
        let shapes = shapes_of("const v = <Button onClick={go} />;", "a.jsx");
        assert!(shapes.iter().any(|s| s.contains("Markup") && s.contains("Button")));
        assert!(shapes.iter().any(|s| s.contains("Property") && s.contains("onClick")));
        assert!(shapes.iter().any(|s| s.contains("Binding") && s.contains("\"v\"")));
    }

    #[test]
    fn test_import_shape() {
        let shapes = shapes_of("import { createClient } from '@supabase/supabase-js';", "a.ts");
        assert!(shapes
            .iter()
            .any(|s| s.contains("Import") && s.contains("@supabase/supabase-js")));
    }

    #[test]
    fn test_walk_skip_children() {
        let mut parser = SourceParser::new().unwrap();
        let parsed = parser
            .parse_file("import { a } from 'm';\na();", Path::new("a.ts"))
            .unwrap();
        let mut identifiers = 0;
        walk_tree(parsed.root(), |node| {
            if node.kind() == "import_statement" {
                return Visit::SkipChildren;
            }
            if node.kind() == "identifier" {
                identifiers += 1;
            }
            Visit::Continue
        });
        assert_eq!(identifiers, 1);
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'react'"), "react");
        assert_eq!(unquote("\"./a\""), "./a");
    }
}
