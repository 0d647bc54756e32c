//! Split strategies for oversized files.

use std::path::Path;

use serde::Serialize;
use tree_sitter::Node;

use crate::report::Effort;
use crate::syntax::ParsedSource;

/// Exported functions a file may have before a utility split is proposed.
const UTILITY_SPLIT_MIN_EXPORTS: usize = 5;
/// Type declarations a file may have before a type extraction is proposed.
const TYPE_SPLIT_MIN_DECLARATIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitKind {
    /// One file per component.
    Component,
    /// One file per custom hook.
    Hook,
    /// Core/helpers pair.
    Utility,
    /// Types moved into a `.types` file.
    TypeExtraction,
    /// Equal-sized parts.
    Generic,
}

impl SplitKind {
    pub fn label(&self) -> &'static str {
        match self {
            SplitKind::Component => "component split",
            SplitKind::Hook => "hook split",
            SplitKind::Utility => "utility split",
            SplitKind::TypeExtraction => "type-extraction split",
            SplitKind::Generic => "generic split",
        }
    }
}

/// A suggested decomposition of an oversized file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitStrategy {
    #[serde(rename = "type")]
    pub kind: SplitKind,
    /// File names to create.
    pub targets: Vec<String>,
    pub description: String,
    pub effort: Effort,
}

/// Top-level declarations of a file.
#[derive(Debug, Default)]
struct Declarations<'a> {
    /// Function, class and const names, in document order.
    names: Vec<&'a str>,
    exported_functions: usize,
    type_declarations: usize,
}

/// Proposes split strategies for a file of `line_count` effective lines.
///
/// Strategies come from the file's top-level declarations when a parse is
/// available. If none applies, a generic split into
/// `ceil(line_count / threshold)` parts is returned.
pub fn suggest_splits(
    parsed: Option<&ParsedSource<'_>>,
    file: &str,
    line_count: usize,
    threshold: usize,
) -> Vec<SplitStrategy> {
    let path = Path::new(file);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "module".to_string());
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ts".to_string());

    let declarations = parsed.map(collect_declarations).unwrap_or_default();
    let mut strategies = Vec::new();

    let components: Vec<&str> = declarations
        .names
        .iter()
        .copied()
        .filter(|n| is_component_name(n))
        .collect();
    if components.len() > 1 {
        strategies.push(SplitStrategy {
            kind: SplitKind::Component,
            targets: components.iter().map(|c| format!("{}.{}", c, ext)).collect(),
            description: format!(
                "Move each of the {} components ({}) into its own file",
                components.len(),
                components.join(", ")
            ),
            effort: Effort::Medium,
        });
    }

    let hooks: Vec<&str> = declarations
        .names
        .iter()
        .copied()
        .filter(|n| is_hook_name(n) && *n != stem)
        .collect();
    if !hooks.is_empty() {
        strategies.push(SplitStrategy {
            kind: SplitKind::Hook,
            targets: hooks.iter().map(|h| format!("{}.{}", h, ext)).collect(),
            description: format!("Move custom hooks ({}) into separate files", hooks.join(", ")),
            effort: Effort::Low,
        });
    }

    if declarations.exported_functions > UTILITY_SPLIT_MIN_EXPORTS {
        strategies.push(SplitStrategy {
            kind: SplitKind::Utility,
            targets: vec![
                format!("{}.core.{}", stem, ext),
                format!("{}.helpers.{}", stem, ext),
            ],
            description: format!(
                "Separate the {} exported functions into core logic and helpers",
                declarations.exported_functions
            ),
            effort: Effort::Low,
        });
    }

    if declarations.type_declarations > TYPE_SPLIT_MIN_DECLARATIONS {
        strategies.push(SplitStrategy {
            kind: SplitKind::TypeExtraction,
            targets: vec![format!("{}.types.ts", stem)],
            description: format!(
                "Extract {} interface/type/enum declarations into a types file",
                declarations.type_declarations
            ),
            effort: Effort::Low,
        });
    }

    if strategies.is_empty() {
        let parts = line_count.div_ceil(threshold.max(1)).max(1);
        strategies.push(SplitStrategy {
            kind: SplitKind::Generic,
            targets: (1..=parts)
                .map(|i| format!("{}.part{}.{}", stem, i, ext))
                .collect(),
            description: format!(
                "Split {} lines into {} files of about {} lines each",
                line_count,
                parts,
                line_count.div_ceil(parts)
            ),
            effort: Effort::High,
        });
    }

    strategies
}

/// `UserCard`, `Header`; not `API_URL`.
fn is_component_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase())
        && name.chars().any(|c| c.is_ascii_lowercase())
}

/// `useAuth`, `usePatients`.
fn is_hook_name(name: &str) -> bool {
    name.strip_prefix("use")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}

fn collect_declarations<'a>(parsed: &ParsedSource<'a>) -> Declarations<'a> {
    let mut declarations = Declarations::default();
    let root = parsed.root();
    let mut cursor = root.walk();

    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "export_statement" => {
                if let Some(declaration) = child.child_by_field_name("declaration") {
                    record(parsed, declaration, true, &mut declarations);
                }
            }
            _ => record(parsed, child, false, &mut declarations),
        }
    }

    declarations
}

fn record<'a>(
    parsed: &ParsedSource<'a>,
    node: Node<'_>,
    exported: bool,
    out: &mut Declarations<'a>,
) {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            if let Some(name) = node.child_by_field_name("name") {
                out.names.push(parsed.node_text(&name));
            }
            if exported {
                out.exported_functions += 1;
            }
        }
        "class_declaration" | "abstract_class_declaration" => {
            if let Some(name) = node.child_by_field_name("name") {
                out.names.push(parsed.node_text(&name));
            }
        }
        "lexical_declaration" | "variable_declaration" => {
            let mut cursor = node.walk();
            for declarator in node.named_children(&mut cursor) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                let Some(name) = declarator.child_by_field_name("name") else {
                    continue;
                };
                if name.kind() != "identifier" {
                    continue;
                }
                out.names.push(parsed.node_text(&name));
                let is_function = declarator.child_by_field_name("value").is_some_and(|v| {
                    matches!(v.kind(), "arrow_function" | "function_expression" | "function")
                });
                if exported && is_function {
                    out.exported_functions += 1;
                }
            }
        }
        "interface_declaration" | "type_alias_declaration" | "enum_declaration" => {
            out.type_declarations += 1;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SourceParser;

    fn splits(source: &str, file: &str, lines: usize, threshold: usize) -> Vec<SplitStrategy> {
        let mut parser = SourceParser::new().unwrap();
        let parsed = parser.parse_file(source, Path::new(file)).unwrap();
        suggest_splits(Some(&parsed), file, lines, threshold)
    }

    #[test]
    fn test_component_split() {
        let source = r#"
export function Header() { return <header />; }
export const Footer = () => <footer />;
const API_URL = '/api';
"#;
        let result = splits(source, "src/Layout.tsx", 500, 400);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].kind, SplitKind::Component);
        assert_eq!(result[0].targets, vec!["Header.tsx", "Footer.tsx"]);
        assert_eq!(result[0].effort, Effort::Medium);
    }

    #[test]
    fn test_single_component_is_not_split() {
        let source = "export default function Page() { return <main />; }";
        let result = splits(source, "Page.tsx", 500, 400);
        assert_eq!(result[0].kind, SplitKind::Generic);
    }

    #[test]
    fn test_hook_split() {
        let source = r#"
export function useAuth() { return null; }
export const usePatients = () => [];
"#;
        let result = splits(source, "hooks.ts", 500, 400);
        assert_eq!(result[0].kind, SplitKind::Hook);
        assert_eq!(result[0].targets, vec!["useAuth.ts", "usePatients.ts"]);
    }

    #[test]
    fn test_utility_split() {
        let source = (0..6)
            .map(|i| format!("export function helper{}() {{ return {}; }}\n", i, i))
            .collect::<String>();
        let result = splits(&source, "src/utils.js", 500, 400);

        assert_eq!(result[0].kind, SplitKind::Utility);
        assert_eq!(result[0].targets, vec!["utils.core.js", "utils.helpers.js"]);
    }

    #[test]
    fn test_five_exported_functions_not_enough() {
        let source = (0..5)
            .map(|i| format!("export const f{} = () => {{}};\n", i))
            .collect::<String>();
        let result = splits(&source, "a.ts", 500, 400);
        assert_eq!(result[0].kind, SplitKind::Generic);
    }

    #[test]
    fn test_type_extraction_split() {
        let source = r#"
export interface A { a: string }
export interface B { b: string }
type C = string;
export enum D { X }
"#;
        let result = splits(source, "model.ts", 500, 400);
        assert_eq!(result[0].kind, SplitKind::TypeExtraction);
        assert_eq!(result[0].targets, vec!["model.types.ts"]);
    }

    #[test]
    fn test_generic_split() {
        let result = suggest_splits(None, "src/big.ts", 450, 400);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].kind, SplitKind::Generic);
        assert_eq!(result[0].targets, vec!["big.part1.ts", "big.part2.ts"]);
        assert!(result[0].description.contains("450 lines"));
        assert_eq!(result[0].effort, Effort::High);
    }

    #[test]
    fn test_generic_split_exact_multiple() {
        let result = suggest_splits(None, "big.js", 1200, 400);
        assert_eq!(result[0].targets.len(), 3);
    }
}
