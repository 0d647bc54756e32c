//! Import and export extraction from a parsed JavaScript/TypeScript file.
//!
//! Recognized imports:
//!
//! - named: `import { a, b as c } from 'm'`
//! - default: `import a from 'm'`
//! - namespace: `import * as a from 'm'`
//! - side-effect: `import 'm'`
//! - CommonJS `require('m')`, TypeScript `import a = require('m')`
//! - dynamic `import('m')`
//!
//! Recognized exports: named blocks (`export { a }`, with or without
//! `from`), `export default`, inline declarations
//! (`export const|let|var|function|class|interface|type|enum NAME`) and
//! star re-exports (`export * from 'm'`, `export * as ns from 'm'`).
//!
//! Entries come out in document order, one import entry per statement.

use serde::Serialize;
use tree_sitter::Node;

use crate::syntax::{unquote, walk_tree, ParsedSource, Visit};

/// The kind of import statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportKind {
    /// ES module import statement: `import ... from 'module'`
    Static,
    /// CommonJS require: `const x = require('module')`
    Require,
    /// Dynamic import: `import('module')`
    Dynamic,
}

/// An individual binding introduced by an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ImportSpecifier {
    /// Default import: `import foo from 'module'`
    Default { local: String },
    /// Named import: `import { foo } from 'module'` or `import { foo as bar } from 'module'`
    Named { imported: String, local: String },
    /// Namespace import: `import * as foo from 'module'`
    Namespace { local: String },
    /// Entire module (CommonJS style): `const mod = require('module')`
    Entire { local: String },
}

impl ImportSpecifier {
    /// Returns the local name (the name used in the importing file).
    pub fn local_name(&self) -> &str {
        match self {
            ImportSpecifier::Default { local }
            | ImportSpecifier::Named { local, .. }
            | ImportSpecifier::Namespace { local }
            | ImportSpecifier::Entire { local } => local,
        }
    }
}

/// One import statement of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportEdge {
    /// File containing the import.
    pub source_file: String,
    /// Module specifier as written (`react`, `./utils`, `@scope/pkg`).
    pub specifier: String,
    /// Bindings introduced; empty for side-effect imports.
    pub specifiers: Vec<ImportSpecifier>,
    pub kind: ImportKind,
    /// Line number in the source file (1-indexed).
    pub line: usize,
    /// File the specifier resolved to, filled in by the graph builder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
}

impl ImportEdge {
    /// Local names bound by this import.
    pub fn names(&self) -> Vec<&str> {
        self.specifiers.iter().map(|s| s.local_name()).collect()
    }

    /// Returns true if the specifier is a relative or absolute path.
    pub fn is_relative(&self) -> bool {
        self.specifier.starts_with('.') || self.specifier.starts_with('/')
    }

    /// Returns true if this import only runs the module for its side effects.
    pub fn is_side_effect_only(&self) -> bool {
        self.specifiers.is_empty()
    }

    /// Returns true if this is a namespace import (uses all exports).
    pub fn is_namespace_import(&self) -> bool {
        self.specifiers
            .iter()
            .any(|s| matches!(s, ImportSpecifier::Namespace { .. }))
    }
}

/// Whether an export is named or the module default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportKind {
    Named,
    Default,
}

/// One exported symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSymbol {
    /// Exported name; `default` for anonymous default exports, `*` for a
    /// plain star re-export.
    pub name: String,
    pub kind: ExportKind,
    /// Line number in the source file (1-indexed).
    pub line: usize,
    /// Module re-exported from, for `export ... from 'm'`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl ExportSymbol {
    fn new(name: impl Into<String>, kind: ExportKind, line: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            line,
            from: None,
        }
    }
}

/// Imports and exports of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleFacts {
    pub imports: Vec<ImportEdge>,
    pub exports: Vec<ExportSymbol>,
}

/// Extract imports and exports from a parsed file.
pub fn extract_imports_exports(parsed: &ParsedSource<'_>, file_path: &str) -> ModuleFacts {
    let extractor = Extractor { parsed, file_path };
    let mut facts = ModuleFacts::default();

    walk_tree(parsed.root(), |node| match node.kind() {
        "import_statement" => {
            if let Some(import) = extractor.parse_import_statement(&node) {
                facts.imports.push(import);
            }
            Visit::SkipChildren
        }
        "call_expression" => {
            if let Some(import) = extractor.parse_require_or_dynamic_import(&node) {
                facts.imports.push(import);
            }
            Visit::Continue
        }
        "export_statement" => {
            extractor.parse_export_statement(&node, &mut facts.exports);
            Visit::Continue
        }
        _ => Visit::Continue,
    });

    facts
}

struct Extractor<'p, 'a> {
    parsed: &'p ParsedSource<'a>,
    file_path: &'p str,
}

impl<'p, 'a> Extractor<'p, 'a> {
    fn text(&self, node: &Node) -> &'a str {
        self.parsed.node_text(node)
    }

    fn edge(
        &self,
        specifier: &str,
        specifiers: Vec<ImportSpecifier>,
        kind: ImportKind,
        node: &Node,
    ) -> ImportEdge {
        ImportEdge {
            source_file: self.file_path.to_string(),
            specifier: specifier.to_string(),
            specifiers,
            kind,
            line: node.start_position().row + 1,
            resolved: None,
        }
    }

    /// Parse an ES module import statement.
    fn parse_import_statement(&self, node: &Node) -> Option<ImportEdge> {
        let mut source_module = None;
        let mut specifiers = Vec::new();
        let mut kind = ImportKind::Static;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "string" => source_module = Some(unquote(self.text(&child))),
                "import_clause" => self.parse_import_clause(&child, &mut specifiers),
                "import_require_clause" => {
                    // import fs = require('fs')
                    kind = ImportKind::Require;
                    let mut inner = child.walk();
                    for part in child.children(&mut inner) {
                        match part.kind() {
                            "identifier" => specifiers.push(ImportSpecifier::Entire {
                                local: self.text(&part).to_string(),
                            }),
                            "string" => source_module = Some(unquote(self.text(&part))),
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }

        let source_module = source_module.filter(|s| !s.is_empty())?;
        Some(self.edge(source_module, specifiers, kind, node))
    }

    /// Parse the import clause (everything between 'import' and 'from').
    fn parse_import_clause(&self, node: &Node, specifiers: &mut Vec<ImportSpecifier>) {
        let mut cursor = node.walk();

        for child in node.children(&mut cursor) {
            match child.kind() {
                "identifier" => specifiers.push(ImportSpecifier::Default {
                    local: self.text(&child).to_string(),
                }),
                "namespace_import" => {
                    let mut inner = child.walk();
                    let name = child
                        .children(&mut inner)
                        .find(|c| c.kind() == "identifier")
                        .map(|c| self.text(&c).to_string());
                    if let Some(local) = name {
                        specifiers.push(ImportSpecifier::Namespace { local });
                    }
                }
                "named_imports" => {
                    let mut inner = child.walk();
                    for spec in child.children(&mut inner) {
                        if spec.kind() == "import_specifier" {
                            if let Some(named) = self.parse_import_specifier(&spec) {
                                specifiers.push(named);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Parse a single import specifier: foo or foo as bar
    fn parse_import_specifier(&self, node: &Node) -> Option<ImportSpecifier> {
        let imported = node.child_by_field_name("name").map(|n| self.text(&n))?;
        let local = node
            .child_by_field_name("alias")
            .map(|n| self.text(&n))
            .unwrap_or(imported);

        Some(ImportSpecifier::Named {
            imported: unquote(imported).to_string(),
            local: local.to_string(),
        })
    }

    /// Parse require() calls or dynamic import().
    fn parse_require_or_dynamic_import(&self, node: &Node) -> Option<ImportEdge> {
        let func_node = node.child_by_field_name("function")?;

        let kind = match (func_node.kind(), self.text(&func_node)) {
            ("identifier", "require") => ImportKind::Require,
            ("import", _) => ImportKind::Dynamic,
            _ => return None,
        };

        let args_node = node.child_by_field_name("arguments")?;
        let mut args_cursor = args_node.walk();
        let first_string = args_node
            .children(&mut args_cursor)
            .find(|c| c.kind() == "string")?;
        let source_module = unquote(self.text(&first_string));

        let specifiers = if kind == ImportKind::Require {
            self.require_bindings(node)
        } else {
            Vec::new()
        };

        Some(self.edge(source_module, specifiers, kind, node))
    }

    /// Bindings in `const x = require('...')` or `const { a, b } = require('...')`.
    fn require_bindings(&self, call_node: &Node) -> Vec<ImportSpecifier> {
        let Some(parent) = call_node.parent() else {
            return Vec::new();
        };
        if parent.kind() != "variable_declarator" {
            return Vec::new();
        }
        let Some(name_node) = parent.child_by_field_name("name") else {
            return Vec::new();
        };

        match name_node.kind() {
            "identifier" => vec![ImportSpecifier::Entire {
                local: self.text(&name_node).to_string(),
            }],
            "object_pattern" => {
                let mut cursor = name_node.walk();
                name_node
                    .named_children(&mut cursor)
                    .filter_map(|p| match p.kind() {
                        "shorthand_property_identifier_pattern" => {
                            let name = self.text(&p).to_string();
                            Some(ImportSpecifier::Named {
                                imported: name.clone(),
                                local: name,
                            })
                        }
                        "pair_pattern" => {
                            let key = p.child_by_field_name("key")?;
                            let value = p.child_by_field_name("value")?;
                            (value.kind() == "identifier").then(|| ImportSpecifier::Named {
                                imported: self.text(&key).to_string(),
                                local: self.text(&value).to_string(),
                            })
                        }
                        _ => None,
                    })
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// Parse an export statement into zero or more exported symbols.
    fn parse_export_statement(&self, node: &Node, exports: &mut Vec<ExportSymbol>) {
        let line = node.start_position().row + 1;
        let from = node
            .child_by_field_name("source")
            .map(|s| unquote(self.text(&s)).to_string());

        let mut is_default = false;
        let mut is_star = false;
        let mut namespace_alias = None;
        let mut clause = None;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "default" => is_default = true,
                "*" => is_star = true,
                "namespace_export" => {
                    is_star = true;
                    let mut inner = child.walk();
                    namespace_alias = child
                        .named_children(&mut inner)
                        .last()
                        .map(|n| unquote(self.text(&n)).to_string());
                }
                // `export * as ns from` in grammars without namespace_export
                "identifier" if is_star => namespace_alias = Some(self.text(&child).to_string()),
                "export_clause" => clause = Some(child),
                _ => {}
            }
        }

        if let Some(clause) = clause {
            let mut inner = clause.walk();
            for spec in clause.named_children(&mut inner) {
                if spec.kind() != "export_specifier" {
                    continue;
                }
                let Some(name) = spec.child_by_field_name("name") else {
                    continue;
                };
                let exported = spec
                    .child_by_field_name("alias")
                    .map(|a| unquote(self.text(&a)))
                    .unwrap_or_else(|| unquote(self.text(&name)));
                let kind = if exported == "default" {
                    ExportKind::Default
                } else {
                    ExportKind::Named
                };
                let mut symbol = ExportSymbol::new(exported, kind, line);
                symbol.from = from.clone();
                exports.push(symbol);
            }
            return;
        }

        if is_star {
            let mut symbol = ExportSymbol::new(
                namespace_alias.unwrap_or_else(|| "*".to_string()),
                ExportKind::Named,
                line,
            );
            symbol.from = from;
            exports.push(symbol);
            return;
        }

        if is_default {
            let name = node
                .child_by_field_name("declaration")
                .and_then(|d| d.child_by_field_name("name"))
                .or_else(|| {
                    node.child_by_field_name("value")
                        .filter(|v| v.kind() == "identifier")
                })
                .map(|n| self.text(&n))
                .unwrap_or("default");
            exports.push(ExportSymbol::new(name, ExportKind::Default, line));
            return;
        }

        if let Some(declaration) = node.child_by_field_name("declaration") {
            for name in self.declared_names(&declaration) {
                exports.push(ExportSymbol::new(name, ExportKind::Named, line));
            }
        }
    }

    /// Names introduced by an exported declaration.
    fn declared_names(&self, declaration: &Node) -> Vec<&'a str> {
        match declaration.kind() {
            "lexical_declaration" | "variable_declaration" => {
                let mut cursor = declaration.walk();
                declaration
                    .named_children(&mut cursor)
                    .filter(|c| c.kind() == "variable_declarator")
                    .filter_map(|d| d.child_by_field_name("name"))
                    .filter(|n| n.kind() == "identifier")
                    .map(|n| self.text(&n))
                    .collect()
            }
            "ambient_declaration" => {
                let mut cursor = declaration.walk();
                let inner: Vec<Node> = declaration.named_children(&mut cursor).collect();
                inner.iter().flat_map(|d| self.declared_names(d)).collect()
            }
            _ => declaration
                .child_by_field_name("name")
                .map(|n| vec![self.text(&n)])
                .unwrap_or_default(),
        }
    }
}
