//! Unused-import detection.
//!
//! Every identifier in the file outside import statements counts as a use,
//! including JSX tag names and TypeScript type references. This is not
//! scope-aware: a local binding that shadows an import makes the import
//! look used.

use std::collections::HashSet;

use super::extract::{ImportEdge, ImportKind};
use crate::syntax::{walk_tree, ParsedSource, Visit};

/// Node kinds whose text is a reference to a name.
const REFERENCE_KINDS: &[&str] = &[
    "identifier",
    "type_identifier",
    "shorthand_property_identifier",
    "shorthand_property_identifier_pattern",
];

/// Collects every referenced name outside import statements.
pub fn referenced_names<'a>(parsed: &ParsedSource<'a>) -> HashSet<&'a str> {
    let mut names = HashSet::new();

    walk_tree(parsed.root(), |node| {
        if node.kind() == "import_statement" {
            return Visit::SkipChildren;
        }
        if REFERENCE_KINDS.contains(&node.kind()) {
            names.insert(parsed.node_text(&node));
        }
        Visit::Continue
    });

    names
}

/// Lists imported names that are never referenced, as `"<name> from '<source>'"`.
///
/// Only static `import` statements are checked: `require` bindings and
/// dynamic imports are plain variables as far as the tree is concerned.
pub fn find_unused_imports(parsed: &ParsedSource<'_>, imports: &[ImportEdge]) -> Vec<String> {
    let used = referenced_names(parsed);

    imports
        .iter()
        .filter(|import| import.kind == ImportKind::Static)
        .flat_map(|import| {
            import
                .names()
                .into_iter()
                .filter(|name| !used.contains(name))
                .map(move |name| format!("{} from '{}'", name, import.specifier))
        })
        .collect()
}
