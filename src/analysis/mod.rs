//! Import/export extraction and unused-import detection.
//!
//! Both work on the shared [`ParsedSource`](crate::syntax::ParsedSource),
//! so a file is parsed once no matter how many analyzers look at it.
//!
//! # Features
//!
//! - ES module imports (default, named, namespace, side-effect)
//! - CommonJS `require()` and dynamic `import()`
//! - Named, default, inline-declaration and star re-exports
//! - Unused static imports, reported as `"<name> from '<source>'"`
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use archscope::analysis::{extract_imports_exports, find_unused_imports};
//! use archscope::syntax::SourceParser;
//!
//! let text = "import { a, b } from 'm';\na();";
//! let mut parser = SourceParser::new().unwrap();
//! let parsed = parser.parse_file(text, Path::new("x.ts")).unwrap();
//!
//! let facts = extract_imports_exports(&parsed, "x.ts");
//! assert_eq!(facts.imports.len(), 1);
//! assert_eq!(find_unused_imports(&parsed, &facts.imports), vec!["b from 'm'"]);
//! ```

mod extract;
mod usage;

pub use extract::{
    extract_imports_exports, ExportKind, ExportSymbol, ImportEdge, ImportKind, ImportSpecifier,
    ModuleFacts,
};
pub use usage::{find_unused_imports, referenced_names};
