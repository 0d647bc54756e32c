//! Parsing layer shared by all analyzers.
//!
//! Each file is parsed once with tree-sitter ([`SourceParser`]). Analyzers
//! then walk the same tree and see nodes through the closed [`NodeShape`]
//! type rather than raw kind strings.

mod parse;
mod shape;

pub use parse::{AnalysisError, AnalysisResult, ParsedSource, SourceLanguage, SourceParser};
pub use shape::{unquote, walk_tree, CallShape, NodeShape, Visit};
