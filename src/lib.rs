//! archscope - structural analyzer for JavaScript/TypeScript codebases
//!
//! This crate parses source files once with tree-sitter and derives three
//! views of a codebase from that parse:
//!
//! - an import/export dependency graph with cycle and unused-import detection
//! - a heuristic classification of each file's responsibilities
//! - an effective line count with split suggestions for oversized files
//!
//! [`AnalysisSession`] ties them together and produces a [`ProjectReport`]
//! that can be written as JSON, Markdown or DOT through [`export`].

pub mod analysis;
pub mod config;
pub mod export;
pub mod graph;
pub mod report;
pub mod responsibility;
pub mod size;
pub mod source;
pub mod syntax;

pub use config::AnalyzerConfig;
pub use report::{analyze_file, AnalysisSession, FileAnalysis, ProjectReport};
pub use syntax::{AnalysisError, AnalysisResult};
