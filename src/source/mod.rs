//! File access for the analysis engine.
//!
//! The analyzers consume two capabilities: reading a file's text and listing
//! the files of a project. Both live behind the [`SourceAccess`] trait so a
//! session can run against the filesystem ([`FsSource`]) or against an
//! in-memory file set ([`MemorySource`]).
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use archscope::source::{MemorySource, ScanOptions, SourceAccess};
//!
//! let source = MemorySource::new()
//!     .with_file("/app/src/a.ts", "export const a = 1;")
//!     .with_file("/app/node_modules/x/index.js", "");
//!
//! let files = source.scan(Path::new("/app"), &ScanOptions::default());
//! assert_eq!(files.len(), 1);
//! ```

mod access;
pub mod glob;

pub use access::{FsSource, MemorySource, ScanOptions, SourceAccess};
pub use glob::{GlobPattern, PatternSet};
