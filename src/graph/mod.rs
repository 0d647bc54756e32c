//! Import graph construction and queries.
//!
//! This module provides the [`DependencyGraph`] struct, built from the
//! imports and exports of every analyzed file. It resolves module
//! specifiers to files, detects import cycles and computes graph-wide
//! rankings.
//!
//! # Example
//!
//! ```rust
//! use archscope::graph::DependencyGraph;
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_file("src/App.tsx", Vec::new(), Vec::new());
//! graph.add_file("src/api/client.ts", Vec::new(), Vec::new());
//! graph.add_import("src/App.tsx", "src/api/client.ts");
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! assert_eq!(graph.summary().orphaned, vec!["src/App.tsx"]);
//! ```

mod dependency_graph;
mod resolve;

pub use dependency_graph::{
    infer_group, CycleInfo, DependencyGraph, FileCount, FileNode, GraphSummary, GraphView,
    ImportLink, ViewEdge, ViewNode, DEFAULT_MAX_CYCLE_DEPTH, SUMMARY_LIMIT,
};
pub use resolve::{is_path_specifier, resolve_specifier, RESOLVE_EXTENSIONS};
pub(crate) use resolve::path_key;
