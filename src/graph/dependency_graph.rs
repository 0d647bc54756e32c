//! File-level import graph using petgraph.
//!
//! Nodes are source files (plus, optionally, external packages); an edge
//! points from the importing file to the file it imports and carries the
//! number of import statements between the two.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;

use super::resolve::{is_path_specifier, resolve_specifier};
use crate::analysis::{ExportSymbol, ImportEdge, ModuleFacts};
use crate::config::DependencyConfig;
use crate::source::glob::PatternSet;

/// Number of entries kept in each ranking of [`GraphSummary`].
pub const SUMMARY_LIMIT: usize = 10;

/// Default cap on the import chain followed by [`DependencyGraph::detect_cycles`].
pub const DEFAULT_MAX_CYCLE_DEPTH: usize = 10;

/// A node of the import graph.
#[derive(Debug, Clone)]
pub struct FileNode {
    /// File path (unique key), or the package specifier for external nodes.
    pub path: String,
    /// Import statements of the file, with `resolved` filled in.
    pub imports: Vec<ImportEdge>,
    pub exports: Vec<ExportSymbol>,
    /// True for packages outside the scanned file set.
    pub external: bool,
}

impl FileNode {
    /// Creates an internal file node.
    pub fn new(
        path: impl Into<String>,
        imports: Vec<ImportEdge>,
        exports: Vec<ExportSymbol>,
    ) -> Self {
        Self {
            path: path.into(),
            imports,
            exports,
            external: false,
        }
    }

    fn external(specifier: impl Into<String>) -> Self {
        Self {
            path: specifier.into(),
            imports: Vec::new(),
            exports: Vec::new(),
            external: true,
        }
    }

    /// File name shown in graph views.
    pub fn label(&self) -> String {
        if self.external {
            return self.path.clone();
        }
        Path::new(&self.path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.clone())
    }

    /// Category inferred from the path, used for grouping and coloring.
    pub fn group(&self) -> &'static str {
        if self.external {
            "external"
        } else {
            infer_group(&self.path)
        }
    }
}

/// An import relationship between two files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportLink {
    /// Number of distinct import statements from source to target.
    pub statements: usize,
}

/// A closed import loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleInfo {
    /// The files along the loop; the last entry repeats the first.
    pub nodes: Vec<String>,
}

impl CycleInfo {
    /// Returns a formatted string representation of the cycle path.
    ///
    /// For example: "a -> b -> c -> a"
    pub fn cycle_path(&self) -> String {
        self.nodes.join(" -> ")
    }

    /// The distinct files of the loop, without the closing repeat.
    pub fn files(&self) -> &[String] {
        match self.nodes.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    /// Returns the number of files in the cycle.
    pub fn len(&self) -> usize {
        self.files().len()
    }

    /// Returns true if the cycle is empty (should not happen in practice).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.iter().any(|n| n == path)
    }
}

/// A file path with the count it was ranked by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCount {
    pub path: String,
    pub count: usize,
}

/// Graph-wide rankings and orphaned files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    /// Files imported by the most statements in other files.
    pub most_imported: Vec<FileCount>,
    /// Files with the most exports.
    pub most_exporting: Vec<FileCount>,
    /// Files with the most import statements.
    pub heaviest: Vec<FileCount>,
    /// Files with no exports that no other file imports.
    pub orphaned: Vec<String>,
}

/// Node of the neutral graph view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewNode {
    pub id: String,
    pub label: String,
    pub group: String,
}

/// Edge of the neutral graph view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewEdge {
    pub from: String,
    pub to: String,
    pub weight: usize,
}

/// Node/edge view of the graph for external renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphView {
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<ViewEdge>,
}

/// A directed graph of file imports.
///
/// The graph uses petgraph's `DiGraph` internally. Edges point from the
/// importing file to the imported file.
///
/// # Example
///
/// ```rust
/// use archscope::graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
///
/// graph.add_file("src/a.ts", Vec::new(), Vec::new());
/// graph.add_file("src/b.ts", Vec::new(), Vec::new());
///
/// assert!(graph.add_import("src/a.ts", "src/b.ts"));
/// assert!(graph.add_import("src/b.ts", "src/a.ts"));
///
/// assert!(graph.has_cycles());
/// assert_eq!(graph.detect_cycles()[0].cycle_path(), "src/a.ts -> src/b.ts -> src/a.ts");
/// ```
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// The underlying directed graph
    graph: DiGraph<FileNode, ImportLink>,
    /// Maps file paths to their node indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
    max_cycle_depth: usize,
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
            max_cycle_depth: DEFAULT_MAX_CYCLE_DEPTH,
        }
    }

    /// Creates a new graph with pre-allocated capacity.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
            max_cycle_depth: DEFAULT_MAX_CYCLE_DEPTH,
        }
    }

    /// Sets the longest import chain followed while looking for cycles.
    pub fn with_max_cycle_depth(mut self, depth: usize) -> Self {
        self.max_cycle_depth = depth;
        self
    }

    /// Builds the graph for a set of analyzed files.
    ///
    /// Every import specifier is resolved against the file set. Resolved
    /// imports become edges; unresolved package imports become external
    /// nodes only when `include_external_deps` is on. Files matching
    /// `exclude_patterns` are left out entirely.
    ///
    /// # Arguments
    ///
    /// * `files` - Pairs of file path and the facts extracted from it
    /// * `config` - Dependency options
    ///
    /// # Example
    ///
    /// ```rust
    /// use archscope::analysis::{ImportEdge, ImportKind, ModuleFacts};
    /// use archscope::config::DependencyConfig;
    /// use archscope::graph::DependencyGraph;
    ///
    /// let import = |from: &str, spec: &str| ImportEdge {
    ///     source_file: from.to_string(),
    ///     specifier: spec.to_string(),
    ///     specifiers: Vec::new(),
    ///     kind: ImportKind::Static,
    ///     line: 1,
    ///     resolved: None,
    /// };
    /// let a = ModuleFacts { imports: vec![import("src/a.ts", "./b")], exports: Vec::new() };
    /// let b = ModuleFacts { imports: vec![import("src/b.ts", "./a")], exports: Vec::new() };
    ///
    /// let graph = DependencyGraph::build(
    ///     [("src/a.ts", &a), ("src/b.ts", &b)],
    ///     &DependencyConfig::default(),
    /// );
    /// assert_eq!(graph.detect_cycles().len(), 1);
    /// ```
    pub fn build<'a, I>(files: I, config: &DependencyConfig) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a ModuleFacts)>,
    {
        let exclude = PatternSet::compile(&config.exclude_patterns);
        let files: Vec<(&str, &ModuleFacts)> = files
            .into_iter()
            .filter(|(path, _)| !exclude.matches(path))
            .collect();
        let known: BTreeSet<String> = files.iter().map(|(path, _)| path.to_string()).collect();

        let mut graph = Self::with_capacity(files.len(), files.len() * 2)
            .with_max_cycle_depth(config.max_circular_depth);

        for (path, facts) in &files {
            let mut imports = facts.imports.clone();
            for import in &mut imports {
                import.resolved = resolve_specifier(path, &import.specifier, &known);
                if import.resolved.is_none()
                    && config.include_external_deps
                    && !is_path_specifier(&import.specifier)
                {
                    // included packages resolve to their external node
                    import.resolved = Some(import.specifier.clone());
                }
            }
            graph.add_file(path, imports, facts.exports.clone());
        }

        let mut links = Vec::new();
        for (path, _) in &files {
            let Some(node) = graph.get_node(path) else {
                continue;
            };
            for import in &node.imports {
                if let Some(target) = &import.resolved {
                    let external = !known.contains(target);
                    links.push((path.to_string(), target.clone(), external));
                }
            }
        }

        for (from, to, external) in links {
            if external && !graph.contains(&to) {
                graph.add_external(&to);
            }
            graph.add_import(&from, &to);
        }

        graph
    }

    /// Adds a file to the graph.
    ///
    /// If the file already exists its imports and exports are replaced and
    /// the existing node index is returned.
    pub fn add_file(
        &mut self,
        path: &str,
        imports: Vec<ImportEdge>,
        exports: Vec<ExportSymbol>,
    ) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(path) {
            let node = &mut self.graph[idx];
            node.imports = imports;
            node.exports = exports;
            node.external = false;
            return idx;
        }

        let idx = self.graph.add_node(FileNode::new(path, imports, exports));
        self.node_indices.insert(path.to_string(), idx);
        idx
    }

    /// Adds an external package node, or returns the existing one.
    pub fn add_external(&mut self, specifier: &str) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(specifier) {
            return idx;
        }
        let idx = self.graph.add_node(FileNode::external(specifier));
        self.node_indices.insert(specifier.to_string(), idx);
        idx
    }

    /// Records one import statement from `from` to `to`.
    ///
    /// Repeated calls for the same pair increase the edge weight instead of
    /// adding parallel edges.
    ///
    /// # Returns
    ///
    /// `true` if the import was recorded, `false` if either node doesn't exist.
    pub fn add_import(&mut self, from: &str, to: &str) -> bool {
        let (Some(&from_idx), Some(&to_idx)) =
            (self.node_indices.get(from), self.node_indices.get(to))
        else {
            return false;
        };

        match self.graph.find_edge(from_idx, to_idx) {
            Some(edge) => self.graph[edge].statements += 1,
            None => {
                self.graph.add_edge(from_idx, to_idx, ImportLink { statements: 1 });
            }
        }
        true
    }

    /// Gets a node by path.
    pub fn get_node(&self, path: &str) -> Option<&FileNode> {
        self.node_indices
            .get(path)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Gets the files a file imports (outgoing edges), sorted by path.
    ///
    /// # Example
    ///
    /// ```rust
    /// use archscope::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.add_file("app.ts", Vec::new(), Vec::new());
    /// graph.add_file("db.ts", Vec::new(), Vec::new());
    /// graph.add_import("app.ts", "db.ts");
    ///
    /// let deps = graph.get_dependencies("app.ts");
    /// assert_eq!(deps.len(), 1);
    /// assert_eq!(deps[0].path, "db.ts");
    /// ```
    pub fn get_dependencies(&self, path: &str) -> Vec<&FileNode> {
        self.neighbors(path, Direction::Outgoing)
    }

    /// Gets the files that import a file (incoming edges), sorted by path.
    pub fn get_dependents(&self, path: &str) -> Vec<&FileNode> {
        self.neighbors(path, Direction::Incoming)
    }

    fn neighbors(&self, path: &str, direction: Direction) -> Vec<&FileNode> {
        let Some(&idx) = self.node_indices.get(path) else {
            return Vec::new();
        };

        let mut nodes: Vec<&FileNode> = self
            .graph
            .neighbors_directed(idx, direction)
            .filter_map(|n| self.graph.node_weight(n))
            .collect();
        nodes.sort_by(|a, b| a.path.cmp(&b.path));
        nodes.dedup_by(|a, b| a.path == b.path);
        nodes
    }

    /// Internal file nodes, in path order.
    pub fn files(&self) -> Vec<&FileNode> {
        self.sorted_internal_nodes()
            .into_iter()
            .map(|idx| &self.graph[idx])
            .collect()
    }

    /// Checks if the graph contains any cycle, regardless of the depth cap.
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Detects import cycles with a three-color depth-first search.
    ///
    /// Files are visited in path order. Each time the search reaches a file
    /// that is still on the current path, the loop from that file back to
    /// itself is recorded. Overlapping loops are reported independently.
    /// Chains longer than the configured depth are not followed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use archscope::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// for file in ["a", "b", "c"] {
    ///     graph.add_file(file, Vec::new(), Vec::new());
    /// }
    /// graph.add_import("a", "b");
    /// graph.add_import("b", "c");
    /// graph.add_import("c", "a");
    ///
    /// let cycles = graph.detect_cycles();
    /// assert_eq!(cycles.len(), 1);
    /// assert_eq!(cycles[0].nodes, vec!["a", "b", "c", "a"]);
    /// ```
    pub fn detect_cycles(&self) -> Vec<CycleInfo> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Color {
            White,
            Gray,
            Black,
        }

        let mut color = vec![Color::White; self.graph.node_count()];
        let mut cycles = Vec::new();

        for start in self.sorted_internal_nodes() {
            if color[start.index()] != Color::White {
                continue;
            }

            // (node, neighbors still to visit)
            let mut stack: Vec<(NodeIndex, Vec<NodeIndex>)> = Vec::new();
            color[start.index()] = Color::Gray;
            stack.push((start, self.pending_neighbors(start)));

            loop {
                let Some(top) = stack.last_mut() else {
                    break;
                };
                let node = top.0;
                let Some(next) = top.1.pop() else {
                    color[node.index()] = Color::Black;
                    stack.pop();
                    continue;
                };

                match color[next.index()] {
                    Color::Gray => {
                        let from = stack.iter().position(|(n, _)| *n == next).unwrap_or(0);
                        let mut nodes: Vec<String> = stack[from..]
                            .iter()
                            .map(|(n, _)| self.graph[*n].path.clone())
                            .collect();
                        nodes.push(self.graph[next].path.clone());
                        cycles.push(CycleInfo { nodes });
                    }
                    Color::White if stack.len() < self.max_cycle_depth => {
                        color[next.index()] = Color::Gray;
                        stack.push((next, self.pending_neighbors(next)));
                    }
                    _ => {}
                }
            }
        }

        cycles
    }

    /// Returns the set of file paths that are part of any detected cycle.
    pub fn files_in_cycles(&self) -> HashSet<String> {
        self.detect_cycles()
            .into_iter()
            .flat_map(|cycle| cycle.nodes)
            .collect()
    }

    /// Computes the graph-wide rankings and the orphaned files.
    ///
    /// Rankings skip zero counts, are sorted by count (descending, then by
    /// path) and keep the top [`SUMMARY_LIMIT`] entries.
    pub fn summary(&self) -> GraphSummary {
        let internal = self.sorted_internal_nodes();
        let imported_by = |idx: NodeIndex| -> usize {
            self.graph
                .edges_directed(idx, Direction::Incoming)
                .filter(|e| e.source() != idx)
                .map(|e| e.weight().statements)
                .sum()
        };

        let most_imported = top_counts(
            internal
                .iter()
                .map(|&idx| (&self.graph[idx].path, imported_by(idx))),
        );
        let most_exporting = top_counts(
            internal
                .iter()
                .map(|&idx| (&self.graph[idx].path, self.graph[idx].exports.len())),
        );
        let heaviest = top_counts(
            internal
                .iter()
                .map(|&idx| (&self.graph[idx].path, self.graph[idx].imports.len())),
        );
        let orphaned = internal
            .iter()
            .filter(|&&idx| self.graph[idx].exports.is_empty() && imported_by(idx) == 0)
            .map(|&idx| self.graph[idx].path.clone())
            .collect();

        GraphSummary {
            most_imported,
            most_exporting,
            heaviest,
            orphaned,
        }
    }

    /// Node/edge view: label is the file name, group the inferred category,
    /// edge weight the number of import statements.
    pub fn view(&self) -> GraphView {
        let mut nodes: Vec<ViewNode> = self
            .graph
            .node_weights()
            .map(|node| ViewNode {
                id: node.path.clone(),
                label: node.label(),
                group: node.group().to_string(),
            })
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        let mut edges: Vec<ViewEdge> = self
            .graph
            .edge_references()
            .map(|e| ViewEdge {
                from: self.graph[e.source()].path.clone(),
                to: self.graph[e.target()].path.clone(),
                weight: e.weight().statements,
            })
            .collect();
        edges.sort_by(|a, b| a.from.cmp(&b.from).then_with(|| a.to.cmp(&b.to)));

        GraphView { nodes, edges }
    }

    /// Renders the graph in Graphviz DOT: one node line per file, colored by
    /// group, followed by one edge line per import relationship.
    pub fn to_dot(&self) -> String {
        let view = self.view();
        let mut out = String::from("digraph dependencies {\n");
        out.push_str("  rankdir=LR;\n");
        out.push_str("  node [shape=box, style=filled, fontname=\"Helvetica\"];\n");

        for node in &view.nodes {
            out.push_str(&format!(
                "  \"{}\" [label=\"{}\", fillcolor=\"{}\"];\n",
                escape_dot(&node.id),
                escape_dot(&node.label),
                group_color(&node.group)
            ));
        }
        for edge in &view.edges {
            out.push_str(&format!(
                "  \"{}\" -> \"{}\";\n",
                escape_dot(&edge.from),
                escape_dot(&edge.to)
            ));
        }

        out.push_str("}\n");
        out
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Checks if a node exists in the graph.
    pub fn contains(&self, path: &str) -> bool {
        self.node_indices.contains_key(path)
    }

    fn sorted_internal_nodes(&self) -> Vec<NodeIndex> {
        let mut nodes: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&idx| !self.graph[idx].external)
            .collect();
        nodes.sort_by(|a, b| self.graph[*a].path.cmp(&self.graph[*b].path));
        nodes
    }

    /// Internal successors in reverse path order, so popping yields path order.
    fn pending_neighbors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut next: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .filter(|&n| !self.graph[n].external)
            .collect();
        next.sort_by(|a, b| self.graph[*b].path.cmp(&self.graph[*a].path));
        next.dedup();
        next
    }
}

/// Infers a file's category from well-known directory names in its path.
pub fn infer_group(path: &str) -> &'static str {
    let path = format!("/{}", path.replace('\\', "/").trim_start_matches('/'));
    const GROUPS: &[(&str, &str)] = &[
        ("/components/", "component"),
        ("/hooks/", "hook"),
        ("/api/", "api"),
        ("/pages/", "page"),
        ("/services/", "service"),
        ("/store/", "store"),
        ("/types/", "types"),
        ("/utils/", "utility"),
        ("/lib/", "utility"),
    ];
    GROUPS
        .iter()
        .find(|(segment, _)| path.contains(segment))
        .map(|(_, group)| *group)
        .unwrap_or("module")
}

fn group_color(group: &str) -> &'static str {
    match group {
        "component" => "#61dafb",
        "hook" => "#a78bfa",
        "api" => "#f59e0b",
        "page" => "#f472b6",
        "service" => "#fb923c",
        "store" => "#60a5fa",
        "types" => "#94a3b8",
        "utility" => "#34d399",
        "external" => "#d1d5db",
        _ => "#e5e7eb",
    }
}

fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn top_counts<'a>(entries: impl Iterator<Item = (&'a String, usize)>) -> Vec<FileCount> {
    let mut counts: Vec<FileCount> = entries
        .filter(|(_, count)| *count > 0)
        .map(|(path, count)| FileCount {
            path: path.clone(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.path.cmp(&b.path)));
    counts.truncate(SUMMARY_LIMIT);
    counts
}
