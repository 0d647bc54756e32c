//! Analysis session: per-file pipeline, result cache and import graph.
//!
//! A session owns everything that outlives a single analyze call. Results
//! are cached by path and reused until [`AnalysisSession::clear_cache`] is
//! called; nothing is recomputed behind the caller's back.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::aggregate::{aggregate, ProjectReport};
use super::findings::{
    Effort, Issue, IssueType, Location, Recommendation, RecommendationType, Severity,
};
use crate::analysis::{
    extract_imports_exports, find_unused_imports, ExportSymbol, ImportEdge, ModuleFacts,
};
use crate::config::AnalyzerConfig;
use crate::graph::{path_key, CycleInfo, DependencyGraph};
use crate::responsibility::{ResponsibilityClassifier, ResponsibilityResult};
use crate::size::{SizeAdvisor, SizeReport};
use crate::source::{FsSource, SourceAccess};
use crate::syntax::{AnalysisError, AnalysisResult, SourceParser};

/// Everything derived from one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileAnalysis {
    pub file: String,
    #[serde(flatten)]
    pub facts: ModuleFacts,
    /// `"<name> from '<source>'"` for every unused static import.
    pub unused_imports: Vec<String>,
    pub responsibilities: ResponsibilityResult,
    pub size: SizeReport,
    /// Issues of all analyzers, except cycle issues which need the whole graph.
    pub issues: Vec<Issue>,
    /// Recommendations of all analyzers, highest priority first.
    pub recommendations: Vec<Recommendation>,
}

/// A cached file: its text and the analysis derived from it.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub text: String,
    pub analysis: FileAnalysis,
}

/// Import facts of one file after graph resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyResult {
    pub file: String,
    /// Imports with `resolved` filled in.
    pub imports: Vec<ImportEdge>,
    pub exports: Vec<ExportSymbol>,
    /// Files this file imports.
    pub dependencies: Vec<String>,
    /// Files that import this file.
    pub dependents: Vec<String>,
    pub unused_imports: Vec<String>,
    /// Cycles this file takes part in.
    pub cycles: Vec<CycleInfo>,
}

/// Runs every per-file analyzer over one shared parse.
struct FileAnalyzer {
    parser: SourceParser,
    classifier: ResponsibilityClassifier,
    size_advisor: SizeAdvisor,
    unused_import_threshold: usize,
}

impl FileAnalyzer {
    fn new(config: &AnalyzerConfig) -> AnalysisResult<Self> {
        Ok(Self {
            parser: SourceParser::new()?,
            classifier: ResponsibilityClassifier::new(
                config.responsibilities.clone(),
                config.heuristics.clone(),
            ),
            size_advisor: SizeAdvisor::new(config.size.clone()),
            unused_import_threshold: config.dependencies.unused_import_threshold,
        })
    }

    fn analyze(&mut self, file: &str, text: &str) -> FileAnalysis {
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        let (facts, unused_imports, responsibilities, size) =
            match self.parser.parse_file(text, Path::new(file)) {
                Ok(parsed) => {
                    if parsed.has_errors() {
                        issues.push(Issue::new(
                            IssueType::SyntaxErrors,
                            Severity::Low,
                            "Parser recovered from syntax errors; results may be incomplete",
                            Location::file(file),
                        ));
                    }
                    let facts = extract_imports_exports(&parsed, file);
                    let unused = find_unused_imports(&parsed, &facts.imports);
                    let responsibilities = self.classifier.classify(&parsed, file);
                    let size = self.size_advisor.analyze(text, Some(&parsed), file);
                    (facts, unused, responsibilities, size)
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", file, e);
                    (
                        ModuleFacts::default(),
                        Vec::new(),
                        ResponsibilityResult::parse_failure(file, &e.to_string()),
                        self.size_advisor.analyze(text, None, file),
                    )
                }
            };

        if unused_imports.len() > self.unused_import_threshold {
            let location = first_unused_line(&facts.imports, &unused_imports)
                .map(|line| Location::at(file, line, 1))
                .unwrap_or_else(|| Location::file(file));
            issues.push(Issue::new(
                IssueType::UnusedImport,
                Severity::Low,
                format!(
                    "{} unused import(s): {}",
                    unused_imports.len(),
                    unused_imports.join(", ")
                ),
                location,
            ));
            recommendations.push(
                Recommendation::new(
                    RecommendationType::RemoveUnusedImports,
                    3,
                    format!("Remove {} unused import(s)", unused_imports.len()),
                    Effort::Low,
                )
                .with_benefits(&["Less noise", "Smaller bundles"])
                .with_risks(&["Side-effect imports must be kept"]),
            );
        }

        issues.extend(responsibilities.issues.iter().cloned());
        issues.extend(size.issues.iter().cloned());
        recommendations.extend(responsibilities.recommendations.iter().cloned());
        recommendations.extend(size.recommendations.iter().cloned());
        recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));

        debug!(
            "Analyzed {}: {} imports, {} exports, {} effective lines",
            file,
            facts.imports.len(),
            facts.exports.len(),
            size.line_count
        );

        FileAnalysis {
            file: file.to_string(),
            facts,
            unused_imports,
            responsibilities,
            size,
            issues,
            recommendations,
        }
    }
}

/// Line of the first import statement binding an unused name.
fn first_unused_line(imports: &[ImportEdge], unused: &[String]) -> Option<usize> {
    imports
        .iter()
        .find(|import| {
            import.names().iter().any(|name| {
                unused.contains(&format!("{} from '{}'", name, import.specifier))
            })
        })
        .map(|import| import.line)
}

/// Analyzes a single file from disk.
///
/// Unlike the session entry points, a read failure is returned as an error.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use archscope::config::AnalyzerConfig;
/// use archscope::report::analyze_file;
///
/// let analysis = analyze_file(Path::new("src/App.tsx"), &AnalyzerConfig::default())?;
/// println!("{} effective lines", analysis.size.line_count);
/// # Ok::<(), archscope::syntax::AnalysisError>(())
/// ```
pub fn analyze_file(path: &Path, config: &AnalyzerConfig) -> AnalysisResult<FileAnalysis> {
    let key = path_key(path);
    let text = fs::read_to_string(path).map_err(|e| AnalysisError::FileRead {
        path: format!("{} ({})", key, e),
    })?;
    Ok(FileAnalyzer::new(config)?.analyze(&key, &text))
}

/// Caller-owned analysis context.
///
/// Not safe to share between threads; create one session per worker.
pub struct AnalysisSession<S: SourceAccess = FsSource> {
    source: S,
    config: AnalyzerConfig,
    analyzer: FileAnalyzer,
    cache: BTreeMap<String, SourceFile>,
    graph: DependencyGraph,
}

impl AnalysisSession<FsSource> {
    /// Creates a session that reads from the filesystem.
    pub fn new(config: AnalyzerConfig) -> AnalysisResult<Self> {
        Self::with_source(FsSource, config)
    }
}

impl<S: SourceAccess> AnalysisSession<S> {
    /// Creates a session over any [`SourceAccess`].
    pub fn with_source(source: S, config: AnalyzerConfig) -> AnalysisResult<Self> {
        let analyzer = FileAnalyzer::new(&config)?;
        let graph = DependencyGraph::new()
            .with_max_cycle_depth(config.dependencies.max_circular_depth);
        Ok(Self {
            source,
            config,
            analyzer,
            cache: BTreeMap::new(),
            graph,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Analyzes one file, or returns its cached result.
    ///
    /// Returns `None` if the file cannot be read.
    pub fn analyze_path(&mut self, path: &Path) -> Option<&FileAnalysis> {
        let key = path_key(path);
        let fresh = self.ensure_analyzed(path, &key)?;
        if fresh {
            self.rebuild_graph();
        }
        self.cache.get(&key).map(|f| &f.analysis)
    }

    /// Analyzes a list of files and aggregates the results.
    ///
    /// Files that cannot be read are logged and listed in
    /// [`ProjectReport::skipped`]; they never abort the batch.
    pub fn analyze_project<I, P>(&mut self, paths: I) -> ProjectReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut keys = Vec::new();
        let mut skipped = Vec::new();

        for path in paths {
            let path = path.as_ref();
            let key = path_key(path);
            match self.ensure_analyzed(path, &key) {
                Some(_) if !keys.contains(&key) => keys.push(key),
                Some(_) => {}
                None => skipped.push(key),
            }
        }
        self.rebuild_graph();

        let analyses: Vec<&FileAnalysis> = keys
            .iter()
            .filter_map(|k| self.cache.get(k))
            .map(|f| &f.analysis)
            .collect();
        let report = aggregate(&analyses, &self.graph, skipped);

        info!(
            "Analyzed {} files: {} imports, {} exports, {} cycles, {} skipped",
            report.summary.total_files,
            report.summary.total_imports,
            report.summary.total_exports,
            report.summary.circular_dependencies,
            report.summary.skipped_files
        );
        report
    }

    /// Scans `root` with the configured patterns and analyzes every match.
    pub fn analyze_directory(&mut self, root: &Path) -> ProjectReport {
        let files: Vec<PathBuf> = self.source.scan(root, &self.config.scan);
        debug!("Found {} source files under {}", files.len(), root.display());
        self.analyze_project(files)
    }

    /// Resolved imports, neighbors and cycles of an analyzed file.
    pub fn dependency_result(&self, path: &Path) -> Option<DependencyResult> {
        let key = path_key(path);
        let cached = self.cache.get(&key)?;
        let paths = |nodes: Vec<&crate::graph::FileNode>| -> Vec<String> {
            nodes.into_iter().map(|n| n.path.clone()).collect()
        };

        let (imports, exports) = match self.graph.get_node(&key) {
            Some(node) => (node.imports.clone(), node.exports.clone()),
            None => (
                cached.analysis.facts.imports.clone(),
                cached.analysis.facts.exports.clone(),
            ),
        };

        Some(DependencyResult {
            file: key.clone(),
            imports,
            exports,
            dependencies: paths(self.graph.get_dependencies(&key)),
            dependents: paths(self.graph.get_dependents(&key)),
            unused_imports: cached.analysis.unused_imports.clone(),
            cycles: self
                .graph
                .detect_cycles()
                .into_iter()
                .filter(|c| c.contains(&key))
                .collect(),
        })
    }

    /// Cached analyses, in path order.
    pub fn cached_results(&self) -> Vec<&FileAnalysis> {
        self.cache.values().map(|f| &f.analysis).collect()
    }

    /// Cached text of a file.
    pub fn cached_text(&self, path: &Path) -> Option<&str> {
        self.cache.get(&path_key(path)).map(|f| f.text.as_str())
    }

    pub fn is_cached(&self, path: &Path) -> bool {
        self.cache.contains_key(&path_key(path))
    }

    /// The import graph over every cached file.
    pub fn dependency_graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Drops every cached result and the graph.
    pub fn clear_cache(&mut self) {
        debug!("Clearing {} cached files", self.cache.len());
        self.cache.clear();
        self.graph = DependencyGraph::new()
            .with_max_cycle_depth(self.config.dependencies.max_circular_depth);
    }

    /// Returns `Some(true)` if the file was analyzed now, `Some(false)` if it
    /// was cached, `None` if it could not be read.
    fn ensure_analyzed(&mut self, path: &Path, key: &str) -> Option<bool> {
        if self.cache.contains_key(key) {
            return Some(false);
        }

        let Some(text) = self.source.read(path) else {
            warn!("Skipping {}: file could not be read", key);
            return None;
        };
        let analysis = self.analyzer.analyze(key, &text);
        self.cache.insert(key.to_string(), SourceFile { text, analysis });
        Some(true)
    }

    fn rebuild_graph(&mut self) {
        self.graph = DependencyGraph::build(
            self.cache
                .iter()
                .map(|(path, file)| (path.as_str(), &file.analysis.facts)),
            &self.config.dependencies,
        );
    }
}
