use serde::Serialize;

use super::findings::{
    Effort, Issue, IssueType, Location, Recommendation, RecommendationType, Severity,
};
use super::session::FileAnalysis;
use crate::graph::{CycleInfo, DependencyGraph, GraphSummary, GraphView};

/// One file of a project report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    /// Per-file analysis, with resolved imports and cycle issues merged in.
    #[serde(flatten)]
    pub analysis: FileAnalysis,
    /// Cycles this file takes part in.
    pub cycles: Vec<CycleInfo>,
}

impl FileReport {
    pub fn path(&self) -> &str {
        &self.analysis.file
    }
}

/// Project-wide counts and rankings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub total_files: usize,
    pub total_imports: usize,
    pub total_exports: usize,
    pub total_unused_imports: usize,
    pub circular_dependencies: usize,
    pub files_exceeding_threshold: usize,
    pub files_with_multiple_responsibilities: usize,
    pub skipped_files: usize,
    #[serde(flatten)]
    pub rankings: GraphSummary,
}

/// Combined result of analyzing a set of files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectReport {
    pub summary: ProjectSummary,
    pub files: Vec<FileReport>,
    pub cycles: Vec<CycleInfo>,
    pub graph: GraphView,
    /// Files that could not be read.
    pub skipped: Vec<String>,
}

impl ProjectReport {
    pub fn file(&self, path: &str) -> Option<&FileReport> {
        self.files.iter().find(|f| f.path() == path)
    }

    /// Every issue with the file it belongs to, most severe first.
    pub fn issues(&self) -> Vec<(&str, &Issue)> {
        let mut issues: Vec<(&str, &Issue)> = self
            .files
            .iter()
            .flat_map(|f| f.analysis.issues.iter().map(move |i| (f.path(), i)))
            .collect();
        issues.sort_by(|a, b| b.1.severity.cmp(&a.1.severity));
        issues
    }

    /// The `limit` highest-priority recommendations across all files.
    pub fn top_recommendations(&self, limit: usize) -> Vec<(&str, &Recommendation)> {
        let mut recommendations: Vec<(&str, &Recommendation)> = self
            .files
            .iter()
            .flat_map(|f| f.analysis.recommendations.iter().map(move |r| (f.path(), r)))
            .collect();
        recommendations.sort_by(|a, b| b.1.priority.cmp(&a.1.priority));
        recommendations.truncate(limit);
        recommendations
    }

    pub fn has_issues(&self) -> bool {
        self.files.iter().any(|f| !f.analysis.issues.is_empty())
    }
}

/// Combines per-file analyses with the graph-wide view.
///
/// Each file gets its resolved imports from the graph plus a high-severity
/// issue per cycle it is on and one break-cycle recommendation.
pub fn aggregate(
    analyses: &[&FileAnalysis],
    graph: &DependencyGraph,
    skipped: Vec<String>,
) -> ProjectReport {
    let cycles = graph.detect_cycles();
    let mut summary = ProjectSummary {
        skipped_files: skipped.len(),
        circular_dependencies: cycles.len(),
        rankings: graph.summary(),
        ..ProjectSummary::default()
    };

    let files: Vec<FileReport> = analyses
        .iter()
        .map(|&analysis| {
            let mut analysis = analysis.clone();
            if let Some(node) = graph.get_node(&analysis.file) {
                analysis.facts.imports = node.imports.clone();
            }

            let own_cycles: Vec<CycleInfo> = cycles
                .iter()
                .filter(|c| c.contains(&analysis.file))
                .cloned()
                .collect();
            for cycle in &own_cycles {
                analysis.issues.push(Issue::new(
                    IssueType::CircularDependency,
                    Severity::High,
                    format!("Circular dependency: {}", cycle.cycle_path()),
                    Location::file(&analysis.file),
                ));
            }
            if !own_cycles.is_empty() {
                analysis.recommendations.push(
                    Recommendation::new(
                        RecommendationType::BreakCycle,
                        8,
                        "Break the import cycle by extracting shared code or inverting a dependency",
                        Effort::Medium,
                    )
                    .with_benefits(&["Predictable module initialization", "Independent testing"])
                    .with_risks(&["Touches every file on the cycle"]),
                );
                analysis
                    .recommendations
                    .sort_by(|a, b| b.priority.cmp(&a.priority));
            }

            summary.total_files += 1;
            summary.total_imports += analysis.facts.imports.len();
            summary.total_exports += analysis.facts.exports.len();
            summary.total_unused_imports += analysis.unused_imports.len();
            if analysis.size.exceeds_threshold {
                summary.files_exceeding_threshold += 1;
            }
            if analysis.responsibilities.has_multiple_responsibilities {
                summary.files_with_multiple_responsibilities += 1;
            }

            FileReport {
                analysis,
                cycles: own_cycles,
            }
        })
        .collect();

    ProjectReport {
        summary,
        files,
        cycles,
        graph: graph.view(),
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::report::AnalysisSession;
    use crate::source::MemorySource;

    fn project(files: &[(&str, &str)]) -> ProjectReport {
        let source = files
            .iter()
            .fold(MemorySource::new(), |s, (path, text)| s.with_file(*path, *text));
        let mut session = AnalysisSession::with_source(source, AnalyzerConfig::default()).unwrap();
        session.analyze_project(files.iter().map(|(p, _)| Path::new(*p)))
    }

    #[test]
    fn test_cycle_issues_and_recommendation() {
        let report = project(&[
            ("/p/a.ts", "import { b } from './b';\nexport const a = () => b;\n"),
            ("/p/b.ts", "import { a } from './a';\nexport const b = () => a;\n"),
        ]);

        assert_eq!(report.summary.circular_dependencies, 1);
        assert_eq!(report.cycles[0].nodes, vec!["/p/a.ts", "/p/b.ts", "/p/a.ts"]);

        for file in &report.files {
            assert_eq!(file.cycles.len(), 1);
            assert!(file
                .analysis
                .issues
                .iter()
                .any(|i| i.kind == IssueType::CircularDependency && i.severity == Severity::High));
            assert_eq!(file.analysis.recommendations[0].kind, RecommendationType::BreakCycle);
        }
    }

    #[test]
    fn test_summary_totals() {
        let report = project(&[
            ("/p/main.ts", "import { helper } from './util';\nimport fs from 'fs';\nhelper();\n"),
            ("/p/util.ts", "export const helper = () => 1;\nexport const other = 2;\n"),
        ]);
        let summary = &report.summary;

        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.total_imports, 2);
        assert_eq!(summary.total_exports, 2);
        assert_eq!(summary.total_unused_imports, 1);
        assert_eq!(summary.circular_dependencies, 0);
        assert_eq!(summary.rankings.orphaned, vec!["/p/main.ts"]);
        assert_eq!(summary.rankings.most_imported[0].path, "/p/util.ts");

        let main = report.file("/p/main.ts").unwrap();
        assert_eq!(main.analysis.facts.imports[0].resolved.as_deref(), Some("/p/util.ts"));
        assert_eq!(main.analysis.unused_imports, vec!["fs from 'fs'"]);
    }

    #[test]
    fn test_skipped_files_do_not_abort() {
        let source = MemorySource::new().with_file("/p/a.ts", "export const a = 1;\n");
        let mut session = AnalysisSession::with_source(source, AnalyzerConfig::default()).unwrap();
        let report = session.analyze_project(["/p/a.ts", "/p/missing.ts"]);

        assert_eq!(report.summary.total_files, 1);
        assert_eq!(report.summary.skipped_files, 1);
        assert_eq!(report.skipped, vec!["/p/missing.ts"]);
    }

    #[test]
    fn test_issues_sorted_by_severity() {
        let report = project(&[
            ("/p/a.ts", "import { b } from './b';\nimport { z } from 'zod';\nexport const a = b;\n"),
            ("/p/b.ts", "import { a } from './a';\nexport const b = a;\n"),
        ]);
        let issues = report.issues();

        assert!(report.has_issues());
        assert_eq!(issues[0].1.severity, Severity::High);
        assert_eq!(issues.last().unwrap().1.kind, IssueType::UnusedImport);
        assert_eq!(report.top_recommendations(1)[0].1.kind, RecommendationType::BreakCycle);
    }

    #[test]
    fn test_empty_project() {
        let report = project(&[]);
        assert_eq!(report.summary, ProjectSummary::default());
        assert!(report.files.is_empty());
        assert!(report.graph.nodes.is_empty());
    }
}
