//! Export functionality for project reports.
//!
//! This module provides exporters for writing a [`ProjectReport`] in
//! various formats: JSON, Markdown and Graphviz DOT.

pub mod dot;
pub mod json;
pub mod markdown;

use crate::graph::DependencyGraph;
use crate::report::ProjectReport;
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON format - machine-readable, full report plus graph view
    Json,
    /// Markdown format - documentation/reporting
    Markdown,
    /// DOT format - the import graph for Graphviz
    Dot,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "dot" | "graphviz" => Ok(ExportFormat::Dot),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, markdown, dot",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
            ExportFormat::Dot => write!(f, "dot"),
        }
    }
}

/// Data container for export operations.
#[derive(Debug, Clone)]
pub struct ExportData {
    /// Project name, usually the analyzed directory's name
    pub project_name: String,
    /// The aggregated report
    pub report: ProjectReport,
    /// DOT rendering of the import graph
    pub dot: String,
}

impl ExportData {
    /// Create new export data from analysis results.
    pub fn new(
        project_name: impl Into<String>,
        report: ProjectReport,
        graph: &DependencyGraph,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            report,
            dot: graph.to_dot(),
        }
    }

    /// Files over the size threshold
    pub fn oversized_count(&self) -> usize {
        self.report.summary.files_exceeding_threshold
    }

    /// Files with more responsibilities than allowed
    pub fn multi_responsibility_count(&self) -> usize {
        self.report.summary.files_with_multiple_responsibilities
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(format: ExportFormat, data: &ExportData, writer: &mut W) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
        ExportFormat::Dot => dot::DotExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ExportData) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;

    use super::ExportData;
    use crate::config::AnalyzerConfig;
    use crate::report::AnalysisSession;
    use crate::source::MemorySource;

    /// A small project with one cycle, one unused import and one oversized file.
    pub fn sample_data() -> ExportData {
        let big: String = (0..30).map(|i| format!("const line{} = {};\n", i, i)).collect();
        let source = MemorySource::new()
            .with_file(
                "/app/src/a.ts",
                "import { b } from './b';\nimport { z } from 'zod';\nexport const a = () => b;\n",
            )
            .with_file("/app/src/b.ts", "import { a } from './a';\nexport const b = () => a;\n")
            .with_file("/app/src/big.ts", big);

        let mut config = AnalyzerConfig::default();
        config.size.threshold = 20;
        let mut session = AnalysisSession::with_source(source, config).unwrap();
        let report = session.analyze_directory(Path::new("/app"));
        ExportData::new("app", report, session.dependency_graph())
    }
}
