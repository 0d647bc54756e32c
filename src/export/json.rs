//! JSON export implementation.
//!
//! Exports the full project report, including the node/edge graph view, for
//! machine-readable output.

use super::{ExportData, Exporter};
use crate::graph::GraphView;
use crate::report::{FileReport, ProjectSummary};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable cycle info for JSON output.
#[derive(Serialize)]
struct JsonCycle<'a> {
    files: &'a [String],
    path: String,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    project: &'a str,
    summary: &'a ProjectSummary,
    files: &'a [FileReport],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    circular_dependencies: Vec<JsonCycle<'a>>,
    graph: &'a GraphView,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<String>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let report = &data.report;
        let circular_dependencies = report
            .cycles
            .iter()
            .map(|c| JsonCycle {
                files: c.files(),
                path: c.cycle_path(),
            })
            .collect();

        let export = JsonExport {
            project: &data.project_name,
            summary: &report.summary,
            files: &report.files,
            circular_dependencies,
            graph: &report.graph,
            skipped: report.skipped.clone(),
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::sample_data;

    fn export_json() -> serde_json::Value {
        let mut output = Vec::new();
        JsonExporter.export(&sample_data(), &mut output).unwrap();
        serde_json::from_slice(&output).unwrap()
    }

    #[test]
    fn test_json_export_structure() {
        let json = export_json();

        assert_eq!(json["project"], "app");
        assert_eq!(json["summary"]["total_files"], 3);
        assert_eq!(json["summary"]["circular_dependencies"], 1);
        assert_eq!(json["summary"]["files_exceeding_threshold"], 1);
        assert!(json["skipped"].is_null());
    }

    #[test]
    fn test_json_export_cycles() {
        let json = export_json();
        let cycle = &json["circular_dependencies"][0];

        assert_eq!(cycle["files"].as_array().unwrap().len(), 2);
        assert_eq!(cycle["path"], "/app/src/a.ts -> /app/src/b.ts -> /app/src/a.ts");
    }

    #[test]
    fn test_json_export_files_and_graph() {
        let json = export_json();
        let files = json["files"].as_array().unwrap();
        let a = files.iter().find(|f| f["file"] == "/app/src/a.ts").unwrap();

        assert_eq!(a["imports"][0]["resolved"], "/app/src/b.ts");
        assert_eq!(a["unused_imports"][0], "z from 'zod'");
        assert!(a["issues"]
            .as_array()
            .unwrap()
            .iter()
            .any(|i| i["type"] == "circular-dependency" && i["severity"] == "high"));

        assert_eq!(json["graph"]["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(json["graph"]["edges"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_json_summary_rankings_are_flattened() {
        let json = export_json();
        assert!(json["summary"]["orphaned"].is_array());
        assert!(json["summary"]["most_imported"].is_array());
    }
}
