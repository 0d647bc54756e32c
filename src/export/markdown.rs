//! Markdown export implementation.
//!
//! Exports a project report in Markdown format for documentation and code review.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// Recommendations listed in the Markdown report.
const TOP_RECOMMENDATIONS: usize = 10;

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let report = &data.report;
        let summary = &report.summary;

        // Title
        writeln!(writer, "# Architecture Report")?;
        writeln!(writer)?;
        writeln!(writer, "**Project:** {}", data.project_name)?;
        writeln!(writer)?;

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Count |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Files | {} |", summary.total_files)?;
        writeln!(writer, "| Imports | {} |", summary.total_imports)?;
        writeln!(writer, "| Exports | {} |", summary.total_exports)?;
        writeln!(writer, "| Unused Imports | {} |", summary.total_unused_imports)?;
        writeln!(writer, "| Circular Dependencies | {} |", summary.circular_dependencies)?;
        writeln!(writer, "| Oversized Files | {} |", data.oversized_count())?;
        writeln!(
            writer,
            "| Files With Multiple Responsibilities | {} |",
            data.multi_responsibility_count()
        )?;
        if summary.skipped_files > 0 {
            writeln!(writer, "| Skipped Files | {} |", summary.skipped_files)?;
        }
        writeln!(writer)?;

        // Rankings
        if !summary.rankings.most_imported.is_empty() {
            writeln!(writer, "## Most Imported Files")?;
            writeln!(writer)?;
            writeln!(writer, "| File | Imported By |")?;
            writeln!(writer, "|------|-------------|")?;
            for entry in &summary.rankings.most_imported {
                writeln!(writer, "| {} | {} |", entry.path, entry.count)?;
            }
            writeln!(writer)?;
        }

        // Circular dependencies
        if !report.cycles.is_empty() {
            writeln!(writer, "## Circular Dependencies")?;
            writeln!(writer)?;
            for (i, cycle) in report.cycles.iter().enumerate() {
                writeln!(writer, "{}. `{}`", i + 1, cycle.cycle_path())?;
            }
            writeln!(writer)?;
        }

        // Oversized files
        let oversized: Vec<_> = report
            .files
            .iter()
            .filter(|f| f.analysis.size.exceeds_threshold)
            .collect();
        if !oversized.is_empty() {
            writeln!(writer, "## Oversized Files")?;
            writeln!(writer)?;
            writeln!(writer, "| File | Lines | Threshold | Suggested Split |")?;
            writeln!(writer, "|------|-------|-----------|-----------------|")?;
            for file in oversized {
                let size = &file.analysis.size;
                let split = size
                    .splits
                    .first()
                    .map(|s| s.kind.label())
                    .unwrap_or("-");
                writeln!(
                    writer,
                    "| {} | {} | {} | {} |",
                    file.path(),
                    size.line_count,
                    size.threshold,
                    split
                )?;
            }
            writeln!(writer)?;
        }

        // Mixed responsibilities
        let mixed: Vec<_> = report
            .files
            .iter()
            .filter(|f| f.analysis.responsibilities.has_multiple_responsibilities)
            .collect();
        if !mixed.is_empty() {
            writeln!(writer, "## Multiple Responsibilities")?;
            writeln!(writer)?;
            writeln!(writer, "| File | Responsibilities | Confidence |")?;
            writeln!(writer, "|------|------------------|------------|")?;
            for file in mixed {
                let result = &file.analysis.responsibilities;
                writeln!(
                    writer,
                    "| {} | {} | {:.2} |",
                    file.path(),
                    result.labels().join(", "),
                    result.confidence
                )?;
            }
            writeln!(writer)?;
        }

        // Unused imports
        let unused: Vec<_> = report
            .files
            .iter()
            .filter(|f| !f.analysis.unused_imports.is_empty())
            .collect();
        if !unused.is_empty() {
            writeln!(writer, "## Unused Imports")?;
            writeln!(writer)?;
            for file in unused {
                writeln!(
                    writer,
                    "- **{}**: {}",
                    file.path(),
                    file.analysis.unused_imports.join(", ")
                )?;
            }
            writeln!(writer)?;
        }

        // Recommendations
        let recommendations = report.top_recommendations(TOP_RECOMMENDATIONS);
        if !recommendations.is_empty() {
            writeln!(writer, "## Recommendations")?;
            writeln!(writer)?;
            writeln!(writer, "| Priority | File | Recommendation | Effort |")?;
            writeln!(writer, "|----------|------|----------------|--------|")?;
            for (file, rec) in recommendations {
                writeln!(
                    writer,
                    "| {} | {} | {} | {} |",
                    rec.priority,
                    file,
                    rec.description,
                    rec.effort.label()
                )?;
            }
            writeln!(writer)?;
        }

        if !report.skipped.is_empty() {
            writeln!(writer, "## Skipped Files")?;
            writeln!(writer)?;
            for path in &report.skipped {
                writeln!(writer, "- {}", path)?;
            }
            writeln!(writer)?;
        }

        // Footer
        writeln!(writer, "---")?;
        writeln!(writer, "*Generated by archscope*")?;

        Ok(())
    }
}
