use serde::Serialize;

use super::lines::{line_breakdown, LineBreakdown};
use super::split::{suggest_splits, SplitStrategy};
use crate::config::FileSizeConfig;
use crate::report::{
    Effort, Issue, IssueType, Location, Recommendation, RecommendationType, Severity,
};
use crate::syntax::ParsedSource;

/// Size verdict for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeReport {
    pub file: String,
    /// Effective line count.
    pub line_count: usize,
    pub breakdown: LineBreakdown,
    pub threshold: usize,
    pub exceeds_threshold: bool,
    /// Empty unless the threshold is exceeded.
    pub splits: Vec<SplitStrategy>,
    pub issues: Vec<Issue>,
    pub recommendations: Vec<Recommendation>,
}

/// Flags files above the effective-line threshold and proposes splits.
#[derive(Debug, Clone, Default)]
pub struct SizeAdvisor {
    config: FileSizeConfig,
}

impl SizeAdvisor {
    pub fn new(config: FileSizeConfig) -> Self {
        Self { config }
    }

    pub fn threshold(&self) -> usize {
        self.config.threshold
    }

    /// Analyzes one file. `parsed` is optional: without it only the generic
    /// split can be suggested.
    pub fn analyze(&self, text: &str, parsed: Option<&ParsedSource<'_>>, file: &str) -> SizeReport {
        let breakdown = line_breakdown(text, &self.config);
        let line_count = breakdown.effective;
        let threshold = self.config.threshold;
        let exceeds_threshold = line_count > threshold;

        let mut report = SizeReport {
            file: file.to_string(),
            line_count,
            breakdown,
            threshold,
            exceeds_threshold,
            splits: Vec::new(),
            issues: Vec::new(),
            recommendations: Vec::new(),
        };
        if !exceeds_threshold {
            return report;
        }

        report.splits = suggest_splits(parsed, file, line_count, threshold);

        let severity = if line_count > threshold * 2 {
            Severity::High
        } else {
            Severity::Medium
        };
        report.issues.push(Issue::new(
            IssueType::FileTooLarge,
            severity,
            format!(
                "File has {} effective lines (threshold {})",
                line_count, threshold
            ),
            Location::file(file),
        ));

        let effort = report
            .splits
            .first()
            .map(|s| s.effort)
            .unwrap_or(Effort::Medium);
        let plan = report
            .splits
            .iter()
            .map(|s| s.kind.label())
            .collect::<Vec<_>>()
            .join(", ");
        report.recommendations.push(
            Recommendation::new(
                RecommendationType::SplitFile,
                7,
                format!("Split the file ({})", plan),
                effort,
            )
            .with_benefits(&["Smaller review surface", "Easier navigation", "Focused tests"])
            .with_risks(&["Import paths change for callers"]),
        );

        report
    }
}
