//! Issues and recommendations produced by the analyzers.

use serde::Serialize;

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// What kind of problem an issue describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    /// The file is part of an import cycle.
    CircularDependency,
    /// Imported names are never referenced.
    UnusedImport,
    /// More categories present than allowed.
    MultipleResponsibilities,
    /// A combination of categories that should live apart (e.g. UI + data access).
    MixedConcerns,
    /// Effective line count above the size threshold.
    FileTooLarge,
    /// The file could not be parsed at all.
    ParseFailure,
    /// The parser had to recover from syntax errors.
    SyntaxErrors,
}

impl IssueType {
    pub fn label(&self) -> &'static str {
        match self {
            IssueType::CircularDependency => "circular-dependency",
            IssueType::UnusedImport => "unused-import",
            IssueType::MultipleResponsibilities => "multiple-responsibilities",
            IssueType::MixedConcerns => "mixed-concerns",
            IssueType::FileTooLarge => "file-too-large",
            IssueType::ParseFailure => "parse-failure",
            IssueType::SyntaxErrors => "syntax-errors",
        }
    }
}

/// Where an issue was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl Location {
    /// A whole-file location.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            file: path.into(),
            line: None,
            column: None,
        }
    }

    /// A location at a 1-indexed line and column.
    pub fn at(path: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: path.into(),
            line: Some(line),
            column: Some(column),
        }
    }
}

/// A problem found in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueType,
    pub severity: Severity,
    pub description: String,
    pub location: Location,
}

impl Issue {
    pub fn new(
        kind: IssueType,
        severity: Severity,
        description: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            kind,
            severity,
            description: description.into(),
            location,
        }
    }
}

/// Rough cost of acting on a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    pub fn label(&self) -> &'static str {
        match self {
            Effort::Low => "low",
            Effort::Medium => "medium",
            Effort::High => "high",
        }
    }
}

/// What a recommendation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationType {
    RemoveUnusedImports,
    BreakCycle,
    SplitFile,
    /// Move one responsibility category into its own module.
    ExtractResponsibility,
}

/// A suggested change, ranked by priority (higher first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub priority: u8,
    pub description: String,
    pub effort: Effort,
    pub benefits: Vec<String>,
    pub risks: Vec<String>,
}

impl Recommendation {
    pub fn new(
        kind: RecommendationType,
        priority: u8,
        description: impl Into<String>,
        effort: Effort,
    ) -> Self {
        Self {
            kind,
            priority,
            description: description.into(),
            effort,
            benefits: Vec::new(),
            risks: Vec::new(),
        }
    }

    pub fn with_benefits(mut self, benefits: &[&str]) -> Self {
        self.benefits = benefits.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_risks(mut self, risks: &[&str]) -> Self {
        self.risks = risks.iter().map(|s| s.to_string()).collect();
        self
    }
}
