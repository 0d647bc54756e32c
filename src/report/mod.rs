//! Findings, sessions and project reports.
//!
//! [`AnalysisSession`] runs every per-file analyzer over a single parse,
//! caches the results and keeps the import graph up to date. Batch calls
//! produce a [`ProjectReport`] that merges per-file results with the
//! graph-wide cycles and rankings.
//!
//! # Example
//!
//! ```
//! use archscope::config::AnalyzerConfig;
//! use archscope::report::AnalysisSession;
//! use archscope::source::MemorySource;
//!
//! let source = MemorySource::new()
//!     .with_file("/app/a.ts", "import { b } from './b';\nexport const a = b;\n")
//!     .with_file("/app/b.ts", "import { a } from './a';\nexport const b = a;\n");
//!
//! let mut session = AnalysisSession::with_source(source, AnalyzerConfig::default())?;
//! let report = session.analyze_project(["/app/a.ts", "/app/b.ts"]);
//!
//! assert_eq!(report.summary.circular_dependencies, 1);
//! # Ok::<(), archscope::syntax::AnalysisError>(())
//! ```

mod aggregate;
mod findings;
mod session;

pub use aggregate::{aggregate, FileReport, ProjectReport, ProjectSummary};
pub use findings::{
    Effort, Issue, IssueType, Location, Recommendation, RecommendationType, Severity,
};
pub use session::{analyze_file, AnalysisSession, DependencyResult, FileAnalysis, SourceFile};
