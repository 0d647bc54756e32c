//! File size analysis.
//!
//! Counts effective lines (excluding blanks, comments and optionally
//! imports) and, for files over the threshold, proposes split strategies.
//!
//! # Example
//!
//! ```
//! use archscope::config::FileSizeConfig;
//! use archscope::size::SizeAdvisor;
//!
//! let text: String = (0..450).map(|i| format!("const line{} = {};\n", i, i)).collect();
//! let report = SizeAdvisor::new(FileSizeConfig::default()).analyze(&text, None, "big.ts");
//!
//! assert_eq!(report.line_count, 450);
//! assert!(report.exceeds_threshold);
//! assert!(report.splits[0].description.contains("450 lines"));
//! ```

mod advisor;
mod lines;
mod split;

pub use advisor::{SizeAdvisor, SizeReport};
pub use lines::{count_effective_lines, line_breakdown, LineBreakdown, LineKind};
pub use split::{suggest_splits, SplitKind, SplitStrategy};
