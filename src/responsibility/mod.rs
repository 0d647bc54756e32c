//! Heuristic classification of what a file is responsible for.
//!
//! The classifier walks a file's syntax tree once and scores nodes against
//! ten categories (UI rendering, data access, validation, ...). A category
//! is present when its indicators add up past a threshold; a file with more
//! present categories than allowed is flagged as having multiple
//! responsibilities.
//!
//! Keywords and confidences live in a [`HeuristicTable`], which can be
//! overridden from configuration.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use archscope::responsibility::ResponsibilityClassifier;
//! use archscope::syntax::SourceParser;
//!
//! let text = r#"
//! export function Patients() {
//!     const rows = supabase.from('patients').select();
//!     return <table>{rows}</table>;
//! }
//! "#;
//! let mut parser = SourceParser::new().unwrap();
//! let parsed = parser.parse_file(text, Path::new("Patients.tsx")).unwrap();
//!
//! let result = ResponsibilityClassifier::default().classify(&parsed, "Patients.tsx");
//! assert_eq!(result.labels(), vec!["UI Rendering", "Data Access"]);
//! ```

mod category;
mod classifier;
mod rules;

pub use category::{Category, ResponsibilityIndicator};
pub use classifier::{ResponsibilityClassifier, ResponsibilityResult};
pub use rules::{CategoryRule, HeuristicTable};
