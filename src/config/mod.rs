//! Analyzer configuration.
//!
//! Configuration is read from an optional `archscope.toml` in the project
//! root. Every section and field is optional; missing values fall back to
//! the defaults below.
//!
//! # Configuration Format
//!
//! ```toml
//! [dependencies]
//! max_circular_depth = 10
//! exclude_patterns = ["**/generated/**"]
//! include_external_deps = false
//! unused_import_threshold = 0
//!
//! [size]
//! threshold = 400
//! exclude_comments = true
//! exclude_empty_lines = true
//! exclude_imports = false
//!
//! [responsibilities]
//! max_responsibilities = 2
//! enable_heuristics = true
//! strict_mode = false
//!
//! [scan]
//! include = ["**/*.ts", "**/*.tsx"]
//! exclude = ["**/node_modules/**"]
//! max_depth = 32
//!
//! [heuristics.data_access]
//! confidence = 0.9
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::responsibility::HeuristicTable;
use crate::source::ScanOptions;

/// File name looked up in the project root by [`AnalyzerConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "archscope.toml";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML or has fields of the wrong type.
    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// The values parsed but make no sense together.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Options for the dependency graph builder.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    /// Longest import chain followed while looking for cycles.
    pub max_circular_depth: usize,
    /// Glob patterns for files left out of the graph.
    pub exclude_patterns: Vec<String>,
    /// Add unresolved package imports to the graph as external nodes.
    pub include_external_deps: bool,
    /// Unused imports tolerated before an issue is raised.
    pub unused_import_threshold: usize,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            max_circular_depth: 10,
            exclude_patterns: Vec::new(),
            include_external_deps: false,
            unused_import_threshold: 0,
        }
    }
}

/// Options for the size advisor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileSizeConfig {
    /// Effective line count above which a file is flagged.
    pub threshold: usize,
    pub exclude_comments: bool,
    pub exclude_empty_lines: bool,
    pub exclude_imports: bool,
}

impl Default for FileSizeConfig {
    fn default() -> Self {
        Self {
            threshold: 400,
            exclude_comments: true,
            exclude_empty_lines: true,
            exclude_imports: false,
        }
    }
}

/// Options for the responsibility classifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResponsibilityConfig {
    /// Number of present categories a file may have before it is flagged.
    pub max_responsibilities: usize,
    /// Enable the name-based predicates (handlers, utilities, configuration).
    pub enable_heuristics: bool,
    /// Use the stricter presence threshold from the heuristic table.
    pub strict_mode: bool,
}

impl Default for ResponsibilityConfig {
    fn default() -> Self {
        Self {
            max_responsibilities: 2,
            enable_heuristics: true,
            strict_mode: false,
        }
    }
}

/// Complete analyzer configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub dependencies: DependencyConfig,
    pub size: FileSizeConfig,
    pub responsibilities: ResponsibilityConfig,
    pub heuristics: HeuristicTable,
    pub scan: ScanOptions,
}

impl AnalyzerConfig {
    /// Parses configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AnalyzerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads `archscope.toml` from `root` if it exists, otherwise returns defaults.
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, root.display());
            Ok(Self::default())
        }
    }

    /// Checks the values that would make the analyzers misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size.threshold == 0 {
            return Err(ConfigError::Invalid(
                "size.threshold must be greater than 0".to_string(),
            ));
        }
        if self.dependencies.max_circular_depth < 2 {
            return Err(ConfigError::Invalid(
                "dependencies.max_circular_depth must be at least 2".to_string(),
            ));
        }
        self.heuristics.validate().map_err(ConfigError::Invalid)
    }
}
