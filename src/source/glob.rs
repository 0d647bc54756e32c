//! Include/exclude pattern matching on `/`-separated relative paths.
//!
//! Patterns are compiled with `globset` and a literal separator, so:
//!
//! - `**` matches any sequence of path segments (including none)
//! - `*` matches any run of characters except `/`
//! - `?` matches exactly one character except `/`
//! - `{a,b}` matches either alternative

use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};

fn build(pattern: &str) -> Result<Glob, globset::Error> {
    GlobBuilder::new(pattern).literal_separator(true).build()
}

/// A single compiled glob pattern.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    glob: Glob,
    matcher: GlobMatcher,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Result<Self, globset::Error> {
        let glob = build(pattern)?;
        let matcher = glob.compile_matcher();
        Ok(Self { glob, matcher })
    }

    /// Returns true if the `/`-separated path matches the pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    /// The original pattern text.
    pub fn as_str(&self) -> &str {
        self.glob.glob()
    }
}

/// A group of patterns matched in one pass.
#[derive(Debug, Clone)]
pub struct PatternSet {
    set: GlobSet,
}

impl PatternSet {
    /// Compiles `patterns`, dropping (and logging) any that are invalid.
    pub fn compile(patterns: &[String]) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            match build(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => tracing::warn!("Ignoring invalid glob pattern {}: {}", pattern, e),
            }
        }

        let set = builder.build().unwrap_or_else(|e| {
            tracing::warn!("Failed to build glob set: {}", e);
            GlobSet::empty()
        });
        Self { set }
    }

    /// True when no pattern was compiled.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Returns true if any pattern matches the path.
    pub fn matches(&self, path: &str) -> bool {
        self.set.is_match(path)
    }
}
