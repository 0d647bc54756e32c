//! Read and scan capabilities consumed by the analyzers.
//!
//! The engine never touches the filesystem directly. It asks a
//! [`SourceAccess`] implementation for file text and for directory listings,
//! and both calls report failure as an absent/empty result.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::glob::PatternSet;

/// Options for directory scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Glob patterns a file must match (relative to the scan root).
    pub include: Vec<String>,
    /// Glob patterns that remove a file from the result.
    pub exclude: Vec<String>,
    /// Maximum directory depth below the root.
    pub max_depth: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include: ["**/*.ts", "**/*.tsx", "**/*.js", "**/*.jsx", "**/*.mjs", "**/*.cjs"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude: [
                "**/node_modules/**",
                "**/.git/**",
                "**/dist/**",
                "**/build/**",
                "**/.next/**",
                "**/coverage/**",
                "**/*.d.ts",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_depth: 32,
        }
    }
}

/// Source of file text and directory listings.
///
/// Implementations must not panic or return errors: a file that cannot be
/// read is `None`, a directory that cannot be walked yields no paths.
pub trait SourceAccess {
    /// Returns the full text of the file, or `None` if it cannot be read.
    fn read(&self, path: &Path) -> Option<String>;

    /// Lists files below `root` matching the options, in a stable order.
    fn scan(&self, root: &Path, options: &ScanOptions) -> Vec<PathBuf>;
}

/// [`SourceAccess`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl SourceAccess for FsSource {
    fn read(&self, path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    fn scan(&self, root: &Path, options: &ScanOptions) -> Vec<PathBuf> {
        let include = PatternSet::compile(&options.include);
        let exclude = PatternSet::compile(&options.exclude);

        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .max_depth(options.max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_ignored_dir(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let relative = relative_key(root, e.path());
                let keep = (include.is_empty() || include.matches(&relative))
                    && !exclude.matches(&relative);
                keep.then(|| e.into_path())
            })
            .collect();

        files.sort();
        debug!("Scanned {} files under {}", files.len(), root.display());
        files
    }
}

/// In-memory [`SourceAccess`] that counts reads.
///
/// Useful for embedding the engine where files never hit the disk, and for
/// checking that cached results are served without re-reading.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: BTreeMap<PathBuf, String>,
    reads: Cell<usize>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a file.
    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }

    /// Builder-style variant of [`MemorySource::insert`].
    pub fn with_file(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    /// Number of `read` calls served so far, including misses.
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }
}

impl SourceAccess for MemorySource {
    fn read(&self, path: &Path) -> Option<String> {
        self.reads.set(self.reads.get() + 1);
        self.files.get(path).cloned()
    }

    fn scan(&self, root: &Path, options: &ScanOptions) -> Vec<PathBuf> {
        let include = PatternSet::compile(&options.include);
        let exclude = PatternSet::compile(&options.exclude);

        self.files
            .keys()
            .filter(|p| p.starts_with(root))
            .filter(|p| {
                let depth = p.strip_prefix(root).map(|r| r.components().count()).unwrap_or(0);
                depth <= options.max_depth
            })
            .filter(|p| {
                let relative = relative_key(root, p);
                (include.is_empty() || include.matches(&relative))
                    && !exclude.matches(&relative)
            })
            .cloned()
            .collect()
    }
}

/// Path of `path` relative to `root`, with `/` separators, for glob matching.
fn relative_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Check if a directory should be skipped before pattern matching.
fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    matches!(name.as_ref(), "node_modules" | ".git")
}
