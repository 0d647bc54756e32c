//! Effective line counting.
//!
//! Lines are classified by a two-state machine (normal code / inside a block
//! comment). Block comments may open and close on the same line, and code
//! after a closing `*/` makes the line a code line again.

use serde::Serialize;

use crate::config::FileSizeConfig;

/// What a physical line holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    /// `import ...` or a single-line re-export (`export { a } from './a'`).
    Import,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InBlockComment,
}

/// Per-kind line counts of a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineBreakdown {
    pub total: usize,
    pub blank: usize,
    pub comment: usize,
    pub import: usize,
    pub code: usize,
    /// Lines that count toward the size threshold.
    pub effective: usize,
}

/// Counts the lines that remain after the configured exclusions.
///
/// # Example
///
/// ```
/// use archscope::config::FileSizeConfig;
/// use archscope::size::count_effective_lines;
///
/// let text = "// header\n\n/* block\n   comment */\nconst a = 1;\n";
/// assert_eq!(count_effective_lines(text, &FileSizeConfig::default()), 1);
/// ```
pub fn count_effective_lines(text: &str, config: &FileSizeConfig) -> usize {
    line_breakdown(text, config).effective
}

/// Classifies every line and applies the configured exclusions.
pub fn line_breakdown(text: &str, config: &FileSizeConfig) -> LineBreakdown {
    let mut breakdown = LineBreakdown::default();
    let mut state = State::Normal;

    for line in text.lines() {
        let kind = classify_line(line, &mut state);
        breakdown.total += 1;

        let excluded = match kind {
            LineKind::Blank => {
                breakdown.blank += 1;
                config.exclude_empty_lines
            }
            LineKind::Comment => {
                breakdown.comment += 1;
                config.exclude_comments
            }
            LineKind::Import => {
                breakdown.import += 1;
                config.exclude_imports
            }
            LineKind::Code => {
                breakdown.code += 1;
                false
            }
        };
        if !excluded {
            breakdown.effective += 1;
        }
    }

    breakdown
}

fn classify_line(line: &str, state: &mut State) -> LineKind {
    let mut rest = line.trim();
    let mut saw_comment = false;

    loop {
        if *state == State::InBlockComment {
            match rest.find("*/") {
                Some(end) => {
                    *state = State::Normal;
                    rest = rest[end + 2..].trim_start();
                    saw_comment = true;
                }
                None => return LineKind::Comment,
            }
        }

        if rest.is_empty() {
            return if saw_comment {
                LineKind::Comment
            } else {
                LineKind::Blank
            };
        }
        if is_line_comment(rest) {
            return LineKind::Comment;
        }
        if let Some(body) = rest.strip_prefix("/*") {
            *state = State::InBlockComment;
            rest = body;
            saw_comment = true;
            continue;
        }
        break;
    }

    if ends_inside_block(rest) {
        *state = State::InBlockComment;
    }
    if is_import_line(rest) {
        LineKind::Import
    } else {
        LineKind::Code
    }
}

/// `//`, `*` (doc-comment body) and `#` comments or shebangs.
fn is_line_comment(line: &str) -> bool {
    if line.starts_with("//") || line.starts_with('*') {
        return true;
    }
    // `#private` class fields are code
    match line.strip_prefix('#') {
        Some(after) => {
            after.is_empty() || after.starts_with(|c: char| c == '!' || c.is_whitespace())
        }
        None => false,
    }
}

fn is_import_line(line: &str) -> bool {
    if line.starts_with("import ")
        || line.starts_with("import{")
        || line.starts_with("import'")
        || line.starts_with("import\"")
    {
        return true;
    }
    line.starts_with("export ")
        && (line.contains(" from '") || line.contains(" from \""))
        && (line.contains('{') || line.contains('*'))
}

/// True if a code segment leaves an unclosed `/*` behind, ignoring quoted text.
fn ends_inside_block(code: &str) -> bool {
    let bytes = code.as_bytes();
    let mut quote: Option<u8> = None;
    let mut in_block = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();

        if in_block {
            if b == b'*' && next == Some(b'/') {
                in_block = false;
                i += 2;
            } else {
                i += 1;
            }
            continue;
        }
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match (b, next) {
            (b'"' | b'\'' | b'`', _) => quote = Some(b),
            (b'/', Some(b'/')) => return false,
            (b'/', Some(b'*')) => {
                in_block = true;
                i += 2;
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    in_block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<LineKind> {
        let mut state = State::Normal;
        text.lines().map(|l| classify_line(l, &mut state)).collect()
    }

    use LineKind::*;

    #[test]
    fn test_blank_and_line_comments() {
        assert_eq!(
            kinds("\n   \n// a\n# b\n#!/usr/bin/env node\n * c\nx();"),
            vec![Blank, Blank, Comment, Comment, Comment, Comment, Code]
        );
    }

    #[test]
    fn test_private_field_is_code() {
        assert_eq!(kinds("#count = 0;"), vec![Code]);
    }

    #[test]
    fn test_block_comment_across_lines() {
        assert_eq!(
            kinds("/*\n  inside\n  more\n*/\nconst a = 1;"),
            vec![Comment, Comment, Comment, Comment, Code]
        );
    }

    #[test]
    fn test_block_comment_same_line() {
        assert_eq!(kinds("/* note */"), vec![Comment]);
        assert_eq!(kinds("/* note */ const a = 1;"), vec![Code]);
        assert_eq!(kinds("/* a */ /* b */"), vec![Comment]);
    }

    #[test]
    fn test_code_after_close_marker() {
        assert_eq!(
            kinds("/* start\nend */ const b = 2;\nconst c = 3;"),
            vec![Comment, Code, Code]
        );
    }

    #[test]
    fn test_block_opened_after_code() {
        assert_eq!(
            kinds("const a = 1; /* trailing\nstill comment */\nconst b = 2;"),
            vec![Code, Comment, Code]
        );
    }

    #[test]
    fn test_comment_markers_inside_strings() {
        assert_eq!(
            kinds("const glob = '**/*.ts';\nconst b = 2;"),
            vec![Code, Code]
        );
        assert_eq!(kinds("const url = 'http://x';"), vec![Code]);
    }

    #[test]
    fn test_import_lines() {
        assert_eq!(
            kinds("import React from 'react';\nimport './a.css';\nexport * from './types';\nexport { a } from \"./a\";\nexport const from = 1;"),
            vec![Import, Import, Import, Import, Code]
        );
    }

    #[test]
    fn test_breakdown_respects_config() {
        let text = "import a from 'a';\n\n// c\nconst x = 1;\n";

        let defaults = line_breakdown(text, &FileSizeConfig::default());
        assert_eq!(defaults.total, 4);
        assert_eq!(defaults.effective, 2);

        let keep_all = FileSizeConfig {
            exclude_comments: false,
            exclude_empty_lines: false,
            ..FileSizeConfig::default()
        };
        assert_eq!(count_effective_lines(text, &keep_all), 4);

        let no_imports = FileSizeConfig {
            exclude_imports: true,
            ..FileSizeConfig::default()
        };
        assert_eq!(count_effective_lines(text, &no_imports), 1);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(line_breakdown("", &FileSizeConfig::default()), LineBreakdown::default());
    }
}
