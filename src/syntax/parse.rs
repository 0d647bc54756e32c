//! Tree-sitter parsing shared by every analyzer.
//!
//! A file is parsed exactly once per analysis; the resulting
//! [`ParsedSource`] is handed to the import extractor, the usage scanner,
//! the responsibility classifier and the split detector.

use std::path::Path;

use thiserror::Error;
use tree_sitter::{Language, Node, Parser, Tree};

/// Errors that can occur during file analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read file: {path}")]
    FileRead { path: String },

    #[error("Failed to parse file: {path}")]
    ParseError { path: String },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Tree-sitter language initialization failed")]
    LanguageInit,
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Language type for file analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
}

impl SourceLanguage {
    /// Determine language from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(SourceLanguage::JavaScript),
            "jsx" => Some(SourceLanguage::Jsx),
            "ts" | "mts" | "cts" => Some(SourceLanguage::TypeScript),
            "tsx" => Some(SourceLanguage::Tsx),
            _ => None,
        }
    }

    /// Determine language from a file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Get tree-sitter language for this source language.
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            // the JavaScript grammar parses JSX natively
            SourceLanguage::JavaScript | SourceLanguage::Jsx => {
                tree_sitter_javascript::LANGUAGE.into()
            }
            SourceLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            SourceLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// A parsed file: the syntax tree plus the text it was parsed from.
pub struct ParsedSource<'a> {
    text: &'a str,
    tree: Tree,
    language: SourceLanguage,
}

impl<'a> ParsedSource<'a> {
    /// Root node of the syntax tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// The source text.
    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn language(&self) -> SourceLanguage {
        self.language
    }

    /// Source text covered by a node. Empty if the range is not valid UTF-8.
    pub fn node_text(&self, node: &Node) -> &'a str {
        node.utf8_text(self.text.as_bytes()).unwrap_or("")
    }

    /// True if tree-sitter had to recover from syntax errors.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }
}

/// Holds one tree-sitter parser per grammar.
pub struct SourceParser {
    js_parser: Parser,
    ts_parser: Parser,
    tsx_parser: Parser,
}

impl SourceParser {
    /// Create a new SourceParser.
    pub fn new() -> AnalysisResult<Self> {
        Ok(Self {
            js_parser: parser_for(SourceLanguage::JavaScript)?,
            ts_parser: parser_for(SourceLanguage::TypeScript)?,
            tsx_parser: parser_for(SourceLanguage::Tsx)?,
        })
    }

    /// Parse a file, picking the grammar from its extension.
    pub fn parse_file<'a>(
        &mut self,
        text: &'a str,
        path: &Path,
    ) -> AnalysisResult<ParsedSource<'a>> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let language = SourceLanguage::from_extension(ext)
            .ok_or_else(|| AnalysisError::UnsupportedFileType(ext.to_string()))?;
        self.parse(text, language, path)
    }

    /// Parse source code directly.
    pub fn parse<'a>(
        &mut self,
        text: &'a str,
        language: SourceLanguage,
        path: &Path,
    ) -> AnalysisResult<ParsedSource<'a>> {
        let parser = match language {
            SourceLanguage::JavaScript | SourceLanguage::Jsx => &mut self.js_parser,
            SourceLanguage::TypeScript => &mut self.ts_parser,
            SourceLanguage::Tsx => &mut self.tsx_parser,
        };

        let tree = parser.parse(text, None).ok_or_else(|| AnalysisError::ParseError {
            path: path.display().to_string(),
        })?;

        Ok(ParsedSource {
            text,
            tree,
            language,
        })
    }
}

fn parser_for(language: SourceLanguage) -> AnalysisResult<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&language.tree_sitter_language())
        .map_err(|_| AnalysisError::LanguageInit)?;
    Ok(parser)
}
