//! Data types produced by the docstring coverage analysis.

use std::fmt;

use thiserror::Error;

/// Errors raised by the per-file analysis.
///
/// Every variant is recoverable at file granularity: the batch driver logs
/// the error, records nothing for the file, and moves on.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The source text could not be parsed as valid Python.
    #[error("syntax error: could not parse {path}")]
    Syntax { path: String },
    /// The tree-sitter grammar could not be loaded (ABI mismatch).
    #[error("parser initialization failed: {0}")]
    Language(#[from] tree_sitter::LanguageError),
}

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
            end_line: end.row + 1,
            end_col: end.column + 1,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// Kind of declaration that can carry a docstring.
///
/// Closed set with exhaustive matching; anything else in the tree is not a
/// declaration as far as coverage is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Class,
    Function,
    AsyncFunction,
}

impl DeclarationKind {
    /// Convert to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Function => "function",
            DeclarationKind::AsyncFunction => "async function",
        }
    }

    /// Check if this is a callable (plain or async function).
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            DeclarationKind::Function | DeclarationKind::AsyncFunction
        )
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One undocumented declaration, as reported for a single file.
///
/// Immutable once produced by the analyzer. The packed wire form
/// (`name` or `name;p1,p2`) is applied only at the report boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndocumentedRecord {
    /// The declaration name.
    pub name: String,
    /// Ordered parameter names; always empty for classes.
    pub parameters: Vec<String>,
}

impl UndocumentedRecord {
    /// Record for a declaration without parameters.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    /// Record for a function-like declaration with its parameter names.
    pub fn with_parameters(name: impl Into<String>, parameters: Vec<String>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }
}
