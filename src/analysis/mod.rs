//! Docstring coverage analysis.
//!
//! This module turns one file's source text into an ordered sequence of
//! undocumented-declaration records:
//!
//! ```text
//! ┌──────────────┐     ┌────────────────┐     ┌─────────────────────┐
//! │ Source text  │────▶│ PythonAnalyzer │────▶│ UndocumentedRecord  │
//! └──────────────┘     │ (tree-sitter)  │     │ (name + parameters) │
//!                      └────────────────┘     └─────────────────────┘
//! ```
//!
//! The analyzer is synchronous and pure in-memory: reading files and
//! persisting reports belong to the `runner` and `report` modules.

mod facts;
mod python;

pub use facts::{AnalysisError, DeclarationKind, Span, UndocumentedRecord};
pub use python::{DeclarationNode, Declarations, ParsedFile, PythonAnalyzer};

use once_cell::sync::OnceCell;

/// Static storage for the Python analyzer.
static PYTHON_ANALYZER: OnceCell<PythonAnalyzer> = OnceCell::new();

/// Get an analyzer for the given file extension (without dot).
///
/// Returns None for unsupported extensions; the batch driver uses this as
/// the file-type admission filter.
pub fn analyzer_for_extension(ext: &str) -> Option<&'static PythonAnalyzer> {
    match ext {
        "py" => Some(PYTHON_ANALYZER.get_or_init(PythonAnalyzer::new)),
        _ => None,
    }
}

/// Get all supported file extensions.
pub fn supported_extensions() -> &'static [&'static str] {
    &["py"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_lookup() {
        let analyzer = analyzer_for_extension("py");
        assert!(analyzer.is_some());
        assert_eq!(analyzer.unwrap().language_id(), "python");
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(analyzer_for_extension("rs").is_none());
        assert!(analyzer_for_extension("").is_none());
    }
}
