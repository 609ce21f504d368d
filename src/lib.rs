//! Docsweep - docstring coverage checker.
//!
//! Docsweep scans Python source files for classes and functions whose body
//! does not open with a docstring, and aggregates the offenders into a
//! persisted JSON report.
//!
//! # Architecture
//!
//! The analysis is AST-backed via tree-sitter:
//!
//! - `analysis`: the core - parser adapter, pre-order declaration
//!   classifier, docstring presence check, parameter extraction
//! - `runner`: batch driver with per-file failure containment and
//!   configurable path redaction
//! - `report`: persisted report, packed-string wire codec, pretty output
//! - `cli`: command-line surface
//!
//! The core is synchronous and does no I/O: it maps one file's source
//! text to an ordered sequence of [`UndocumentedRecord`]s, or a contained
//! per-file error on unparsable input.

pub mod analysis;
pub mod cli;
pub mod report;
pub mod runner;

pub use analysis::{
    analyzer_for_extension, AnalysisError, DeclarationKind, DeclarationNode, Declarations,
    ParsedFile, PythonAnalyzer, Span, UndocumentedRecord,
};
pub use report::{decode_record, encode_record, Report, WriteMode};
pub use runner::{Redactor, Runner, REDACTED_USER};
