//! Batch driver that turns a list of files into an aggregated report.
//!
//! Each file is read and analyzed independently; a file that fails to
//! parse is logged and skipped, never fatal to the batch. Files are
//! processed sequentially in the order given, so the resulting report is
//! deterministic for a fixed file list.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use colored::*;

use crate::analysis::analyzer_for_extension;
use crate::report::Report;

/// Fixed placeholder substituted for a redacted path segment.
pub const REDACTED_USER: &str = "<username>";

/// Replacement table applied to file paths before they are persisted.
///
/// Redaction is explicit configuration: the caller decides which tokens
/// (typically a local username) are replaced, rather than the tool
/// consulting the invoking user's OS identity.
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    rules: Vec<(String, String)>,
}

impl Redactor {
    /// A redactor with no rules; paths pass through unchanged.
    pub fn none() -> Self {
        Self::default()
    }

    /// A redactor with a single token -> placeholder rule.
    pub fn replace(token: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self::none().with_rule(token, placeholder)
    }

    /// Add a token -> placeholder rule.
    pub fn with_rule(
        mut self,
        token: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        self.rules.push((token.into(), placeholder.into()));
        self
    }

    /// Apply every rule to a path string.
    pub fn apply(&self, path: &str) -> String {
        let mut out = path.to_string();
        for (token, placeholder) in &self.rules {
            out = out.replace(token, placeholder);
        }
        out
    }
}

/// Executes the docstring analysis over a set of files.
pub struct Runner {
    redactor: Redactor,
    quiet: bool,
}

impl Runner {
    /// Create a new runner with no redaction.
    pub fn new() -> Self {
        Self {
            redactor: Redactor::none(),
            quiet: false,
        }
    }

    /// Set the path redactor.
    pub fn redactor(mut self, redactor: Redactor) -> Self {
        self.redactor = redactor;
        self
    }

    /// Suppress the per-file progress line.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Analyze every file and aggregate the results into a report.
    ///
    /// Unreadable or unparsable files are logged to stderr and recorded
    /// nowhere; the batch always completes.
    pub fn run(&self, files: &[PathBuf]) -> anyhow::Result<Report> {
        let analyzer = analyzer_for_extension("py").context("python analyzer unavailable")?;
        let mut report = Report::new();

        for file in files {
            if !self.quiet {
                println!("{} {}", "Checking:".dimmed(), file.display());
            }

            let source = match fs::read(file) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Warning: cannot read {}: {}", file.display(), e);
                    continue;
                }
            };

            match analyzer.analyze_source(file, &source) {
                Ok(records) => {
                    let path = self.redactor.apply(&file.to_string_lossy());
                    report.insert(path, records);
                }
                Err(e) => {
                    eprintln!("Warning: {}", e);
                }
            }
        }

        Ok(report)
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_redactor_replaces_token() {
        let redactor = Redactor::replace("alice", REDACTED_USER);
        assert_eq!(
            redactor.apply("/home/alice/project/a.py"),
            "/home/<username>/project/a.py"
        );
        assert_eq!(redactor.apply("/srv/project/a.py"), "/srv/project/a.py");
    }

    #[test]
    fn test_redactor_none_passes_through() {
        let redactor = Redactor::none();
        assert_eq!(redactor.apply("/home/alice/a.py"), "/home/alice/a.py");
    }

    #[test]
    fn test_run_aggregates_per_file_records() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("good.py");
        std::fs::write(&good, "def f(x):\n    pass\n").unwrap();
        let documented = temp.path().join("documented.py");
        std::fs::write(&documented, "def g():\n    \"\"\"doc\"\"\"\n").unwrap();

        let report = Runner::new()
            .quiet(true)
            .run(&[good.clone(), documented.clone()])
            .unwrap();

        assert_eq!(report.file_count(), 2);
        let records = report.records_for(&good.to_string_lossy()).unwrap();
        assert_eq!(records[0].name, "f");
        assert!(report
            .records_for(&documented.to_string_lossy())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_parse_failure_skips_file_and_continues() {
        let temp = TempDir::new().unwrap();
        let broken = temp.path().join("broken.py");
        std::fs::write(&broken, "def f(:\n").unwrap();
        let good = temp.path().join("good.py");
        std::fs::write(&good, "class Foo:\n    pass\n").unwrap();

        let report = Runner::new()
            .quiet(true)
            .run(&[broken.clone(), good.clone()])
            .unwrap();

        // The broken file has no entry at all; the good one is analyzed.
        assert!(report.records_for(&broken.to_string_lossy()).is_none());
        assert_eq!(
            report.records_for(&good.to_string_lossy()).unwrap()[0].name,
            "Foo"
        );
    }

    #[test]
    fn test_missing_file_skipped() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.py");

        let report = Runner::new().quiet(true).run(&[missing]).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_redaction_applied_to_report_keys() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("alice");
        std::fs::create_dir(&dir).unwrap();
        let file = dir.join("a.py");
        std::fs::write(&file, "def f():\n    pass\n").unwrap();

        let report = Runner::new()
            .quiet(true)
            .redactor(Redactor::replace("alice", REDACTED_USER))
            .run(&[file])
            .unwrap();

        let (path, _) = report.files().next().unwrap();
        assert!(path.contains("<username>"));
        assert!(!path.contains("alice"));
    }
}
