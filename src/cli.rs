//! Command-line interface for docsweep.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::*;
use walkdir::WalkDir;

use crate::analysis;
use crate::report::{self, Report, WriteMode};
use crate::runner::{Redactor, Runner, REDACTED_USER};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FOUND: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Docstring coverage checker - find undocumented Python declarations.
///
/// Docsweep parses Python source files, walks every class and function
/// definition (nested ones included), and reports those whose body does
/// not open with a docstring. Results are aggregated into a JSON report
/// keyed by file path.
#[derive(Parser)]
#[command(name = "docsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a file or directory and write the coverage report
    #[command(visible_alias = "check")]
    Scan(ScanArgs),
    /// Pretty-print a previously written report
    Show(ShowArgs),
}

/// Arguments for the scan command.
#[derive(Parser)]
pub struct ScanArgs {
    /// Path to scan (file or directory); prompted for when omitted
    pub path: Option<PathBuf>,

    /// Report output path (default: <project>.json in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write mode when the report already exists: replace or merge
    #[arg(short, long, default_value = "replace")]
    pub mode: String,

    /// Token to replace with "<username>" in persisted paths
    #[arg(long)]
    pub redact: Option<String>,

    /// Print the report after writing it
    #[arg(short, long)]
    pub print: bool,

    /// Suppress per-file progress output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the show command.
#[derive(Parser)]
pub struct ShowArgs {
    /// Path to the report JSON file
    pub report: PathBuf,
}

/// Prompt for a path on stdin, stripping surrounding quotes.
fn prompt_for_path() -> anyhow::Result<PathBuf> {
    print!("Please enter the path to the file or folder you'd like to check: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let trimmed = line.trim().trim_matches('"').trim_matches('\'').trim();
    anyhow::ensure!(!trimmed.is_empty(), "no path entered");
    Ok(PathBuf::from(trimmed))
}

/// Collect eligible files under a directory.
///
/// Admission is by extension: only files a registered analyzer handles.
/// Hidden directories are skipped; results are sorted for deterministic
/// report ordering.
pub fn collect_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !(e.file_type().is_dir() && name.starts_with('.'))
        })
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            let ext = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("");
            if analysis::analyzer_for_extension(ext).is_some() {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Project name: the basename of the scanned path.
pub fn project_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "report".to_string())
}

/// Default report location: `<project>.json` in the current directory.
fn default_report_path(scanned: &Path) -> PathBuf {
    PathBuf::from(format!("{}.json", project_name(scanned)))
}

/// Run the scan command.
pub fn run_scan(args: &ScanArgs) -> anyhow::Result<i32> {
    let mode = match args.mode.as_str() {
        "replace" => WriteMode::Replace,
        "merge" => WriteMode::Merge,
        other => {
            eprintln!(
                "Error: invalid mode {:?}, must be 'replace' or 'merge'",
                other
            );
            return Ok(EXIT_ERROR);
        }
    };

    let path = match &args.path {
        Some(p) => p.clone(),
        None => match prompt_for_path() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Error: {}", e);
                return Ok(EXIT_ERROR);
            }
        },
    };

    let metadata = match std::fs::metadata(&path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", path, e);
            return Ok(EXIT_ERROR);
        }
    };

    // The suffix filter applies to directory iteration only; a file named
    // explicitly is analyzed as given.
    let files = if metadata.is_dir() {
        collect_files(&path)?
    } else {
        vec![path.clone()]
    };

    if files.is_empty() {
        eprintln!("Warning: no Python files to scan");
        return Ok(EXIT_SUCCESS);
    }

    let redactor = match &args.redact {
        Some(token) => Redactor::replace(token, REDACTED_USER),
        None => Redactor::none(),
    };

    let result = Runner::new()
        .redactor(redactor)
        .quiet(args.quiet)
        .run(&files)?;

    let output = match &args.output {
        Some(p) => p.clone(),
        None => default_report_path(&path),
    };
    result.save(&output, mode)?;

    println!();
    report::write_summary(&result);
    println!(
        "  {}",
        format!("Report written to {}", output.display()).dimmed()
    );

    if args.print {
        println!();
        report::write_pretty(&result);
    }

    if result.total_records() > 0 {
        Ok(EXIT_FOUND)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the show command.
pub fn run_show(args: &ShowArgs) -> anyhow::Result<i32> {
    let loaded = Report::load(&args.report)?;
    report::write_pretty(&loaded);
    Ok(EXIT_SUCCESS)
}
