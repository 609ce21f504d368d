//! Persisted report structure and output formatting.
//!
//! The report on disk is a JSON mapping from file path to an ordered list
//! of packed-string records: `"name"` for a class or zero-parameter
//! function, `"name;p1,p2"` when parameters exist. That encoding is the
//! declared wire format and is preserved exactly for compatibility;
//! internally everything is the structured [`UndocumentedRecord`], with
//! packing applied only when crossing the serialization boundary.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::*;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::analysis::UndocumentedRecord;

/// How to write a report when the output file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Overwrite any existing report.
    Replace,
    /// Fold this run's entries into the existing report; entries for the
    /// same file path are replaced, others are kept.
    Merge,
}

/// Encode a record into its packed wire form.
///
/// No trailing separator when the parameter list is empty: `"Foo"`, not
/// `"Foo;"`.
pub fn encode_record(record: &UndocumentedRecord) -> String {
    if record.parameters.is_empty() {
        record.name.clone()
    } else {
        format!("{};{}", record.name, record.parameters.join(","))
    }
}

/// Decode a packed wire string back into a structured record.
pub fn decode_record(packed: &str) -> UndocumentedRecord {
    match packed.split_once(';') {
        Some((name, params)) => UndocumentedRecord {
            name: name.to_string(),
            parameters: params
                .split(',')
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
        },
        None => UndocumentedRecord::bare(packed),
    }
}

/// Aggregated scan results, keyed by (possibly redacted) file path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    files: BTreeMap<String, Vec<UndocumentedRecord>>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the record sequence for a file, replacing any previous entry.
    pub fn insert(&mut self, path: impl Into<String>, records: Vec<UndocumentedRecord>) {
        self.files.insert(path.into(), records);
    }

    /// Fold another report into this one. Incoming entries win on key
    /// collision.
    pub fn merge(&mut self, incoming: Report) {
        self.files.extend(incoming.files);
    }

    /// Iterate over (path, records) pairs in path order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &[UndocumentedRecord])> {
        self.files.iter().map(|(p, r)| (p.as_str(), r.as_slice()))
    }

    /// Records for one file, if present.
    pub fn records_for(&self, path: &str) -> Option<&[UndocumentedRecord]> {
        self.files.get(path).map(|r| r.as_slice())
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total number of undocumented declarations across all files.
    pub fn total_records(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    /// Load a report from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read report {}", path.display()))?;
        let report = serde_json::from_str(&text)
            .with_context(|| format!("invalid report JSON in {}", path.display()))?;
        Ok(report)
    }

    /// Write the report to a JSON file.
    ///
    /// In merge mode an unreadable or corrupt existing report is reported
    /// to the operator and treated as empty; the write still happens.
    pub fn save(&self, path: &Path, mode: WriteMode) -> anyhow::Result<()> {
        let merged;
        let to_write = match mode {
            WriteMode::Merge if path.exists() => {
                let mut existing = match Self::load(path) {
                    Ok(r) => r,
                    Err(e) => {
                        eprintln!("Warning: {:#}; starting a fresh report", e);
                        Report::new()
                    }
                };
                existing.merge(self.clone());
                merged = existing;
                &merged
            }
            WriteMode::Replace | WriteMode::Merge => self,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("cannot create {}", parent.display()))?;
            }
        }

        let json = serde_json::to_string_pretty(to_write)?;
        fs::write(path, json).with_context(|| format!("cannot write {}", path.display()))?;
        Ok(())
    }
}

impl Serialize for Report {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire: BTreeMap<&String, Vec<String>> = self
            .files
            .iter()
            .map(|(path, records)| (path, records.iter().map(encode_record).collect()))
            .collect();
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Report {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = BTreeMap::<String, Vec<String>>::deserialize(deserializer)?;
        let files = wire
            .into_iter()
            .map(|(path, packed)| (path, packed.iter().map(|s| decode_record(s)).collect()))
            .collect();
        Ok(Report { files })
    }
}

/// Print the report for human consumption: each offending file, its
/// undocumented declarations, and parameter names one per line.
pub fn write_pretty(report: &Report) {
    for (file, records) in report.files() {
        if records.is_empty() {
            continue;
        }
        println!("{} {}", "File:".bold(), file.blue());
        for record in records {
            println!("  - {}", record.name);
            if !record.parameters.is_empty() {
                println!("      {}", "Arguments:".dimmed());
                for param in &record.parameters {
                    println!("        - {}", param);
                }
            }
        }
        println!();
    }
}

/// Print a one-line scan summary.
pub fn write_summary(report: &Report) {
    let total = report.total_records();
    if total == 0 {
        println!("  {}", "✓ All declarations documented".green());
        return;
    }

    let offending = report.files().filter(|(_, r)| !r.is_empty()).count();
    println!(
        "  {} {} undocumented declaration{} across {} file{}",
        "✗".red(),
        total,
        if total == 1 { "" } else { "s" },
        offending,
        if offending == 1 { "" } else { "s" },
    );
}
