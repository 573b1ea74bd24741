//! # Report Module
//!
//! This module accumulates per-file outcomes of a pass into a
//! [`RunSummary`] and can write them out as JSON or CSV.
//!
//! Outcomes are delivered through the [`ReportSink`] trait so the same pass
//! can feed the summary and the console at once.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

/// Outcome of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
  /// Nothing to do
  Ok,
  /// License and/or modeline was written to the file
  Updated,
  /// Dry run: the file would have been updated
  WouldUpdate,
  /// Own header is included, but not first
  Incorrect,
  /// The file could not be processed
  Failed,
}

impl FileStatus {
  /// Whether this status lands in the modified/incorrect list.
  pub const fn is_flagged(self) -> bool {
    matches!(self, Self::Updated | Self::WouldUpdate | Self::Incorrect)
  }
}

impl fmt::Display for FileStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      Self::Ok => "ok",
      Self::Updated => "updated",
      Self::WouldUpdate => "would update",
      Self::Incorrect => "incorrect",
      Self::Failed => "failed",
    };
    f.write_str(label)
  }
}

/// Information about a processed file for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
  /// Root-relative path, e.g. `./src/main.cpp`
  pub path: String,
  /// What happened to the file
  pub status: FileStatus,
  /// Error message for failed files, or a note such as a stray temporary
  #[serde(skip_serializing_if = "Option::is_none")]
  pub detail: Option<String>,
}

impl FileReport {
  pub fn new(path: impl Into<String>, status: FileStatus) -> Self {
    Self {
      path: path.into(),
      status,
      detail: None,
    }
  }

  pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
    self.detail = Some(detail.into());
    self
  }
}

/// Receives one report per processed file, in traversal order.
pub trait ReportSink {
  fn record(&mut self, report: &FileReport);
}

impl<A: ReportSink + ?Sized, B: ReportSink + ?Sized> ReportSink for (&mut A, &mut B) {
  fn record(&mut self, report: &FileReport) {
    self.0.record(report);
    self.1.record(report);
  }
}

/// Final tally of a pass.
///
/// `modified_count` and `modified_files` cover updated files in the header
/// pass and incorrect files in the include pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
  pub modified_count: usize,
  pub ok_count: usize,
  pub failed_count: usize,
  pub modified_files: Vec<String>,
  pub failed_files: Vec<String>,
  #[serde(skip)]
  pub files: Vec<FileReport>,
  #[serde(serialize_with = "serialize_secs")]
  pub processing_time: Duration,
}

fn serialize_secs<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.serialize_f64(duration.as_secs_f64())
}

impl RunSummary {
  pub fn new() -> Self {
    Self::default()
  }

  /// Whether any file was modified, incorrect or failed.
  pub const fn has_findings(&self) -> bool {
    self.modified_count > 0 || self.failed_count > 0
  }

  /// Number of files that produced a status line.
  pub const fn total(&self) -> usize {
    self.modified_count + self.ok_count + self.failed_count
  }
}

impl ReportSink for RunSummary {
  fn record(&mut self, report: &FileReport) {
    if report.status.is_flagged() {
      self.modified_count += 1;
      self.modified_files.push(report.path.clone());
    } else if report.status == FileStatus::Failed {
      self.failed_count += 1;
      self.failed_files.push(report.path.clone());
    } else {
      self.ok_count += 1;
    }
    self.files.push(report.clone());
  }
}

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
  /// JSON format for machine readability
  Json,
  /// CSV format for spreadsheet compatibility
  Csv,
}

impl fmt::Display for ReportFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReportFormat::Json => write!(f, "JSON"),
      ReportFormat::Csv => write!(f, "CSV"),
    }
  }
}

#[derive(Serialize)]
struct JsonReport<'a> {
  generated_at: String,
  command: &'a str,
  summary: &'a RunSummary,
  files: &'a [FileReport],
}

/// Report Generator for writing a finished pass to disk
pub struct ReportGenerator<'a> {
  /// Format of the report to generate
  format: ReportFormat,
  /// Path where the report will be saved
  output_path: &'a Path,
}

impl<'a> ReportGenerator<'a> {
  pub const fn new(format: ReportFormat, output_path: &'a Path) -> Self {
    Self { format, output_path }
  }

  /// Writes the report for `summary`, produced by the pass named `command`.
  pub fn generate(&self, command: &str, summary: &RunSummary) -> Result<()> {
    let content = match self.format {
      ReportFormat::Json => Self::generate_json(command, summary)?,
      ReportFormat::Csv => Self::generate_csv(summary),
    };

    fs::write(self.output_path, content)
      .with_context(|| format!("Failed to write {} report to {}", self.format, self.output_path.display()))
  }

  fn generate_json(command: &str, summary: &RunSummary) -> Result<String> {
    let report = JsonReport {
      generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
      command,
      summary,
      files: &summary.files,
    };
    serde_json::to_string_pretty(&report).context("Failed to serialize JSON report")
  }

  fn generate_csv(summary: &RunSummary) -> String {
    let mut csv = String::from("path,status,detail\n");
    for file in &summary.files {
      csv.push_str(&format!(
        "{},{},{}\n",
        escape_csv(&file.path),
        escape_csv(&file.status.to_string()),
        escape_csv(file.detail.as_deref().unwrap_or(""))
      ));
    }
    csv
  }
}

/// Quotes a CSV field when it contains a delimiter, quote or newline.
fn escape_csv(field: &str) -> String {
  if field.contains([',', '"', '\n', '\r']) {
    format!("\"{}\"", field.replace('"', "\"\""))
  } else {
    field.to_string()
  }
}

#[cfg(test)]
mod tests {
  use tempfile::tempdir;

  use super::*;

  fn sample_summary() -> RunSummary {
    let mut summary = RunSummary::new();
    summary.record(&FileReport::new("./a.cpp", FileStatus::Updated));
    summary.record(&FileReport::new("./b.h", FileStatus::Ok));
    summary.record(&FileReport::new("./c.s", FileStatus::Failed).with_detail("Failed to read ./c.s: denied, really"));
    summary.record(&FileReport::new("./d.lua", FileStatus::Ok));
    summary
  }

  #[test]
  fn test_summary_tallies_in_order() {
    let summary = sample_summary();
    assert_eq!(summary.modified_count, 1);
    assert_eq!(summary.ok_count, 2);
    assert_eq!(summary.failed_count, 1);
    assert_eq!(summary.modified_files, vec!["./a.cpp"]);
    assert_eq!(summary.failed_files, vec!["./c.s"]);
    assert_eq!(summary.total(), 4);
    assert!(summary.has_findings());
  }

  #[test]
  fn test_incorrect_counts_as_modified() {
    let mut summary = RunSummary::new();
    summary.record(&FileReport::new("./x.cpp", FileStatus::Incorrect));
    summary.record(&FileReport::new("./y.cpp", FileStatus::Incorrect));
    assert_eq!(summary.modified_count, 2);
    assert_eq!(summary.modified_files, vec!["./x.cpp", "./y.cpp"]);
  }

  #[test]
  fn test_tuple_sink_feeds_both() {
    let mut first = RunSummary::new();
    let mut second = RunSummary::new();
    {
      let mut sink = (&mut first, &mut second);
      sink.record(&FileReport::new("./a.c", FileStatus::Ok));
    }
    assert_eq!(first.ok_count, 1);
    assert_eq!(second.ok_count, 1);
  }

  #[test]
  fn test_generate_json() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("report.json");
    ReportGenerator::new(ReportFormat::Json, &path)
      .generate("apply", &sample_summary())
      .expect("write report");

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("parse");
    assert_eq!(value["command"], "apply");
    assert_eq!(value["summary"]["modified_count"], 1);
    assert_eq!(value["summary"]["ok_count"], 2);
    assert_eq!(value["files"][0]["path"], "./a.cpp");
    assert_eq!(value["files"][0]["status"], "updated");
    assert!(value["files"][0].get("detail").is_none());
    assert_eq!(value["files"][2]["status"], "failed");
  }

  #[test]
  fn test_generate_csv_escapes_fields() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("report.csv");
    ReportGenerator::new(ReportFormat::Csv, &path)
      .generate("apply", &sample_summary())
      .expect("write report");

    let csv = fs::read_to_string(&path).expect("read");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "path,status,detail");
    assert_eq!(lines[1], "./a.cpp,updated,");
    assert_eq!(lines[3], "./c.s,failed,\"Failed to read ./c.s: denied, really\"");
  }
}
