//! # Output Module
//!
//! This module centralizes all user-facing output for the boilerplate tool:
//! one status line per processed file while a pass runs, then the summary.
//!
//! - Normal mode prints every status line and the summary.
//! - Quiet mode prints only failures and the bare list of flagged paths, for
//!   scripting.
//! - Verbose mode adds timing to the summary.

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::report::{FileReport, FileStatus, ReportSink, RunSummary};

/// Which pass produced the output; selects the wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
  /// Header pass that writes files
  Apply,
  /// Header pass that only reports
  DryRun,
  /// Include-convention pass
  CheckIncludes,
}

impl PassKind {
  /// Name used in reports.
  pub const fn command(self) -> &'static str {
    match self {
      PassKind::Apply | PassKind::DryRun => "apply",
      PassKind::CheckIncludes => "check-includes",
    }
  }
}

/// Formats the status line for a file, without colors.
pub fn status_line(report: &FileReport) -> String {
  match report.status {
    FileStatus::Ok => format!("{} is ok", report.path),
    FileStatus::Updated => format!("{} is UPDATED", report.path),
    FileStatus::WouldUpdate => format!("{} would be UPDATED", report.path),
    FileStatus::Incorrect => format!("{} is INCORRECT", report.path),
    FileStatus::Failed => match report.detail {
      Some(ref detail) => format!("{} FAILED: {}", report.path, detail),
      None => format!("{} FAILED", report.path),
    },
  }
}

/// Streams one status line per file to the console.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ReportSink for ConsoleReporter {
  fn record(&mut self, report: &FileReport) {
    let line = status_line(report);
    match report.status {
      FileStatus::Failed => eprintln!("{}", line.if_supports_color(Stream::Stderr, |l| l.red())),
      _ if is_quiet() => {}
      FileStatus::Ok => println!("{line}"),
      FileStatus::Updated | FileStatus::WouldUpdate => {
        println!("{}", line.if_supports_color(Stream::Stdout, |l| l.green()))
      }
      FileStatus::Incorrect => println!("{}", line.if_supports_color(Stream::Stdout, |l| l.yellow())),
    }
  }
}

fn plural(count: usize) -> &'static str {
  if count == 1 { "file" } else { "files" }
}

/// Formats the tally line of a summary, without colors.
pub fn summary_line(kind: PassKind, summary: &RunSummary) -> String {
  let modified = summary.modified_count;
  let ok = summary.ok_count;
  let mut line = match kind {
    PassKind::Apply => format!("{modified} {} changed, {ok} {} ok.", plural(modified), plural(ok)),
    PassKind::DryRun => format!("{modified} {} would change, {ok} {} ok.", plural(modified), plural(ok)),
    PassKind::CheckIncludes => {
      let verb = if modified == 1 { "is" } else { "are" };
      let ok_verb = if ok == 1 { "is" } else { "are" };
      format!(
        "{modified} {} {verb} incorrect, {ok} {} {ok_verb} ok.",
        plural(modified),
        plural(ok)
      )
    }
  };
  if summary.failed_count > 0 {
    line.push_str(&format!(
      " {} {} failed.",
      summary.failed_count,
      plural(summary.failed_count)
    ));
  }
  line
}

/// Heading above the list of flagged files.
const fn list_heading(kind: PassKind) -> &'static str {
  match kind {
    PassKind::Apply => "Modified files:",
    PassKind::DryRun => "Files that would be modified:",
    PassKind::CheckIncludes => "Files need a fix:",
  }
}

/// Print the summary of a finished pass.
pub fn print_summary(kind: PassKind, summary: &RunSummary) {
  if is_quiet() {
    for path in &summary.modified_files {
      println!("{path}");
    }
    return;
  }

  let mut line = summary_line(kind, summary);
  if is_verbose() {
    line.push_str(&format!(" ({:.2}s)", summary.processing_time.as_secs_f64()));
  }
  println!("{}", line.if_supports_color(Stream::Stdout, |l| l.cyan()));

  if !summary.modified_files.is_empty() {
    println!("{}", list_heading(kind));
    for path in &summary.modified_files {
      println!("{path}");
    }
  }

  if !summary.failed_files.is_empty() {
    println!("Failed files:");
    for path in &summary.failed_files {
      println!("{}", path.if_supports_color(Stream::Stdout, |p| p.red()));
    }
  }
}
