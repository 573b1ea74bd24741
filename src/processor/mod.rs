//! # Processor Module
//!
//! This module runs the two passes over a source tree.
//!
//! The module is organized into several submodules:
//! - [`file_collector`] - Directory traversal and candidate selection
//! - [`file_io`] - File reading and atomic replacement
//! - [`header_policy`] - The license/modeline rewrite decision
//!
//! [`Processor`] applies license headers and modelines; [`IncludeProcessor`]
//! checks the include convention. Both walk files strictly one at a time and
//! hand every outcome to a [`ReportSink`]. A failure on one file is reported
//! against that file and never stops the pass.

mod file_collector;
mod file_io;
pub mod header_policy;

use std::path::{Path, PathBuf};

pub use file_collector::{FileCollector, FileRecord};
pub use file_io::FileIO;
pub use header_policy::RewriteOutcome;
use tracing::{debug, warn};

use crate::diff::DiffManager;
use crate::error::ProcessError;
use crate::file_filter::ExclusionRules;
use crate::includes::{self, CheckOutcome};
use crate::report::{FileReport, FileStatus, ReportSink};
use crate::templates::{AdaptedTemplates, CommentStyles, Template};

/// Configuration for creating a Processor instance.
pub struct ProcessorConfig {
  pub template: Template,
  pub root: PathBuf,
  pub comment_styles: CommentStyles,
  pub rules: ExclusionRules,

  /// Report files that need changes without writing them
  pub dry_run: bool,
  pub diff_manager: Option<DiffManager>,
}

impl ProcessorConfig {
  /// Creates a new ProcessorConfig with required fields and sensible defaults.
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// ProcessorConfig {
  ///     dry_run: true,
  ///     ..ProcessorConfig::new(template, root)
  /// }
  /// ```
  pub fn new(template: Template, root: PathBuf) -> Self {
    Self {
      template,
      root,
      comment_styles: CommentStyles::builtin(),
      rules: ExclusionRules::default(),
      dry_run: false,
      diff_manager: None,
    }
  }
}

fn failed_report(file: &FileRecord, err: &ProcessError) -> FileReport {
  FileReport::new(file.path.as_str(), FileStatus::Failed).with_detail(err.to_string())
}

/// Logs a failed rewrite, including any temporary it left behind.
fn write_failed_report(file: &FileRecord, err: &ProcessError) -> FileReport {
  warn!("{err}");
  if let Some(temp) = err.stray_temp() {
    warn!("Temporary file left behind: {}", temp.display());
  }
  failed_report(file, err)
}

/// Processor for the license header and modeline pass.
pub struct Processor {
  /// Templates adapted for every recognized extension
  adapted: AdaptedTemplates,

  rules: ExclusionRules,

  /// Whether to only report without writing
  dry_run: bool,

  /// Manager for rendering dry-run diffs
  diff_manager: DiffManager,

  file_collector: FileCollector,
}

impl Processor {
  /// Creates a new processor with the specified configuration.
  pub fn new(config: ProcessorConfig) -> Self {
    let adapted = AdaptedTemplates::new(&config.template, &config.comment_styles);
    Self {
      adapted,
      rules: config.rules,
      dry_run: config.dry_run,
      diff_manager: config.diff_manager.unwrap_or_default(),
      file_collector: FileCollector::new(config.root),
    }
  }

  pub fn root(&self) -> &Path {
    self.file_collector.root()
  }

  /// Collects candidate files under the root, in traversal order.
  pub fn collect_files(&self) -> Vec<FileRecord> {
    self
      .file_collector
      .collect(&self.rules, &|ext: &str| self.adapted.is_recognized(ext))
  }

  /// Runs the pass over every candidate file.
  ///
  /// Returns the number of files reported to `sink`.
  pub fn run(&self, sink: &mut dyn ReportSink) -> usize {
    let files = self.collect_files();
    debug!("Processing {} files", files.len());

    let mut reported = 0;
    for file in &files {
      if let Some(report) = self.process_file(file) {
        sink.record(&report);
        reported += 1;
      }
    }
    reported
  }

  /// Processes a single file.
  ///
  /// Returns `None` for files that are excluded or not recognized; they are
  /// not part of the run's tally.
  pub fn process_file(&self, file: &FileRecord) -> Option<FileReport> {
    let adapted = self.adapted.get(&file.extension)?;

    let content = match FileIO::read_full_content(&file.fs_path) {
      Ok(content) => content,
      Err(e) => {
        warn!("{e}");
        return Some(failed_report(file, &e));
      }
    };

    let new_content = match header_policy::apply(file, &content, adapted, &self.rules)? {
      RewriteOutcome::Unchanged => return Some(FileReport::new(file.path.as_str(), FileStatus::Ok)),
      RewriteOutcome::Modified(new_content) => new_content,
    };

    if self.dry_run {
      self.diff_manager.display_diff(&file.path, &content, &new_content);
      return Some(FileReport::new(file.path.as_str(), FileStatus::WouldUpdate));
    }

    match FileIO::write_atomic(&file.fs_path, &new_content) {
      Ok(()) => Some(FileReport::new(file.path.as_str(), FileStatus::Updated)),
      Err(e) => Some(write_failed_report(file, &e)),
    }
  }
}

/// Processor for the include-convention pass.
pub struct IncludeProcessor {
  rules: ExclusionRules,
  /// Implementation extensions to check, without leading dots
  extensions: Vec<String>,
  file_collector: FileCollector,
}

impl IncludeProcessor {
  pub fn new(root: PathBuf, rules: ExclusionRules, extensions: Vec<String>) -> Self {
    Self {
      rules,
      extensions,
      file_collector: FileCollector::new(root),
    }
  }

  pub fn collect_files(&self) -> Vec<FileRecord> {
    self
      .file_collector
      .collect(&self.rules, &|ext: &str| self.extensions.iter().any(|e| e == ext))
  }

  /// Runs the check over every candidate file.
  ///
  /// Returns the number of files reported to `sink`.
  pub fn run(&self, sink: &mut dyn ReportSink) -> usize {
    let files = self.collect_files();
    debug!("Checking includes in {} files", files.len());

    for file in &files {
      sink.record(&self.check_file(file));
    }
    files.len()
  }

  /// Checks a single file.
  pub fn check_file(&self, file: &FileRecord) -> FileReport {
    match FileIO::read_full_content(&file.fs_path) {
      Ok(content) => {
        let status = match includes::check(file, &content) {
          CheckOutcome::Ok => FileStatus::Ok,
          CheckOutcome::Incorrect => FileStatus::Incorrect,
        };
        FileReport::new(file.path.as_str(), status)
      }
      Err(e) => {
        warn!("{e}");
        failed_report(file, &e)
      }
    }
  }
}
