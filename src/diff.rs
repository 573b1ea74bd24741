//! # Diff Module
//!
//! Renders the difference between a file's current content and the content a
//! dry run would have written, on stderr and/or appended to a diff file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use owo_colors::{OwoColorize, Stream};
use similar::{ChangeTag, TextDiff};
use tracing::warn;

/// Manages diff creation and rendering for dry runs.
#[derive(Debug, Default)]
pub struct DiffManager {
  /// Whether to show diffs on stderr
  pub show_diff: bool,

  /// Path to save the diffs to
  pub save_diff_path: Option<PathBuf>,
}

impl DiffManager {
  pub const fn new(show_diff: bool, save_diff_path: Option<PathBuf>) -> Self {
    Self {
      show_diff,
      save_diff_path,
    }
  }

  /// Whether any diff output is requested.
  pub const fn is_enabled(&self) -> bool {
    self.show_diff || self.save_diff_path.is_some()
  }

  /// Truncates the diff file so a run starts from an empty file.
  ///
  /// If the file cannot be created, saving is turned off for the run.
  pub fn init(&mut self) {
    if let Some(ref path) = self.save_diff_path
      && let Err(e) = File::create(path)
    {
      warn!("Failed to create diff file {}: {}; diffs will not be saved", path.display(), e);
      self.save_diff_path = None;
    }
  }

  /// Renders the diff for one file.
  ///
  /// Failures to write the diff file are logged, not returned; a broken diff
  /// file must not stop the run.
  pub fn display_diff(&self, path: &str, original: &str, new: &str) {
    if !self.is_enabled() {
      return;
    }

    let diff = TextDiff::from_lines(original, new);
    let mut diff_content = format!("Diff for {path}:\n");

    if self.show_diff {
      eprintln!("Diff for {path}:");
    }

    for change in diff.iter_all_changes() {
      let sign = match change.tag() {
        ChangeTag::Delete => "-",
        ChangeTag::Insert => "+",
        ChangeTag::Equal => " ",
      };
      let mut line = format!("{sign}{change}");
      if change.missing_newline() {
        line.push('\n');
      }

      if self.show_diff {
        match change.tag() {
          ChangeTag::Delete => eprint!("{}", line.if_supports_color(Stream::Stderr, |l| l.red())),
          ChangeTag::Insert => eprint!("{}", line.if_supports_color(Stream::Stderr, |l| l.green())),
          ChangeTag::Equal => eprint!("{line}"),
        }
      }
      diff_content.push_str(&line);
    }

    if self.show_diff {
      eprintln!();
    }
    diff_content.push('\n');

    if let Some(ref diff_path) = self.save_diff_path {
      let written = OpenOptions::new()
        .create(true)
        .append(true)
        .open(diff_path)
        .and_then(|mut file| file.write_all(diff_content.as_bytes()));
      if let Err(e) = written {
        warn!("Error writing to diff file {}: {}", diff_path.display(), e);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_save_diff_appends_per_file() {
    let dir = tempdir().expect("create temp dir");
    let diff_path = dir.path().join("changes.diff");
    fs::write(&diff_path, "stale content\n").expect("seed diff file");

    let mut manager = DiffManager::new(false, Some(diff_path.clone()));
    manager.init();
    manager.display_diff("./a.c", "int a;\n", "// L\nint a;\n");
    manager.display_diff("./b.c", "int b;", "// L\nint b;");

    let saved = fs::read_to_string(&diff_path).expect("read diff");
    assert!(!saved.contains("stale content"));
    assert!(saved.contains("Diff for ./a.c:\n+// L\n int a;\n"));
    assert!(saved.contains("Diff for ./b.c:\n+// L\n int b;\n"));
  }

  #[test]
  fn test_disabled_manager_does_nothing() {
    let mut manager = DiffManager::default();
    assert!(!manager.is_enabled());
    manager.init();
    manager.display_diff("./a.c", "a", "b");
  }

  #[test]
  fn test_uncreatable_diff_file_disables_saving() {
    let dir = tempdir().expect("create temp dir");
    let diff_path = dir.path().join("missing").join("changes.diff");

    let mut manager = DiffManager::new(true, Some(diff_path.clone()));
    manager.init();

    assert!(manager.save_diff_path.is_none());
    assert!(manager.is_enabled(), "showing diffs stays on");
    manager.display_diff("./a.c", "a\n", "b\n");
    assert!(!diff_path.exists());
  }
}
