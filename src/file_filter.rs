//! # File Filter Module
//!
//! This module decides which paths take part in a run. Paths are compared as
//! root-relative strings of the form `./dir/file.ext`, and every rule is a
//! literal string prefix: `./ab` matches `./ab`, `./ab/x.c` and also
//! `./abc/x.c`.

use std::collections::BTreeSet;

/// Returns `true` if any rule is a literal string prefix of `path`.
pub fn matches_any_prefix<'a, I>(rules: I, path: &str) -> bool
where
  I: IntoIterator<Item = &'a String>,
{
  rules.into_iter().any(|rule| path.starts_with(rule.as_str()))
}

/// Exclusion rules applied by both passes.
///
/// * `excluded_dirs` - directory prefixes skipped entirely
/// * `no_license` - directory or file prefixes that must never receive the
///   project license (they still receive modelines)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRules {
  pub excluded_dirs: BTreeSet<String>,
  pub no_license: BTreeSet<String>,
}

impl ExclusionRules {
  /// Creates rules from the two prefix lists.
  pub fn new<E, N>(excluded_dirs: E, no_license: N) -> Self
  where
    E: IntoIterator,
    E::Item: Into<String>,
    N: IntoIterator,
    N::Item: Into<String>,
  {
    Self {
      excluded_dirs: excluded_dirs.into_iter().map(Into::into).collect(),
      no_license: no_license.into_iter().map(Into::into).collect(),
    }
  }

  /// Whether a directory is excluded from the run.
  pub fn is_excluded_dir(&self, directory: &str) -> bool {
    matches_any_prefix(&self.excluded_dirs, directory)
  }

  /// Whether license insertion is suppressed for a file.
  pub fn is_license_exempt(&self, directory: &str, path: &str) -> bool {
    matches_any_prefix(&self.no_license, directory) || matches_any_prefix(&self.no_license, path)
  }
}

/// Result of a file filtering operation.
#[derive(Debug)]
pub struct FilterResult {
  /// Whether the file should be processed
  pub should_process: bool,
  /// Reason why the file should not be processed (if any)
  pub reason: Option<&'static str>,
}

impl FilterResult {
  /// Creates a new FilterResult indicating the file should be processed.
  pub const fn process() -> Self {
    Self {
      should_process: true,
      reason: None,
    }
  }

  /// Creates a new FilterResult indicating the file should be skipped.
  pub const fn skip(reason: &'static str) -> Self {
    Self {
      should_process: false,
      reason: Some(reason),
    }
  }
}
