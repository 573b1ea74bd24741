//! # Include Convention Module
//!
//! Checks that an implementation file includes its own header before any
//! other. For `widget.cpp` the first `#include` should name `widget.h`.
//!
//! The rule is deliberately asymmetric:
//! - no includes at all is fine
//! - a first include naming the file's own header is fine
//! - never including the own header is fine
//! - including the own header, but not first, is incorrect

use std::sync::LazyLock;

use regex::Regex;

use crate::processor::FileRecord;

/// The directive that starts an include line.
pub const INCLUDE_DIRECTIVE: &str = "#include";

/// Extensions stripped from an included name before comparing basenames.
const HEADER_EXTENSIONS: &[&str] = &["h", "hh", "hpp", "hxx", "h++"];

/// Implementation extensions checked by default, without leading dots.
pub const DEFAULT_EXTENSIONS: &[&str] = &["cpp"];

static INCLUDE_ARGUMENT: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"^#include\s*(?:"([^"]*)"|<([^>]*)>)"#).expect("include regex must compile")
});

/// Result of checking one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
  Ok,
  Incorrect,
}

/// Extracts included header names in source order.
///
/// Lines whose directive has no `"..."` or `<...>` argument are not counted.
pub fn extract_includes(content: &str) -> Vec<String> {
  content
    .lines()
    .filter_map(|line| {
      let trimmed = line.trim_start();
      if !trimmed.starts_with(INCLUDE_DIRECTIVE) {
        return None;
      }
      let caps = INCLUDE_ARGUMENT.captures(trimmed)?;
      caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str().to_string())
    })
    .collect()
}

/// Basename of an included header with a header extension removed.
fn header_stem(include: &str) -> &str {
  let base = include.rsplit(['/', '\\']).next().unwrap_or(include);
  match base.rsplit_once('.') {
    Some((stem, ext)) if HEADER_EXTENSIONS.contains(&ext) => stem,
    _ => base,
  }
}

/// Whether `include` names the header belonging to `file`.
pub fn is_self_include(file: &FileRecord, include: &str) -> bool {
  header_stem(include) == file.stem()
}

/// Applies the include convention to already extracted includes.
pub fn check_includes(file: &FileRecord, includes: &[String]) -> CheckOutcome {
  let Some((first, rest)) = includes.split_first() else {
    return CheckOutcome::Ok;
  };
  if is_self_include(file, first) {
    return CheckOutcome::Ok;
  }
  if rest.iter().any(|include| is_self_include(file, include)) {
    CheckOutcome::Incorrect
  } else {
    CheckOutcome::Ok
  }
}

/// Checks one file's content against the include convention.
pub fn check(file: &FileRecord, content: &str) -> CheckOutcome {
  check_includes(file, &extract_includes(content))
}
