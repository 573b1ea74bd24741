//! # File I/O Module
//!
//! This module provides file reading and crash-safe writing for the
//! processor. Writes go to a temporary sibling that is renamed over the
//! original, so a source file is never observed half-written.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use tracing::{trace, warn};

use crate::error::ProcessError;

/// Suffix of temporary siblings. `.new` is never a recognized extension, so
/// leftovers from an interrupted run are not picked up again.
pub const TEMP_SUFFIX: &str = ".new";

/// File I/O operations for the processor.
pub struct FileIO;

impl FileIO {
  /// Read full file content.
  ///
  /// Non-UTF-8 content is reported as a read failure.
  pub fn read_full_content(path: &Path) -> Result<String, ProcessError> {
    fs::read_to_string(path).map_err(|source| ProcessError::Read {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Replaces the content of `path` atomically.
  ///
  /// The content is written and synced to a temporary file in the same
  /// directory, which is then renamed over `path`. If anything fails before
  /// the rename, the temporary file is removed and `path` is untouched. If
  /// the rename itself fails, the temporary file is kept and reported in the
  /// error; if it cannot be kept, the error says nothing was left behind.
  pub fn write_atomic(path: &Path, content: &str) -> Result<(), ProcessError> {
    let temp_write_error = |source| ProcessError::TempWrite {
      path: path.to_path_buf(),
      source,
    };

    let parent = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };
    let file_name = path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default();

    let mut temp = tempfile::Builder::new()
      .prefix(&format!("{file_name}."))
      .suffix(TEMP_SUFFIX)
      .tempfile_in(parent)
      .map_err(temp_write_error)?;
    trace!("Writing {} via {}", path.display(), temp.path().display());

    temp.write_all(content.as_bytes()).map_err(temp_write_error)?;
    temp.as_file().sync_all().map_err(temp_write_error)?;

    // Temporary files are created owner-only; keep the original's mode.
    if let Ok(metadata) = fs::metadata(path) {
      temp
        .as_file()
        .set_permissions(metadata.permissions())
        .map_err(temp_write_error)?;
    }

    match temp.persist(path) {
      Ok(_) => Ok(()),
      Err(err) => {
        let source = err.error;
        // The written content lives only in the temporary file now.
        match err.file.keep() {
          Ok((_, temp_path)) => Err(ProcessError::Rename {
            path: path.to_path_buf(),
            temp: temp_path,
            source,
          }),
          Err(keep_err) => {
            warn!("Failed to keep temporary file {}: {}", keep_err.file.path().display(), keep_err.error);
            Err(ProcessError::Replace {
              path: path.to_path_buf(),
              source,
            })
          }
        }
      }
    }
  }
}
