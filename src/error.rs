//! # Error Module
//!
//! Per-file failures. None of these abort a run: the processor reports them
//! against the file and moves on to the next one.

use std::path::PathBuf;

/// A failure while processing a single file.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
  /// The file could not be read, or is not valid UTF-8.
  #[error("Failed to read {path}: {source}")]
  Read { path: PathBuf, source: std::io::Error },

  /// Writing the temporary sibling failed; the original file is untouched.
  #[error("Failed to write temporary file for {path}: {source}")]
  TempWrite { path: PathBuf, source: std::io::Error },

  /// The temporary sibling was written but could not replace the original.
  /// The temporary file is left in place.
  #[error("Couldn't rename file {temp} to {path}: {source}")]
  Rename {
    path: PathBuf,
    temp: PathBuf,
    source: std::io::Error,
  },

  /// The rename failed and the temporary file could not be kept either. The
  /// original file is untouched and nothing is left behind.
  #[error("Failed to replace {path}: {source}")]
  Replace { path: PathBuf, source: std::io::Error },
}

impl ProcessError {
  /// The stray temporary file a failed rename left behind, if any.
  pub fn stray_temp(&self) -> Option<&PathBuf> {
    match self {
      Self::Rename { temp, .. } => Some(temp),
      Self::Read { .. } | Self::TempWrite { .. } | Self::Replace { .. } => None,
    }
  }
}
