#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use assert_cmd::Command;
use tempfile::TempDir;

/// Canonical license template used across the tests.
pub const LICENSE: &str = "// Copyright (c) 2012 Example Project\n// Licensed under the MIT license.\n";

/// Canonical modeline template used across the tests.
pub const MODELINE: &str = "// vim: set ts=2 sw=2 et:\n";

/// A scratch source tree rooted in a temporary directory.
pub struct SourceTree {
  dir: TempDir,
}

impl SourceTree {
  /// Creates an empty tree with `license_header` and `modelines.txt` at the
  /// root.
  pub fn new() -> Result<Self> {
    let tree = Self {
      dir: TempDir::new().context("Failed to create temp dir")?,
    };
    tree.write("license_header", LICENSE)?;
    tree.write("modelines.txt", MODELINE)?;
    Ok(tree)
  }

  pub fn root(&self) -> &Path {
    self.dir.path()
  }

  /// Writes `content` to `relative`, creating parent directories.
  pub fn write(&self, relative: &str, content: &str) -> Result<PathBuf> {
    let path = self.dir.path().join(relative);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
  }

  pub fn read(&self, relative: &str) -> Result<String> {
    let path = self.dir.path().join(relative);
    fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
  }

  pub fn exists(&self, relative: &str) -> bool {
    self.dir.path().join(relative).exists()
  }

  /// A `boilerplate` command running inside the tree with colors disabled and
  /// no config discovery from the environment.
  pub fn command(&self) -> Command {
    let mut cmd = Command::cargo_bin("boilerplate").expect("boilerplate binary should be built");
    cmd
      .current_dir(self.dir.path())
      .env_remove("BOILERPLATE_CONFIG")
      .env_remove("RUST_LOG")
      .env("NO_COLOR", "1");
    cmd
  }

  /// `boilerplate apply --colors=never --modeline-file modelines.txt ...`
  pub fn apply(&self, extra: &[&str]) -> Command {
    let mut cmd = self.command();
    cmd
      .arg("apply")
      .arg("--colors=never")
      .args(["--modeline-file", "modelines.txt"])
      .args(extra);
    cmd
  }

  /// `boilerplate check-includes --colors=never ...`
  pub fn check_includes(&self, extra: &[&str]) -> Command {
    let mut cmd = self.command();
    cmd.arg("check-includes").arg("--colors=never").args(extra);
    cmd
  }
}
