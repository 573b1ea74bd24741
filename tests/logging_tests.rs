mod common;

use anyhow::Result;
use common::SourceTree;
use predicates::prelude::*;

#[test]
fn test_color_modes() -> Result<()> {
  let tree = SourceTree::new()?;
  tree.write("a.c", "int a;\n")?;

  // Test with --colors=never
  let output = tree.command().args(["apply", "--dry-run", "--colors=never"]).output()?;
  let stdout = String::from_utf8(output.stdout)?;
  assert!(output.status.success());
  assert!(!stdout.contains("\x1b["));

  // Test with --colors=always, which wins over NO_COLOR and a non-TTY stdout
  let output = tree.command().args(["apply", "--dry-run", "--colors=always"]).output()?;
  let stdout = String::from_utf8(output.stdout)?;
  assert!(output.status.success());
  assert!(stdout.contains("\x1b["));

  // In auto mode with non-TTY output, we shouldn't see color codes
  let output = tree.command().args(["apply", "--dry-run"]).output()?;
  let stdout = String::from_utf8(output.stdout)?;
  assert!(!stdout.contains("\x1b["));

  Ok(())
}

#[test]
fn test_verbose_logs_go_to_stderr() -> Result<()> {
  let tree = SourceTree::new()?;
  tree.write("a.c", "int a;\n")?;

  tree
    .command()
    .args(["apply", "--dry-run", "--colors=never", "-v"])
    .assert()
    .success()
    .stderr(predicate::str::contains("Loading license template from:"))
    .stdout(predicate::str::contains("Loading license template from:").not());
  Ok(())
}

#[test]
fn test_quiet_conflicts_with_verbose() -> Result<()> {
  let tree = SourceTree::new()?;
  tree.command().args(["apply", "-q", "-v"]).assert().failure();
  Ok(())
}
