//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing with one subcommand per pass.

mod apply;
mod includes;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
pub use apply::{ApplyArgs, run_apply};
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Args, Parser, Subcommand};
pub use includes::{CheckIncludesArgs, run_check_includes};
use tracing::{debug, warn};

use crate::config::{Config, load_config};
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output::{PassKind, print_summary};
use crate::report::{ReportFormat, ReportGenerator, RunSummary};

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Add license_header and modelines.txt to every source file under the current directory
  boilerplate apply --modeline-file modelines.txt

  # Show what would change without touching any file
  boilerplate apply --dry-run --show-diff

  # Skip build output, keep third-party code free of the project license
  boilerplate apply --exclude ./_build_ --no-license ./lib/bstrlib

  # Check that every .cpp file includes its own header first
  boilerplate check-includes --exclude ./_build_
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
  /// Add the license header and modelines to source files that lack them
  Apply(ApplyArgs),
  /// Report implementation files that include their own header, but not first
  CheckIncludes(CheckIncludesArgs),
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

/// Arguments shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
  /// Root directory to walk; paths are reported relative to it
  #[arg(long, value_name = "DIR", default_value = ".")]
  pub root: PathBuf,

  /// Skip directories starting with this prefix, e.g. ./_build_ (repeatable)
  #[arg(long, short = 'e', value_name = "PREFIX")]
  pub exclude: Vec<String>,

  /// Path to config file (default: .boilerplate.toml in the root)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress per-file status lines; print only failures and flagged paths
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,

  /// Write a JSON report of the run to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,

  /// Write a CSV report of the run to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_csv: Option<PathBuf>,
}

/// Run the selected subcommand
pub fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Command::Apply(args) => run_apply(args),
    Command::CheckIncludes(args) => run_check_includes(args),
  }
}

/// Sets up logging and loads the configuration for a pass.
fn prepare(common: &CommonArgs) -> Result<Config> {
  init_tracing(common.quiet, common.verbose);

  if common.verbose > 0 {
    set_verbose();
  } else if common.quiet {
    set_quiet();
  }
  common.colors.apply();

  if !common.root.is_dir() {
    anyhow::bail!("Root directory does not exist: {}", common.root.display());
  }
  debug!("Using root: {}", common.root.display());

  load_config(common.config.as_deref(), &common.root, common.no_config)
}

/// Makes a command-line path independent of `--root`.
fn absolute_cli_path(path: Option<PathBuf>) -> Result<Option<PathBuf>> {
  path
    .map(|p| std::path::absolute(&p).with_context(|| format!("Failed to resolve path: {}", p.display())))
    .transpose()
}

/// Runs a pass, prints its summary and writes the requested reports.
fn finish_pass(common: &CommonArgs, kind: PassKind, run: impl FnOnce(&mut RunSummary)) -> RunSummary {
  let start = Instant::now();
  let mut summary = RunSummary::new();
  run(&mut summary);
  summary.processing_time = start.elapsed();

  print_summary(kind, &summary);

  let reports = [
    (ReportFormat::Json, common.report_json.as_deref()),
    (ReportFormat::Csv, common.report_csv.as_deref()),
  ];
  for (format, path) in reports {
    if let Some(path) = path {
      write_report(format, path, kind, &summary);
    }
  }

  summary
}

fn write_report(format: ReportFormat, path: &Path, kind: PassKind, summary: &RunSummary) {
  match ReportGenerator::new(format, path).generate(kind.command(), summary) {
    Ok(()) => debug!("{} report written to {}", format, path.display()),
    Err(e) => warn!("{e:#}"),
  }
}
