//! The `apply` subcommand: add missing license headers and modelines.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use super::{CommonArgs, absolute_cli_path, finish_pass, prepare};
use crate::config::CliOverrides;
use crate::diff::DiffManager;
use crate::info_log;
use crate::output::{ConsoleReporter, PassKind};
use crate::processor::{Processor, ProcessorConfig};
use crate::templates::Template;
use crate::verbose_log;

#[derive(Args, Debug, Clone)]
pub struct ApplyArgs {
  #[command(flatten)]
  pub common: CommonArgs,

  /// License template written with `//` comments (default: license_header in the root)
  #[arg(long, short = 'f', value_name = "FILE")]
  pub license_file: Option<PathBuf>,

  /// Modeline template written with `//` comments; no modelines when omitted
  #[arg(long, short = 'm', value_name = "FILE")]
  pub modeline_file: Option<PathBuf>,

  /// Never add the license to paths starting with this prefix (repeatable)
  #[arg(long, value_name = "PREFIX")]
  pub no_license: Vec<String>,

  /// Report files that would change without writing them
  #[arg(long)]
  pub dry_run: bool,

  /// Show the changes a dry run would make
  #[arg(long, requires = "dry_run")]
  pub show_diff: bool,

  /// Save the changes a dry run would make to a file
  #[arg(long, value_name = "FILE", requires = "dry_run")]
  pub save_diff: Option<PathBuf>,
}

/// Run the header pass.
pub fn run_apply(args: ApplyArgs) -> Result<()> {
  let mut config = prepare(&args.common)?;

  config
    .merge_cli_overrides(CliOverrides {
      license_file: absolute_cli_path(args.license_file)?,
      modeline_file: absolute_cli_path(args.modeline_file)?,
      exclude_dirs: args.common.exclude.clone(),
      no_license: args.no_license,
      include_extensions: Vec::new(),
    })
    .context("Invalid command-line options")?;

  let root = args.common.root.clone();
  let license_path = config.license_path(&root);
  let modeline_path = config.modeline_path(&root);
  let template = Template::load(&license_path, modeline_path.as_deref())?;

  info_log!("Using license template: {}", license_path.display());
  if let Some(ref path) = modeline_path {
    info_log!("Using modeline template: {}", path.display());
  }

  let mut diff_manager = DiffManager::new(args.show_diff, args.save_diff);
  diff_manager.init();

  let comment_styles = config.comment_styles();
  verbose_log!(
    "Recognized extensions: {}",
    comment_styles.extensions().collect::<Vec<_>>().join(", ")
  );

  let processor = Processor::new(ProcessorConfig {
    comment_styles,
    rules: config.exclusion_rules(),
    dry_run: args.dry_run,
    diff_manager: Some(diff_manager),
    ..ProcessorConfig::new(template, root)
  });

  let kind = if args.dry_run { PassKind::DryRun } else { PassKind::Apply };
  let summary = finish_pass(&args.common, kind, |summary| {
    let mut console = ConsoleReporter;
    let reported = processor.run(&mut (summary, &mut console));
    debug!("{} files reported under {}", reported, processor.root().display());
  });

  if !summary.has_findings() {
    info_log!("All {} files already carry their boilerplate", summary.total());
  }

  Ok(())
}
