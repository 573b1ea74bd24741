//! The `check-includes` subcommand: report files that include their own
//! header, but not first.

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use super::{CommonArgs, finish_pass, prepare};
use crate::config::CliOverrides;
use crate::output::{ConsoleReporter, PassKind};
use crate::processor::IncludeProcessor;
use crate::verbose_log;

#[derive(Args, Debug, Clone)]
pub struct CheckIncludesArgs {
  #[command(flatten)]
  pub common: CommonArgs,

  /// Implementation file extension to check, e.g. cpp (repeatable; default: cpp)
  #[arg(long = "ext", value_name = "EXT")]
  pub extensions: Vec<String>,
}

/// Run the include-convention pass. Findings never change the exit status.
pub fn run_check_includes(args: CheckIncludesArgs) -> Result<()> {
  let mut config = prepare(&args.common)?;

  config
    .merge_cli_overrides(CliOverrides {
      exclude_dirs: args.common.exclude.clone(),
      include_extensions: args.extensions,
      ..CliOverrides::default()
    })
    .context("Invalid command-line options")?;

  let extensions = config.include_extensions();
  verbose_log!("Checking files with extensions: {}", extensions.join(", "));

  let processor = IncludeProcessor::new(args.common.root.clone(), config.exclusion_rules(), extensions);

  finish_pass(&args.common, PassKind::CheckIncludes, |summary| {
    let mut console = ConsoleReporter;
    let checked = processor.run(&mut (summary, &mut console));
    debug!("{checked} files checked");
  });

  Ok(())
}
