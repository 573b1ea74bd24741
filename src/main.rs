//! # boilerplate
//!
//! Adds license headers and modelines to source files, and checks include order.

use anyhow::Result;
use boilerplate::cli::{Cli, run};

fn main() -> Result<()> {
  let cli = Cli::parse_args();
  run(cli)
}
